//! Scene load state machine
//!
//! ```text
//! Parsing → Decoding → EntitiesInstantiated → Linking → Ready
//!    └──────────┴──────────────┴─────────────────┴──→ Failed
//! ```

use std::fmt;

/// Progress of one scene load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    /// Definition read; prefabs being composed
    #[default]
    Parsing,
    /// Component literals being decoded; no entity exists yet
    Decoding,
    /// Entities created and components attached, references still empty
    EntitiesInstantiated,
    /// Entity references being patched
    Linking,
    /// Fully loaded; safe to read
    Ready,
    /// Load aborted; nothing of the scene remains
    Failed,
}

impl SceneState {
    /// Whether `next` may follow this state
    pub fn can_transition_to(self, next: SceneState) -> bool {
        use SceneState::*;
        matches!(
            (self, next),
            (Parsing, Decoding)
                | (Decoding, EntitiesInstantiated)
                | (EntitiesInstantiated, Linking)
                | (Linking, Ready)
                | (Parsing | Decoding | EntitiesInstantiated | Linking, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Only ready scenes may be observed by game logic
    pub fn is_readable(self) -> bool {
        self == Self::Ready
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsing => "parsing",
            Self::Decoding => "decoding",
            Self::EntitiesInstantiated => "entities-instantiated",
            Self::Linking => "linking",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
