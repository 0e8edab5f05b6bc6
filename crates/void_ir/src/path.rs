//! Field paths into literal trees and decoded values

use std::fmt;

/// A single step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldStep {
    /// Named record/struct field (or union variant selector)
    Field(String),
    /// Tuple/array/list element
    Index(usize),
}

impl From<&str> for FieldStep {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for FieldStep {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for FieldStep {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Route from a component root to a nested node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    steps: Vec<FieldStep>,
}

impl FieldPath {
    /// The empty path (the component root itself)
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    /// Build a path from a sequence of steps
    pub fn from_steps(steps: impl IntoIterator<Item = impl Into<FieldStep>>) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, step: impl Into<FieldStep>) {
        self.steps.push(step.into());
    }

    pub fn pop(&mut self) -> Option<FieldStep> {
        self.steps.pop()
    }

    /// Prepend a step; used while an error unwinds out of nested decodes
    pub fn prepend(&mut self, step: FieldStep) {
        self.steps.insert(0, step);
    }

    /// A copy of this path extended by one step
    pub fn child(&self, step: impl Into<FieldStep>) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                FieldStep::Field(name) if i == 0 => write!(f, "{}", name)?,
                FieldStep::Field(name) => write!(f, ".{}", name)?,
                FieldStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
