//! scenecheck - validate a scene against a schema catalogue
//!
//! Decodes and links the scene into a scratch world and reports every error.
//!
//! Usage: scenecheck <catalogue.toml> <scene.(json|toml)> [--prefabs <prefabs.toml>] [--config <loader.toml>] [--strict]
//!
//! `SCENECHECK_STRICT=1` has the same effect as `--strict`.

use std::process::ExitCode;
use void_decode::UnionMode;
use void_ecs::World;
use void_scene::{PrefabLibrary, SceneDefinition, SceneError, SceneLoader, SceneLoaderConfig};
use void_schema::SchemaRegistry;

struct Args {
    catalogue: String,
    scene: String,
    prefabs: Option<String>,
    config: Option<String>,
    strict: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut positional = Vec::new();
        let mut prefabs = None;
        let mut config = None;
        let mut strict = std::env::var("SCENECHECK_STRICT")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--strict" => strict = true,
                "--prefabs" => prefabs = Some(args.next().ok_or("--prefabs needs a path")?),
                "--config" => config = Some(args.next().ok_or("--config needs a path")?),
                flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        match (positional.next(), positional.next(), positional.next()) {
            (Some(catalogue), Some(scene), None) => Ok(Self {
                catalogue,
                scene,
                prefabs,
                config,
                strict,
            }),
            _ => Err("expected <catalogue.toml> <scene>".to_string()),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("scenecheck: {}", message);
            eprintln!(
                "usage: scenecheck <catalogue.toml> <scene.(json|toml)> [--prefabs <file>] [--config <file>] [--strict]"
            );
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(entities) => {
            println!("{}: ok ({} entities)", args.scene, entities);
            ExitCode::SUCCESS
        }
        Err(SceneError::Decode(errors)) => {
            for error in &errors {
                println!("{}: {}", args.scene, error);
            }
            println!("{}: {} component(s) failed to decode", args.scene, errors.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("{}: {}", args.scene, e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize, SceneError> {
    let registry = SchemaRegistry::from_toml_str(&std::fs::read_to_string(&args.catalogue)?)?;
    log::info!("Loaded {} types from {}", registry.len(), args.catalogue);

    let prefabs = match &args.prefabs {
        Some(path) => PrefabLibrary::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => PrefabLibrary::new(),
    };

    let mut config = match &args.config {
        Some(path) => SceneLoaderConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => SceneLoaderConfig::default(),
    };
    if args.strict {
        config.decoder = config.decoder.with_union_mode(UnionMode::Strict);
    }

    let definition = SceneDefinition::load(&args.scene)?;
    let mut world = World::new();
    let loaded = SceneLoader::with_config(&registry, &prefabs, config).load(&definition, &mut world)?;
    Ok(loaded.len())
}
