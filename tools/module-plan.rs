//! Inspect module activation for a module graph
//!
//! Reads a TOML module graph and either prints the dependency closure of a
//! module or performs a load and prints the declarations in replay order.
//!
//! Graph format:
//! ```toml
//! [[modules]]
//! name = "external"
//! requires = ["core"]
//!
//! [[modules.declarations]]
//! provider = "controller-provider"
//! operation = "register"
//! arguments = ["ExternalController", { heading = "External" }]
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use module_loader::utils::init_logging_from_config;
use module_loader::{
    Declaration, EngineConfig, ModuleDefinition, ModuleEngine, ModuleRegistry,
};
use module_loader::module::ModuleDependencies;

#[derive(Parser, Debug)]
#[command(name = "module-plan", about = "Inspect module dependency closures and load order")]
struct Args {
    /// Module graph (TOML)
    #[arg(long, short)]
    graph: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dependency closure of a module
    Closure { module: String },
    /// Load modules and print what was registered, in replay order
    Load {
        #[arg(required = true)]
        modules: Vec<String>,
    },
}

#[derive(Deserialize, Debug)]
struct GraphFile {
    #[serde(default)]
    modules: Vec<GraphModule>,
}

#[derive(Deserialize, Debug)]
struct GraphModule {
    name: String,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    declarations: Vec<Declaration>,
}

fn read_graph(path: &Path) -> anyhow::Result<ModuleRegistry> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read module graph {}", path.display()))?;
    let graph: GraphFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse module graph {}", path.display()))?;

    let mut registry = ModuleRegistry::new();
    for module in graph.modules {
        let definition = module
            .declarations
            .into_iter()
            .fold(ModuleDefinition::new(module.name).requires(module.requires), |def, d| {
                def.declare(d)
            });
        registry.insert(definition)?;
    }
    Ok(registry)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    init_logging_from_config(config.logging.as_ref());

    let registry = read_graph(&args.graph)?;
    info!("Read {} modules from {}", registry.len(), args.graph.display());

    match args.command {
        Command::Closure { module } => {
            let closure =
                ModuleDependencies::closure(&registry, &config.loader.base_module, &module)?;
            for name in closure {
                println!("{}", name);
            }
        }
        Command::Load { modules } => {
            let mut engine = ModuleEngine::new(registry, config.loader)?;
            let loaded = engine.load(modules)?;

            let capabilities = engine.capabilities();
            for registration in capabilities.read().registrations() {
                println!(
                    "{} {} {}",
                    registration.kind, registration.operation, registration.name
                );
            }
            println!("loaded: {}", loaded.names().join(", "));
            println!("active: {}", engine.loaded_modules().join(", "));
        }
    }

    Ok(())
}
