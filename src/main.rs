//! docproxy CLI - stand-in generator
//!
//! Usage: docproxy <COMMAND>
//!
//! Commands:
//!   generate  Generate stand-ins for every mapped document type
//!   resolve   Print the document type a stand-in name stands for

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use docproxy::config::Config;
use docproxy::infrastructure::{InMemoryStore, LocalFs, MappingFile};
use docproxy::{ClassNameResolver, MetadataSource, ProxyFactory};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            mapping,
            dest,
            namespace,
            config,
        } => cmd_generate(
            mapping.as_deref(),
            dest.as_deref(),
            namespace,
            config.as_deref(),
            cli.json,
        ),
        Commands::Resolve { name } => cmd_resolve(&name, cli.json),
    }
}

/// `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docproxy={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)
                .with_context(|| format!("loading {}", path.display()))?;
            for warning in warnings {
                let hint = warning
                    .suggestion
                    .map(|s| format!(" (did you mean '{}'?)", s))
                    .unwrap_or_default();
                eprintln!(
                    "warning: unknown key '{}' in {}{}",
                    warning.key,
                    warning.file.display(),
                    hint
                );
            }
            Ok(config.with_env_overrides()?)
        }
        None => {
            let cwd = std::env::current_dir()?;
            Ok(Config::load_or_default(Some(&cwd))?)
        }
    }
}

fn cmd_generate(
    mapping: Option<&Path>,
    dest: Option<&Path>,
    namespace: Option<String>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(dest) = dest {
        config.proxy.dir = Some(dest.to_path_buf());
    }
    if let Some(namespace) = namespace {
        config.proxy.namespace = Some(namespace);
    }
    if let Some(mapping) = mapping {
        config.mapping.path = Some(mapping.to_path_buf());
    }

    let mapping_path = config
        .mapping
        .path
        .clone()
        .context("no mapping file given (use --mapping or [mapping] path)")?;
    let metadata = MappingFile::load(&mapping_path)?.into_metadata(&mapping_path)?;
    let metadata = Arc::new(metadata);
    let classes = metadata.all_class_descriptors();

    let factory = ProxyFactory::new(
        config.factory_config()?,
        metadata,
        Arc::new(InMemoryStore::new()),
        Arc::new(LocalFs::new()),
    )?;
    let dir = factory.config().dir().to_path_buf();

    let count = factory.generate_proxy_classes(classes.iter().map(|c| c.as_ref()), None)?;

    if json {
        let output = serde_json::json!({
            "event": "generated",
            "count": count,
            "skipped": classes.len() - count,
            "dir": dir.display().to_string(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Generated {} stand-in(s) in {} ({} skipped)",
            count,
            dir.display(),
            classes.len() - count
        );
    }

    Ok(())
}

fn cmd_resolve(name: &str, json: bool) -> Result<()> {
    let resolver = ClassNameResolver::new();
    let target = resolver.resolve(name);

    if json {
        let output = serde_json::json!({
            "event": "resolved",
            "name": name,
            "target": target,
            "stand_in": resolver.is_stand_in(name),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", target);
    }

    Ok(())
}
