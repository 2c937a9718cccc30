use anyhow::Result;
use clap::Parser;

use csxdeps::cli::{Cli, Commands};
use csxdeps::{commands, config_discovery, logging, merger::MergedConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = config_discovery::load_config_with_discovery(cli.global.config.as_deref())?;
    let config_path = loaded.as_ref().map(|loaded| loaded.path.clone());
    let config = MergedConfig::merge(&cli.global, loaded.map(|loaded| loaded.config));

    logging::init(config.verbosity());

    if let Some(path) = &config_path {
        tracing::debug!(
            operation = "config.discover",
            path = %path.display(),
            "using configuration file"
        );
    }

    match &cli.command {
        Commands::Project(args) => commands::project::run(args, &config),
        Commands::Inline(args) => commands::inline::run(args, &config),
        Commands::Hash(args) => commands::hash::run(args, &config),
        Commands::EntryPoints(args) => commands::entry_points::run(args, &config),
        Commands::Cache(args) => commands::cache::run(&args.command, &config),
        Commands::Config(args) => commands::config::run(&args.command, &config),
    }
}
