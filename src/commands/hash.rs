/// `csxdeps hash` command implementation
///
/// Prints the execution cache key of a script on stdout. Scripts that cannot
/// be cached get an explicit diagnostic naming the floating packages instead.
use anyhow::{Context, Result};

use crate::cli::HashArgs;
use crate::cli_utils::csxdeps_prefix;
use crate::merger::MergedConfig;
use crate::script::{try_create_hash, ExecutionCache, HashOutcome, HashRequest};

pub fn run(args: &HashArgs, config: &MergedConfig) -> Result<()> {
    let provider = super::provider(config);
    let package_sources = if args.sources.is_empty() {
        &config.package_sources
    } else {
        &args.sources
    };

    let request = HashRequest {
        script: &args.script,
        args: &args.script_args,
        optimization: args.optimization,
        package_sources,
        target_framework: &config.target_framework,
        no_cache: args.no_cache,
    };
    let outcome = try_create_hash(&provider, &request)
        .with_context(|| format!("Failed to hash {}", args.script.display()))?;

    match &outcome {
        HashOutcome::Disabled => println!("caching disabled"),
        HashOutcome::NotCacheable { floating } => {
            println!("not cacheable");
            for reference in floating {
                eprintln!(
                    "{} package {} uses floating version '{}'; pin an exact version to enable caching",
                    csxdeps_prefix(),
                    reference.id,
                    reference.version
                );
            }
        }
        HashOutcome::Created(hash) => {
            println!("{}", hash);
            if args.check {
                let cache = ExecutionCache::new(&config.cache_dir);
                match cache.lookup(&args.script, hash)? {
                    Some(artifact) => println!("cached: {}", artifact.display()),
                    None => println!("not cached"),
                }
            }
        }
    }

    Ok(())
}
