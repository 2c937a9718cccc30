/// `csxdeps cache` command implementation
///
/// Inspects and clears the execution cache.
use anyhow::Result;

use crate::cli::CacheCommands;
use crate::merger::MergedConfig;
use crate::script::ExecutionCache;

pub fn run(command: &CacheCommands, config: &MergedConfig) -> Result<()> {
    let cache = ExecutionCache::new(&config.cache_dir);

    match command {
        CacheCommands::List { verbose } => list(&cache, *verbose),
        CacheCommands::Clean => clean(&cache),
    }
}

fn list(cache: &ExecutionCache, verbose: bool) -> Result<()> {
    let entries = cache.list()?;
    if entries.is_empty() {
        println!("No cached scripts");
        return Ok(());
    }

    for entry in &entries {
        match (&entry.metadata, verbose) {
            (Some(metadata), true) => {
                println!("{}", metadata.script_path);
                println!("  Hash: {}", metadata.hash);
                println!(
                    "  Created: {}",
                    metadata.created_at.format("%Y-%m-%d %H:%M:%S")
                );
                println!("  Size: {} bytes", metadata.artifact_size_bytes);
                println!("  Entry: {}", entry.dir.display());
            }
            (Some(metadata), false) => println!("{}  {}", metadata.hash, metadata.script_path),
            (None, _) => println!("{}", entry.dir.display()),
        }
    }

    println!();
    println!("Total: {} cached script(s)", entries.len());
    Ok(())
}

fn clean(cache: &ExecutionCache) -> Result<()> {
    let removed = cache.clean()?;
    println!("Removed {} cached script(s)", removed);
    Ok(())
}
