/// `csxdeps entry-points` command implementation
use anyhow::{Context, Result};

use crate::cli::EntryPointsArgs;
use crate::merger::MergedConfig;
use crate::script::BundledScriptResolver;

pub fn run(args: &EntryPointsArgs, config: &MergedConfig) -> Result<()> {
    let supported_framework = args
        .supported_framework
        .as_deref()
        .unwrap_or(&config.supported_framework);
    let resolver = BundledScriptResolver::new(supported_framework);

    let scripts = resolver.resolve(&args.package_root).with_context(|| {
        format!(
            "Failed to scan package directory: {}",
            args.package_root.display()
        )
    })?;

    for script in &scripts {
        println!("{}", script.display());
    }
    Ok(())
}
