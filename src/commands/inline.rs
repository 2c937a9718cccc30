/// `csxdeps inline` command implementation
use anyhow::{Context, Result};

use crate::cli::InlineArgs;
use crate::merger::MergedConfig;

pub fn run(args: &InlineArgs, config: &MergedConfig) -> Result<()> {
    let working_dir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let name = args.name.as_deref().unwrap_or(&config.project_name);

    let info = super::provider(config)
        .build_for_inline_code(&args.code, &working_dir, &config.target_framework, Some(name))
        .context("Failed to create project for inline code")?;
    super::report_project(&info);
    Ok(())
}
