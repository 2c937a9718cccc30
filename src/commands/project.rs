/// `csxdeps project` command implementation
use anyhow::{Context, Result};

use crate::cli::ProjectArgs;
use crate::merger::MergedConfig;

pub fn run(args: &ProjectArgs, config: &MergedConfig) -> Result<()> {
    let provider = super::provider(config);

    if let Some(dir) = &args.dir {
        let explicit_files = (!args.files.is_empty()).then_some(args.files.as_slice());
        let project = provider
            .build_for_directory(
                dir,
                explicit_files,
                &config.target_framework,
                args.allow_without_csproj,
            )
            .with_context(|| format!("Failed to create project for {}", dir.display()))?;

        match project {
            Some(info) => super::report_project(&info),
            None => println!("no project"),
        }
        return Ok(());
    }

    let Some(script) = &args.script else {
        anyhow::bail!("Either a script or --dir is required");
    };

    let info = provider
        .build_for_single_file(script, &config.target_framework)
        .with_context(|| format!("Failed to create project for {}", script.display()))?;
    super::report_project(&info);
    Ok(())
}
