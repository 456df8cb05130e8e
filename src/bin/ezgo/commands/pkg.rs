//! `ezgo pkg` command

use anyhow::{Context, Result};

use ezgo::config::{ProjectConfig, CONFIG_FILE};
use ezgo::provision::ensure_environment;

use crate::cli::{PkgAction, PkgArgs};

pub fn execute(args: PkgArgs, quiet: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("could not get current working directory")?;
    let mut cfg = ProjectConfig::load(&cwd)
        .with_context(|| format!("Error reading {CONFIG_FILE}"))?
        .with_context(|| format!("{CONFIG_FILE} not found. Run 'ezgo mod init' first."))?;

    match args.action {
        PkgAction::Add { packages } => {
            let added = cfg.add_packages(packages);
            if added.is_empty() {
                tracing::info!("ezgo: all specified packages already exist in {CONFIG_FILE}.");
                return Ok(());
            }
            tracing::info!("ezgo: added {} to {CONFIG_FILE}", added.join(", "));
            cfg.save(&cwd)?;

            ensure_environment(quiet, &added).context("Failed to install new packages")?;
            tracing::info!("ezgo: Environment updated successfully.");
        }
        PkgAction::Tidy => {
            tracing::info!("ezgo: Tidying environment...");
            ensure_environment(quiet, &cfg.packages)
                .with_context(|| format!("Failed to sync environment with {CONFIG_FILE}"))?;
            tracing::info!("ezgo: Environment is up to date.");
        }
    }

    Ok(())
}
