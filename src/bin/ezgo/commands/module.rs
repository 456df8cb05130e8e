//! `ezgo mod` command

use anyhow::{Context, Result};

use ezgo::config::{ProjectConfig, CONFIG_FILE};

use crate::cli::{ModAction, ModArgs};

pub fn execute(args: ModArgs) -> Result<()> {
    match args.action {
        ModAction::Init => {
            let cwd = std::env::current_dir().context("could not get current working directory")?;
            ProjectConfig::init(&cwd)?;
            tracing::info!("ezgo: created {CONFIG_FILE}");
        }
    }
    Ok(())
}
