//! `ezgo env` command

use std::fs;

use anyhow::{Context, Result};

use ezgo::env::{cache_root, is_compiler_var};
use ezgo::provision::ensure_environment;

use super::process_env;
use crate::cli::{EnvAction, EnvArgs};

pub fn execute(args: EnvArgs, quiet: bool) -> Result<()> {
    let cache_root = cache_root()?;

    match args.action {
        EnvAction::Clean => {
            if !cache_root.exists() {
                tracing::info!("ezgo: cache directory does not exist. Nothing to do.");
                return Ok(());
            }
            tracing::info!("ezgo: Removing cache directory: {}", cache_root.display());
            fs::remove_dir_all(&cache_root)
                .with_context(|| format!("Failed to remove cache directory {}", cache_root.display()))?;
            tracing::info!("ezgo: Cache cleaned successfully.");
        }
        EnvAction::Path => println!("{}", cache_root.display()),
        EnvAction::Vars => {
            let toolchain = ensure_environment(quiet, &[])
                .context("Failed to setup environment to read variables")?;
            for (name, value) in toolchain.go_env(process_env(), None)? {
                if is_compiler_var(&name) {
                    println!("{name}={value}");
                }
            }
        }
    }

    Ok(())
}
