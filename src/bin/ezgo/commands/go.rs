//! Passthrough to the go tool, with DLL bundling after `go build`

use anyhow::{Context, Result};

use ezgo::config::{ProjectConfig, CONFIG_FILE};
use ezgo::process::ProcessBuilder;
use ezgo::provision::ensure_environment;
use ezgo::handle_post_build;

use super::process_env;

/// ezgo's own flag for `build`; never forwarded to go.
const NO_COPY_FLAG: &str = "-no-copy";

/// Remove `-no-copy` from `args`, reporting whether it was present.
fn take_no_copy(args: Vec<String>) -> (Vec<String>, bool) {
    let before = args.len();
    let kept: Vec<String> = args.into_iter().filter(|a| a != NO_COPY_FLAG).collect();
    let found = kept.len() != before;
    (kept, found)
}

pub fn execute(args: Vec<String>, quiet: bool) -> Result<i32> {
    let cwd = std::env::current_dir().context("could not get current working directory")?;
    let cfg = ProjectConfig::load(&cwd).with_context(|| format!("Error reading {CONFIG_FILE}"))?;

    // Packages are only installed by `ezgo pkg`; a build just needs the toolchain.
    let toolchain =
        ensure_environment(quiet, &[]).context("Failed to configure CGO environment")?;

    let go = which::which("go").context("Could not find 'go' executable in your system's PATH")?;

    let is_build = args.first().is_some_and(|a| a == "build");
    let (args, skip_copy) = if is_build {
        take_no_copy(args)
    } else {
        (args, false)
    };

    let status = ProcessBuilder::new(&go)
        .args(&args)
        .env_exact(toolchain.go_env(process_env(), cfg.as_ref())?)
        .cwd(&cwd)
        .status()?;

    if !status.success() {
        return Ok(status.code().unwrap_or(1));
    }

    if is_build {
        let policy = cfg.map(|c| c.copy_failures).unwrap_or_default();
        handle_post_build(&args, &toolchain, policy, quiet, skip_copy)
            .context("Post-build step failed")?;
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_take_no_copy() {
        let (args, skip) = take_no_copy(strings(&["build", "-no-copy", "-o", "app.exe"]));
        assert!(skip);
        assert_eq!(args, strings(&["build", "-o", "app.exe"]));

        let (args, skip) = take_no_copy(strings(&["build", "."]));
        assert!(!skip);
        assert_eq!(args, strings(&["build", "."]));
    }
}
