//! `ezgo shell` command

use anyhow::{Context, Result};

use ezgo::process::ProcessBuilder;
use ezgo::provision::ensure_environment;

use super::process_env;
use crate::cli::{ShellArgs, ShellKind};

fn shell_program(kind: Option<ShellKind>) -> String {
    match kind {
        Some(ShellKind::Cmd) => "cmd.exe".to_string(),
        Some(ShellKind::Powershell) => "powershell.exe".to_string(),
        None if cfg!(windows) => "cmd.exe".to_string(),
        None => std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string()),
    }
}

pub fn execute(args: ShellArgs, quiet: bool) -> Result<i32> {
    let toolchain =
        ensure_environment(quiet, &[]).context("could not setup environment for shell command")?;

    let program = shell_program(args.shell);
    let shell_path = which::which(&program)
        .with_context(|| format!("could not find '{program}' in your system's PATH"))?;

    tracing::info!("ezgo: Starting interactive {program} shell with CGO environment...");

    let status = ProcessBuilder::new(&shell_path)
        .env_exact(toolchain.go_env(process_env(), None)?)
        .status()
        .context("failed to start interactive shell")?;

    tracing::info!("ezgo: Shell session ended.");
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_shell() {
        assert_eq!(shell_program(Some(ShellKind::Cmd)), "cmd.exe");
        assert_eq!(shell_program(Some(ShellKind::Powershell)), "powershell.exe");
    }
}
