//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ezgo - A CGO-aware wrapper for the Go compiler on Windows
#[derive(Parser)]
#[command(name = "ezgo")]
#[command(version, about, long_about = None, arg_required_else_help = true)]
#[command(after_help = "Examples:\n  ezgo build -o myapp.exe .\n  ezgo build -no-copy .\n  ezgo pkg add glfw")]
pub struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or remove the ezgo cache
    Env(EnvArgs),

    /// Manage the project configuration file
    Mod(ModArgs),

    /// Manage conda-forge packages for the project
    Pkg(PkgArgs),

    /// Start an interactive shell with the CGO environment
    Shell(ShellArgs),

    /// Any other go command, run with the CGO environment
    #[command(external_subcommand)]
    Go(Vec<String>),
}

#[derive(Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub action: EnvAction,
}

#[derive(Subcommand)]
pub enum EnvAction {
    /// Remove the cache directory, including the toolchain
    Clean,
    /// Print the cache directory
    Path,
    /// Print the compiler variables passed to go
    Vars,
}

#[derive(Args)]
pub struct ModArgs {
    #[command(subcommand)]
    pub action: ModAction,
}

#[derive(Subcommand)]
pub enum ModAction {
    /// Create .ezgo.yml in the current directory
    Init,
}

#[derive(Args)]
pub struct PkgArgs {
    #[command(subcommand)]
    pub action: PkgAction,
}

#[derive(Subcommand)]
pub enum PkgAction {
    /// Add packages to .ezgo.yml and install them
    Add {
        /// conda-forge package names
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Install every package listed in .ezgo.yml
    Tidy,
}

#[derive(Args)]
pub struct ShellArgs {
    /// Shell to start (defaults to cmd on Windows, $SHELL elsewhere)
    #[arg(value_enum)]
    pub shell: Option<ShellKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    Cmd,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_command_goes_to_go() {
        let cli = Cli::try_parse_from(["ezgo", "-q", "build", "-o", "app.exe", "-no-copy"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Go(args) => assert_eq!(args, ["build", "-o", "app.exe", "-no-copy"]),
            _ => panic!("expected passthrough"),
        }
    }

    #[test]
    fn test_pkg_add_requires_packages() {
        assert!(Cli::try_parse_from(["ezgo", "pkg", "add"]).is_err());
        let cli = Cli::try_parse_from(["ezgo", "pkg", "add", "glfw", "sdl2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Pkg(PkgArgs { action: PkgAction::Add { ref packages } }) if packages.len() == 2
        ));
    }

    #[test]
    fn test_shell_kind() {
        let cli = Cli::try_parse_from(["ezgo", "shell", "powershell"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Shell(ShellArgs { shell: Some(ShellKind::Powershell) })
        ));
    }
}
