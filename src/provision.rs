//! Toolchain acquisition through micromamba.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::env::{self, CgoEnvironment, CHANNEL, PYTHON_VERSION, TOOLCHAIN_PACKAGE};
use crate::process::ProcessBuilder;

/// Environment variable naming an explicit micromamba executable.
pub const MAMBA_EXE_VAR: &str = "MAMBA_EXE";

/// Find a micromamba executable.
///
/// Order: `$MAMBA_EXE`, `<cache_root>/bin/micromamba`, then `PATH`.
pub fn find_micromamba(cache_root: &Path) -> Result<PathBuf> {
    if let Some(explicit) = std::env::var_os(MAMBA_EXE_VAR) {
        let explicit = PathBuf::from(explicit);
        if explicit.is_file() {
            return Ok(explicit);
        }
        bail!(
            "{} points to {}, which does not exist",
            MAMBA_EXE_VAR,
            explicit.display()
        );
    }

    let cached = cache_root
        .join("bin")
        .join(format!("micromamba{EXE_SUFFIX}"));
    if cached.is_file() {
        return Ok(cached);
    }

    which::which("micromamba").with_context(|| {
        format!(
            "micromamba not found. Install it, put it on PATH, set {} or place it at {}",
            MAMBA_EXE_VAR,
            cached.display()
        )
    })
}

/// A micromamba-managed conda environment.
#[derive(Debug, Clone)]
pub struct MambaEnv {
    micromamba: PathBuf,
    root_prefix: PathBuf,
    prefix: PathBuf,
    quiet: bool,
}

impl MambaEnv {
    pub fn new(micromamba: PathBuf, root_prefix: PathBuf, prefix: PathBuf, quiet: bool) -> Self {
        Self {
            micromamba,
            root_prefix,
            prefix,
            quiet,
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn exists(&self) -> bool {
        self.prefix.is_dir()
    }

    fn command(&self, subcommand: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.micromamba)
            .arg(subcommand)
            .arg("-y")
            .arg("-r")
            .arg(&self.root_prefix)
            .arg("-p")
            .arg(&self.prefix)
            .args(["-c", CHANNEL])
    }

    fn run(&self, cmd: ProcessBuilder) -> Result<()> {
        if self.quiet {
            cmd.exec_and_check()?;
        } else {
            cmd.status_and_check()?;
        }
        Ok(())
    }

    /// Create the environment with the pinned python.
    pub fn create(&self) -> Result<()> {
        tracing::debug!("ezgo: creating environment at {}", self.prefix.display());
        self.run(self.command("create").arg(format!("python={PYTHON_VERSION}")))
            .with_context(|| format!("error creating environment {}", self.prefix.display()))
    }

    pub fn install(&self, package: &str) -> Result<()> {
        tracing::debug!("ezgo: installing {package} into {}", self.prefix.display());
        self.run(self.command("install").arg(package))
            .with_context(|| format!("error installing package {package}"))
    }
}

/// Make sure the toolchain and `packages` are installed, returning its layout.
///
/// The first call creates the environment and installs the MinGW toolchain,
/// which can take a few minutes.
pub fn ensure_environment(quiet: bool, packages: &[String]) -> Result<CgoEnvironment> {
    let cache_root = env::cache_root()?;
    let prefix = env::env_dir(&cache_root);
    let micromamba = find_micromamba(&cache_root)?;
    let mamba = MambaEnv::new(micromamba, cache_root, prefix, quiet);
    provision(&mamba, packages)
}

/// Bring `mamba` up to a usable toolchain plus `packages`.
///
/// An environment left behind by an interrupted install is detected by the
/// missing compiler, and the toolchain install is retried.
pub fn provision(mamba: &MambaEnv, packages: &[String]) -> Result<CgoEnvironment> {
    let quiet = mamba.quiet;
    let cgo = CgoEnvironment::from_env_path(mamba.prefix());

    if !mamba.exists() {
        if !quiet {
            tracing::info!(
                "ezgo: First run detected. Setting up CGO toolchain (this may take a few minutes)..."
            );
        }
        mamba.create()?;
    }

    if !cgo.has_toolchain() {
        if !quiet {
            tracing::info!("ezgo: Installing {TOOLCHAIN_PACKAGE}...");
        }
        mamba.install(TOOLCHAIN_PACKAGE)?;
        if !quiet {
            tracing::info!("ezgo: Toolchain installation complete.");
        }
    }

    if !packages.is_empty() {
        if !quiet {
            tracing::info!("ezgo: Ensuring project-specific dependencies are installed...");
        }
        for pkg in packages {
            mamba
                .install(pkg)
                .with_context(|| format!("error installing project package {pkg}"))?;
        }
    }

    Ok(cgo)
}
