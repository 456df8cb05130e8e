//! Toolchain layout and the compiler environment built from it.

use std::collections::BTreeMap;
use std::env::consts::EXE_SUFFIX;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ProjectConfig;
use crate::paths::SearchPaths;

/// Name of the managed conda environment.
pub const ENV_NAME: &str = "cgo_win_env_py312";
/// Python version pinned in the managed environment.
pub const PYTHON_VERSION: &str = "3.12";
/// Channel every package is installed from.
pub const CHANNEL: &str = "conda-forge";
/// Package providing the MinGW-w64 compilers and binutils.
pub const TOOLCHAIN_PACKAGE: &str = "m2w64-toolchain_win-64";

const MINGW_TRIPLET: &str = "x86_64-w64-mingw32";

/// Root directory for all ezgo cache and environment data.
pub fn cache_root() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().context("could not get user home directory")?;
    Ok(dirs.home_dir().join(".cache").join("ezgo"))
}

/// Directory of the managed environment under `cache_root`.
pub fn env_dir(cache_root: &Path) -> PathBuf {
    cache_root.join("envs").join(ENV_NAME)
}

/// Paths inside a provisioned MinGW environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgoEnvironment {
    /// Root of the conda environment.
    pub env_path: PathBuf,
    /// `gcc`, `g++`, `objdump` and friends.
    pub compiler_bin: PathBuf,
    /// Target-prefixed binutils and toolchain runtime DLLs.
    pub tool_bin: PathBuf,
    pub include: PathBuf,
    pub lib: PathBuf,
}

impl CgoEnvironment {
    pub fn from_env_path(env_path: impl Into<PathBuf>) -> Self {
        let env_path = env_path.into();
        let mingw_root = env_path.join("Library").join("mingw-w64");
        let target = mingw_root.join(MINGW_TRIPLET);

        Self {
            compiler_bin: mingw_root.join("bin"),
            tool_bin: target.join("bin"),
            include: target.join("include"),
            lib: target.join("lib"),
            env_path,
        }
    }

    fn package_root(&self) -> PathBuf {
        self.env_path.join("Library")
    }

    pub fn package_bin(&self) -> PathBuf {
        self.package_root().join("bin")
    }

    pub fn package_include(&self) -> PathBuf {
        self.package_root().join("include")
    }

    pub fn package_lib(&self) -> PathBuf {
        self.package_root().join("lib")
    }

    /// Directories searched for runtime DLLs, package libraries first.
    pub fn search_paths(&self) -> SearchPaths {
        SearchPaths::new([self.package_bin(), self.tool_bin.clone()])
    }

    /// The `objdump` used to read import tables.
    pub fn objdump(&self) -> PathBuf {
        self.compiler_bin.join(format!("objdump{EXE_SUFFIX}"))
    }

    /// Whether the compiler and objdump are both present.
    pub fn has_toolchain(&self) -> bool {
        self.objdump().is_file()
            && self.compiler_bin
                .join(format!("gcc{EXE_SUFFIX}"))
                .is_file()
    }

    /// Compiler variables that always win over user settings.
    pub fn cgo_vars(&self, inherited_path: Option<OsString>) -> Result<BTreeMap<String, String>> {
        let mut dirs = vec![
            self.compiler_bin.clone(),
            self.package_bin(),
            self.tool_bin.clone(),
            self.env_path.clone(),
        ];
        if let Some(path) = inherited_path {
            dirs.extend(std::env::split_paths(&path));
        }
        let path = std::env::join_paths(dirs).context("toolchain path contains a separator")?;

        Ok(BTreeMap::from([
            ("CGO_ENABLED".to_string(), "1".to_string()),
            (
                "CC".to_string(),
                self.compiler_bin
                    .join(format!("gcc{EXE_SUFFIX}"))
                    .display()
                    .to_string(),
            ),
            (
                "CXX".to_string(),
                self.compiler_bin
                    .join(format!("g++{EXE_SUFFIX}"))
                    .display()
                    .to_string(),
            ),
            ("PATH".to_string(), path.to_string_lossy().into_owned()),
            (
                "CGO_CFLAGS".to_string(),
                format!(
                    "-I{} -I{}",
                    self.package_include().display(),
                    self.include.display()
                ),
            ),
            (
                "CGO_LDFLAGS".to_string(),
                format!("-L{} -L{}", self.package_lib().display(), self.lib.display()),
            ),
        ]))
    }

    /// Environment for the go invocation.
    ///
    /// Layers, later wins: `base`, the project's `environment` overrides, then
    /// [`cgo_vars`](Self::cgo_vars). Names are upper-cased so that Windows'
    /// case-insensitive variables collapse to one entry.
    pub fn go_env<I>(&self, base: I, cfg: Option<&ProjectConfig>) -> Result<Vec<(String, String)>>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: BTreeMap<String, String> = base
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();

        if let Some(cfg) = cfg {
            for (k, v) in &cfg.environment {
                vars.insert(k.to_uppercase(), v.clone());
            }
        }

        let inherited_path = vars.get("PATH").map(OsString::from);
        vars.extend(self.cgo_vars(inherited_path)?);

        Ok(vars.into_iter().collect())
    }
}

/// Whether the variable `name` is shown by `ezgo env vars`.
pub fn is_compiler_var(name: &str) -> bool {
    name.starts_with("CGO_") || name == "CC" || name == "CXX"
}
