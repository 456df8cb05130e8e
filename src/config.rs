//! Project configuration (`.ezgo.yml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::copy::CopyFailurePolicy;

/// File name of the project configuration, looked up in the current directory.
pub const CONFIG_FILE: &str = ".ezgo.yml";

const TEMPLATE_HEADER: &str = "\
# Add conda-forge package names for your CGO project
#
# packages:
#   - glfw
#
# Add custom environment variables to be passed to the go compiler
#
# environment:
#   SOME_FLAG: \"true\"
#
# Keep copying runtime DLLs after a failed copy and report all failures at the end
#
# copy_failures: collect
";

/// Contents of `.ezgo.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Extra conda-forge packages installed into the toolchain environment.
    pub packages: Vec<String>,

    /// Extra environment variables for the go invocation.
    pub environment: BTreeMap<String, String>,

    /// Behaviour when a runtime DLL cannot be copied.
    pub copy_failures: CopyFailurePolicy,
}

impl ProjectConfig {
    /// Load the configuration file in `dir`.
    ///
    /// Returns `Ok(None)` if there is no configuration file.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg = Self::parse(&contents)
            .with_context(|| format!("could not parse {}", path.display()))?;
        Ok(Some(cfg))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Write the configuration file in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let contents = serde_yaml::to_string(self).context("failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Create a commented starter configuration in `dir`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init(dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            bail!("{} already exists.", CONFIG_FILE);
        }

        let starter = Self {
            environment: BTreeMap::from([("YOUR_VAR".to_string(), "your_value".to_string())]),
            ..Self::default()
        };
        let body = serde_yaml::to_string(&starter).context("failed to create default config")?;
        fs::write(&path, format!("{TEMPLATE_HEADER}{body}"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Append packages not already listed, keeping order.
    ///
    /// Returns the packages that were added.
    pub fn add_packages<I, S>(&mut self, packages: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for pkg in packages {
            let pkg = pkg.into();
            if !self.packages.contains(&pkg) {
                self.packages.push(pkg.clone());
                added.push(pkg);
            }
        }
        added
    }
}
