//! Library search paths and build output location.

use std::path::{Path, PathBuf};

/// Suffix the Go toolchain gives executables built for Windows.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".exe";

/// Ordered directories searched for a DLL by file name.
///
/// Earlier directories shadow later ones, so package-local libraries must
/// come before the toolchain's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find a library in the search directories.
    ///
    /// Returns the first existing `<dir>/<lib_name>`, or `None` if the library
    /// is not in any directory.
    #[must_use = "found library path should be used"]
    pub fn find_library(&self, lib_name: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(lib_name))
            .find(|p| p.is_file())
    }
}

/// Work out where `go build` wrote its executable.
///
/// Honours `-o <path>` and `-o=<path>`. Relative paths are taken from `cwd`.
/// Without `-o` the Go convention applies: `<cwd>/<basename of cwd>.exe`.
pub fn locate_output(args: &[String], cwd: &Path) -> PathBuf {
    let explicit = args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "-o" {
            args.get(i + 1).cloned()
        } else {
            arg.strip_prefix("-o=").map(str::to_string)
        }
    });

    match explicit {
        Some(path) => cwd.join(path),
        None => {
            let stem = cwd
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            cwd.join(format!("{stem}{DEFAULT_OUTPUT_SUFFIX}"))
        }
    }
}
