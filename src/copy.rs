//! Copying resolved DLLs next to the build output.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::library::LibrarySet;
use crate::paths::SearchPaths;
use crate::report::{Event, Reporter};

/// What to do when a located DLL cannot be copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyFailurePolicy {
    /// Stop at the first failed copy.
    #[default]
    Abort,
    /// Keep copying, then fail with every error collected.
    Collect,
}

/// Copy one DLL from the search paths into `dest_dir`, keeping its file name.
///
/// Returns `Ok(false)` if the library is not in any search path. An existing
/// destination file is overwritten, unless it is the located file itself.
pub fn copy_library(
    search_paths: &SearchPaths,
    lib_name: &str,
    dest_dir: &Path,
    reporter: &dyn Reporter,
) -> Result<bool, ResolveError> {
    let Some(src) = search_paths.find_library(lib_name) else {
        return Ok(false);
    };

    let dst = dest_dir.join(lib_name);
    if is_same_file(&src, &dst) {
        reporter.report(Event::InPlace {
            name: lib_name.to_string(),
        });
        return Ok(true);
    }

    fs::copy(&src, &dst).map_err(|source| ResolveError::Copy {
        name: lib_name.to_string(),
        src: src.clone(),
        dst,
        source,
    })?;

    reporter.report(Event::Copied {
        name: lib_name.to_string(),
        src,
    });
    Ok(true)
}

/// `fs::copy` onto its own source truncates it to zero bytes.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy every library in `libs` into `dest_dir`.
///
/// Libraries that cannot be located are reported and skipped. Returns the
/// number of files copied.
pub fn copy_libraries(
    libs: &LibrarySet,
    search_paths: &SearchPaths,
    dest_dir: &Path,
    policy: CopyFailurePolicy,
    reporter: &dyn Reporter,
) -> Result<usize, ResolveError> {
    let mut copied = 0;
    let mut failures = Vec::new();

    for name in libs.iter() {
        match copy_library(search_paths, name, dest_dir, reporter) {
            Ok(true) => copied += 1,
            Ok(false) => reporter.report(Event::Missing {
                name: name.to_string(),
            }),
            Err(e) => match policy {
                CopyFailurePolicy::Abort => return Err(e),
                CopyFailurePolicy::Collect => failures.push(e),
            },
        }
    }

    reporter.report(Event::CopyComplete { copied });

    if failures.is_empty() {
        Ok(copied)
    } else {
        Err(ResolveError::CopyFailures(failures))
    }
}
