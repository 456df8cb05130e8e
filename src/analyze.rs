//! PE import analysis using objdump.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ResolveError;
use crate::library::LibrarySet;

/// DLLs shipped with every Windows installation. These are never tracked or copied.
pub const SYSTEM_LIBRARIES: &[&str] = &[
    "advapi32.dll",
    "comdlg32.dll",
    "gdi32.dll",
    "kernel32.dll",
    "msvcrt.dll",
    "ole32.dll",
    "oleaut32.dll",
    "shell32.dll",
    "user32.dll",
    "winmm.dll",
    "ws2_32.dll",
    "ntdll.dll",
    "rpcrt4.dll",
    "shlwapi.dll",
];

const IMPORT_MARKER: &str = "DLL Name:";

/// Whether `name` is one of [`SYSTEM_LIBRARIES`], ignoring case.
pub fn is_system_library(name: &str) -> bool {
    SYSTEM_LIBRARIES
        .iter()
        .any(|sys| sys.eq_ignore_ascii_case(name))
}

/// Something that can list the DLLs a binary imports directly.
pub trait Inspector {
    /// Direct, non-system imports of `binary`.
    fn inspect(&self, binary: &Path) -> Result<LibrarySet, ResolveError>;
}

/// [`Inspector`] backed by an `objdump`-compatible executable.
#[derive(Debug, Clone)]
pub struct ObjdumpInspector {
    tool: PathBuf,
}

impl ObjdumpInspector {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Inspector for ObjdumpInspector {
    fn inspect(&self, binary: &Path) -> Result<LibrarySet, ResolveError> {
        get_library_dependencies(binary, &self.tool)
    }
}

/// Extract DLL imports from a PE binary by running `objdump -p`.
///
/// objdump reads the import table straight from the file, so this works for
/// binaries that cannot run on the host.
///
/// # Errors
///
/// Returns an error if the tool cannot be started or exits unsuccessfully.
/// Nothing is returned for a partially read report.
#[must_use = "library dependencies should be processed"]
pub fn get_library_dependencies(
    binary_path: &Path,
    tool: &Path,
) -> Result<LibrarySet, ResolveError> {
    let output = Command::new(tool)
        .arg("-p")
        .arg(binary_path)
        .output()
        .map_err(|source| ResolveError::ToolSpawn {
            tool: tool.to_path_buf(),
            binary: binary_path.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(ResolveError::ToolFailed {
            tool: tool.to_path_buf(),
            binary: binary_path.to_path_buf(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_objdump_output(&stdout))
}

/// Parse `objdump -p` output into the set of imported, non-system DLLs.
///
/// Example objdump output:
/// ```text
/// The Import Tables (interpreted .idata section contents)
///  vma:            Hint    Time      Forward  DLL       First
///                  Table   Stamp     Chain    Name      Thunk
///  0001d000       0001d07c 00000000 00000000 0001d9d8 0001d2ac
///
///         DLL Name: KERNEL32.dll
///         vma:  Hint/Ord Member-Name Bound-To
///
///         DLL Name: libglfw3.dll
/// ```
pub fn parse_objdump_output(output: &str) -> LibrarySet {
    let mut libs = LibrarySet::new();

    for line in output.lines() {
        let Some(rest) = line.trim().strip_prefix(IMPORT_MARKER) else {
            continue;
        };
        let name = rest.trim();
        if name.is_empty() || is_system_library(name) {
            continue;
        }
        libs.insert(name);
    }

    libs
}
