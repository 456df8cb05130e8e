//! CGO build environment for Windows.
//!
//! Provisions a MinGW-w64 toolchain through micromamba, builds the compiler
//! environment for `go`, and after a successful build copies every non-system
//! DLL the executable needs next to it.
//!
//! Imports are read with `objdump -p`, which parses the PE import table
//! directly, so the executable never has to run on the host.

mod analyze;
mod copy;
mod error;
mod library;
mod paths;
mod postbuild;
mod resolve;

pub mod config;
pub mod env;
pub mod process;
pub mod provision;
pub mod report;

pub use analyze::{
    get_library_dependencies, is_system_library, parse_objdump_output, Inspector,
    ObjdumpInspector, SYSTEM_LIBRARIES,
};
pub use copy::{copy_libraries, copy_library, CopyFailurePolicy};
pub use error::ResolveError;
pub use library::LibrarySet;
pub use paths::{locate_output, SearchPaths, DEFAULT_OUTPUT_SUFFIX};
pub use postbuild::{bundle_runtime, handle_post_build, resolve_and_copy};
pub use resolve::{resolve_dependencies, Traversal};
