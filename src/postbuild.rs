//! Post-build step: bundle every runtime DLL next to the built executable.

use std::path::{Path, PathBuf};

use crate::analyze::{Inspector, ObjdumpInspector};
use crate::copy::{copy_libraries, CopyFailurePolicy};
use crate::env::CgoEnvironment;
use crate::error::ResolveError;
use crate::library::LibrarySet;
use crate::paths::{locate_output, SearchPaths};
use crate::report::{Event, Reporter, TracingReporter};
use crate::resolve::resolve_dependencies;

/// Resolve the DLL closure of `output` and copy it into `output`'s directory.
///
/// `skip` turns the whole step into a successful no-op. Copy failures abort.
pub fn resolve_and_copy(
    output: &Path,
    toolchain: &CgoEnvironment,
    quiet: bool,
    skip: bool,
) -> Result<(), ResolveError> {
    run(output, toolchain, CopyFailurePolicy::default(), quiet, skip)
}

fn run(
    output: &Path,
    toolchain: &CgoEnvironment,
    policy: CopyFailurePolicy,
    quiet: bool,
    skip: bool,
) -> Result<(), ResolveError> {
    let reporter = TracingReporter::new(quiet);
    if skip {
        reporter.report(Event::Skipped);
        return Ok(());
    }

    let inspector = ObjdumpInspector::new(toolchain.objdump());
    bundle_runtime(
        output,
        &toolchain.search_paths(),
        &inspector,
        &reporter,
        policy,
    )?;
    Ok(())
}

/// Resolve and copy with explicit collaborators.
///
/// Returns the full set of required DLLs.
pub fn bundle_runtime(
    output: &Path,
    search_paths: &SearchPaths,
    inspector: &dyn Inspector,
    reporter: &dyn Reporter,
    policy: CopyFailurePolicy,
) -> Result<LibrarySet, ResolveError> {
    let dest_dir = output.parent().unwrap_or_else(|| Path::new("."));

    let required = resolve_dependencies(output, search_paths, inspector, reporter)?;
    reporter.report(Event::Resolved {
        count: required.len(),
        dest: dest_dir.to_path_buf(),
    });

    copy_libraries(&required, search_paths, dest_dir, policy, reporter)?;
    Ok(required)
}

/// Run the post-build step for a `go build` invocation.
///
/// `args` are the arguments passed to go, starting at `build`.
pub fn handle_post_build(
    args: &[String],
    toolchain: &CgoEnvironment,
    policy: CopyFailurePolicy,
    quiet: bool,
    skip: bool,
) -> Result<PathBuf, ResolveError> {
    let cwd = std::env::current_dir().map_err(ResolveError::OutputPath)?;
    let output = locate_output(args, &cwd);

    run(&output, toolchain, policy, quiet, skip)?;
    Ok(output)
}
