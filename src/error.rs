//! Errors raised while resolving and copying runtime libraries.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of the post-build dependency step.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The dependency-dump tool could not be started.
    #[error("failed to run {} on {}: {source}", .tool.display(), .binary.display())]
    ToolSpawn {
        tool: PathBuf,
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dependency-dump tool ran but exited abnormally.
    #[error("{} failed on {} (exit code {code:?}): {stderr}", .tool.display(), .binary.display())]
    ToolFailed {
        tool: PathBuf,
        binary: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// A located library could not be copied next to the build output.
    #[error("failed to copy DLL {name} from {} to {}: {source}", .src.display(), .dst.display())]
    Copy {
        name: String,
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more copies failed while running with the collecting policy.
    #[error("failed to copy {} DLL(s): {}", .0.len(), summarize(.0))]
    CopyFailures(Vec<ResolveError>),

    /// The build output path could not be made absolute.
    #[error("cannot determine current directory: {0}")]
    OutputPath(#[source] io::Error),
}

fn summarize(errors: &[ResolveError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
