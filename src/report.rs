//! Progress reporting for the post-build step.
//!
//! The resolver and copier never log directly; they hand [`Event`]s to a
//! [`Reporter`] so callers decide where the messages go.

use std::cell::RefCell;
use std::path::PathBuf;

use crate::error::ResolveError;

/// Something noteworthy that happened while resolving or copying.
#[derive(Debug)]
pub enum Event {
    /// DLL copying was switched off for this build.
    Skipped,
    /// A discovered DLL was not found in any search path during traversal.
    Unresolved { name: String },
    /// A discovered DLL could not be inspected; its own imports stay unknown.
    InspectFailed { name: String, error: ResolveError },
    /// Traversal finished.
    Resolved { count: usize, dest: PathBuf },
    /// A required DLL was not found in any search path during copying.
    Missing { name: String },
    /// A required DLL already sits in the destination directory.
    InPlace { name: String },
    /// One DLL was copied.
    Copied { name: String, src: PathBuf },
    /// Copying finished.
    CopyComplete { copied: usize },
}

/// Observer for [`Event`]s.
pub trait Reporter {
    fn report(&self, event: Event);
}

/// Reporter that forwards events to `tracing`.
///
/// In quiet mode only errors are shown, and errors are never reported as
/// events, so nothing is emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter {
    quiet: bool,
}

impl TracingReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for TracingReporter {
    fn report(&self, event: Event) {
        if self.quiet {
            return;
        }
        match event {
            Event::Skipped => {
                tracing::info!("ezgo: Build successful. Skipping DLL copy due to -no-copy flag.")
            }
            Event::Unresolved { name } => {
                tracing::warn!("ezgo: warning: {name} not found in search paths, its dependencies are unknown")
            }
            Event::InspectFailed { name, error } => {
                tracing::warn!("ezgo: warning: could not analyze dependencies for {name}: {error}")
            }
            Event::Resolved { count, dest } => {
                tracing::info!(
                    "ezgo: Found {count} required DLL(s). Copying to {}",
                    dest.display()
                )
            }
            Event::Missing { name } => {
                tracing::warn!("ezgo: warning: could not find required DLL {name}")
            }
            Event::InPlace { name } => {
                tracing::debug!("ezgo: {name} is already in place")
            }
            Event::Copied { name, src } => {
                tracing::debug!("ezgo: copied {name} from {}", src.display())
            }
            Event::CopyComplete { copied } => {
                if copied > 0 {
                    tracing::info!("ezgo: Copied {copied} DLLs.")
                }
            }
        }
    }
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events.into_inner()
    }

    /// Names from `Unresolved` and `Missing` events.
    pub fn unlocated(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Unresolved { name } | Event::Missing { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names from `InspectFailed` events.
    pub fn inspect_failures(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::InspectFailed { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(reporter: TracingReporter, event: Event) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || reporter.report(event));
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_traversal_miss_is_a_warning() {
        let out = capture(
            TracingReporter::new(false),
            Event::Unresolved {
                name: "libfoo.dll".to_string(),
            },
        );
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("libfoo.dll"), "{out}");
    }

    #[test]
    fn test_quiet_drops_warnings() {
        let out = capture(
            TracingReporter::new(true),
            Event::Missing {
                name: "libfoo.dll".to_string(),
            },
        );
        assert!(out.is_empty(), "{out}");
    }
}
