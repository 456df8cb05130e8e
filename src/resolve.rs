//! Transitive DLL dependency resolution.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use crate::analyze::Inspector;
use crate::error::ResolveError;
use crate::library::LibrarySet;
use crate::paths::SearchPaths;
use crate::report::{Event, Reporter};

/// State of one breadth-first walk over the import graph.
///
/// Created per resolution and consumed by [`Traversal::finish`].
#[derive(Debug, Default)]
pub struct Traversal {
    required: LibrarySet,
    processed: HashSet<String>,
    queue: VecDeque<String>,
}

impl Traversal {
    /// Start a walk from the direct imports of the build output.
    pub fn seeded(direct: LibrarySet) -> Self {
        let mut traversal = Self::default();
        traversal.enqueue_new(direct);
        traversal
    }

    /// Add names not yet required to the set and the back of the queue.
    fn enqueue_new(&mut self, found: LibrarySet) {
        for name in found.iter() {
            if self.required.insert(name) {
                self.queue.push_back(name.to_string());
            }
        }
    }

    /// Next name that has not been inspected yet, marking it as inspected.
    fn next_unprocessed(&mut self) -> Option<String> {
        while let Some(name) = self.queue.pop_front() {
            if self.processed.insert(name.to_ascii_lowercase()) {
                return Some(name);
            }
        }
        None
    }

    /// Drain the queue, inspecting each DLL that can be located.
    ///
    /// DLLs that cannot be located or inspected are reported and skipped;
    /// they stay in the required set.
    pub fn run(
        &mut self,
        search_paths: &SearchPaths,
        inspector: &dyn Inspector,
        reporter: &dyn Reporter,
    ) {
        while let Some(name) = self.next_unprocessed() {
            let Some(path) = search_paths.find_library(&name) else {
                reporter.report(Event::Unresolved { name });
                continue;
            };

            match inspector.inspect(&path) {
                Ok(found) => self.enqueue_new(found),
                Err(error) => reporter.report(Event::InspectFailed { name, error }),
            }
        }
    }

    pub fn finish(self) -> LibrarySet {
        self.required
    }
}

/// Every non-system DLL `output` needs, at any depth.
///
/// # Errors
///
/// Fails only if `output` itself cannot be inspected.
pub fn resolve_dependencies(
    output: &Path,
    search_paths: &SearchPaths,
    inspector: &dyn Inspector,
    reporter: &dyn Reporter,
) -> Result<LibrarySet, ResolveError> {
    let direct = inspector.inspect(output)?;
    let mut traversal = Traversal::seeded(direct);
    traversal.run(search_paths, inspector, reporter);
    Ok(traversal.finish())
}
