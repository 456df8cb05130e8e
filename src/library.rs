//! Case-insensitive sets of DLL names.

use std::collections::BTreeMap;

/// A set of library names.
///
/// Windows resolves DLL names without regard to case, so `FOO.dll` and
/// `foo.DLL` are the same member. The spelling seen first is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySet {
    names: BTreeMap<String, String>,
}

impl LibrarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name. Returns `true` if no equal name was present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.names.contains_key(&key) {
            return false;
        }
        self.names.insert(key, name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in their original spelling, ordered by lower-cased name.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LibrarySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
