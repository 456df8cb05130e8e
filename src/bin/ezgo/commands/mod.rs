//! Command implementations.

pub mod env;
pub mod go;
pub mod module;
pub mod pkg;
pub mod shell;

/// The current process environment as UTF-8 pairs.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}
