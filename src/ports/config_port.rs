//! Configuration access port trait.

/// Read-only `[section] key` lookup. Typed parsing and range checks live in
/// `domain::config_validation` so every adapter reports bad values the same
/// way.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
