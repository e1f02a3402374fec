//! Key/value persistence for rosters, class lists and coefficients.
//!
//! Values are JSON strings under fixed keys, the way a browser's local storage holds them.
//! Reads never fail: missing keys and malformed values fall back to defaults with a warning.

pub mod coefficients;
pub mod file;
pub mod memory;
pub mod results;

pub use coefficients::{load_coefficients, reset_coefficients, save_coefficients, set_coefficients};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use results::{
    load_global_data, load_global_students, load_results, save_global_students, save_results,
    working_roster,
};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::buffered_eprintln;

/// Key holding the coefficient overrides.
pub const ADMIN_COEFFICIENTS: &str = "adminCoefficients";

/// Key holding the imported class list (a JSON array of names).
pub const GLOBAL_STUDENTS: &str = "globalStudents";

pub trait Store {
    /// Raw value under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value.
///
/// Returns `None` when the key is absent, unreadable or holds malformed JSON; the
/// latter two are reported as warnings.
pub fn load_json<T: DeserializeOwned>(store: &impl Store, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            buffered_eprintln!("Warning: could not read '{}': {:#}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            buffered_eprintln!("Warning: ignoring malformed '{}': {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut impl Store, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize '{}'", key))?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = load_json(&store, GLOBAL_STUDENTS);
        assert!(value.is_none());
    }

    #[test]
    fn test_load_malformed_value() {
        let mut store = MemoryStore::new();
        store.set(GLOBAL_STUDENTS, "[\"Amine\", ").unwrap();
        let value: Option<Vec<String>> = load_json(&store, GLOBAL_STUDENTS);
        assert!(value.is_none());
    }

    #[test]
    fn test_load_wrong_shape() {
        let mut store = MemoryStore::new();
        store.set(GLOBAL_STUDENTS, "{\"name\": \"Amine\"}").unwrap();
        let value: Option<Vec<String>> = load_json(&store, GLOBAL_STUDENTS);
        assert!(value.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_json(&mut store, GLOBAL_STUDENTS, &["Amine", "Sara"]).unwrap();

        let value: Option<Vec<String>> = load_json(&store, GLOBAL_STUDENTS);
        assert_eq!(value.unwrap(), vec!["Amine", "Sara"]);
    }
}
