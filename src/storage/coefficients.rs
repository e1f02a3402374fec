use anyhow::{Context, Result};

use super::{load_json, save_json, Store, ADMIN_COEFFICIENTS};
use crate::scoring::{Coefficients, DiagnosticType};

/// Current coefficients: the persisted override merged onto the defaults.
///
/// Never fails. A missing or malformed override yields the built-in defaults.
pub fn load_coefficients(store: &impl Store) -> Coefficients {
    load_json(store, ADMIN_COEFFICIENTS).unwrap_or_default()
}

pub fn save_coefficients(store: &mut impl Store, coefficients: &Coefficients) -> Result<()> {
    save_json(store, ADMIN_COEFFICIENTS, coefficients).context("Failed to save coefficients")
}

/// Merge a partial update into one diagnostic's coefficients and persist the result.
///
/// Values are stored as given; only unknown keys are rejected.
pub fn set_coefficients(
    store: &mut impl Store,
    diagnostic: DiagnosticType,
    updates: &[(String, f64)],
) -> Result<Coefficients> {
    let mut coefficients = load_coefficients(store);
    coefficients.merge(diagnostic, updates)?;
    save_coefficients(store, &coefficients)?;
    Ok(coefficients)
}

/// Drop every override, reverting to the built-in defaults.
pub fn reset_coefficients(store: &mut impl Store) -> Result<()> {
    store
        .remove(ADMIN_COEFFICIENTS)
        .context("Failed to reset coefficients")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_without_override() {
        let store = MemoryStore::new();
        assert_eq!(load_coefficients(&store), Coefficients::default());
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let mut store = MemoryStore::new();
        store.set(ADMIN_COEFFICIENTS, "{not json").unwrap();
        assert_eq!(load_coefficients(&store), Coefficients::default());

        store
            .set(ADMIN_COEFFICIENTS, r#"{"styleApprentissage": {"parfait": "trois"}}"#)
            .unwrap();
        assert_eq!(load_coefficients(&store), Coefficients::default());
    }

    #[test]
    fn test_set_merges_and_persists() {
        let mut store = MemoryStore::new();
        set_coefficients(
            &mut store,
            DiagnosticType::SoutienFamilial,
            &[("seuilFort".to_string(), 2.2)],
        )
        .unwrap();
        let coefficients = set_coefficients(
            &mut store,
            DiagnosticType::Style,
            &[("moyen".to_string(), 2.5)],
        )
        .unwrap();

        assert_eq!(coefficients.soutien_familial.seuil_fort, 2.2);
        assert_eq!(coefficients.style_apprentissage.moyen, 2.5);
        assert_eq!(load_coefficients(&store), coefficients);
    }

    #[test]
    fn test_set_unknown_key_does_not_persist() {
        let mut store = MemoryStore::new();
        let result = set_coefficients(
            &mut store,
            DiagnosticType::Rythme,
            &[("seuilRapide".to_string(), 1.8), ("bonus".to_string(), 1.0)],
        );
        assert!(result.is_err());
        assert!(store.get(ADMIN_COEFFICIENTS).unwrap().is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = MemoryStore::new();
        set_coefficients(
            &mut store,
            DiagnosticType::Intelligences,
            &[("fort".to_string(), 10.0)],
        )
        .unwrap();

        reset_coefficients(&mut store).unwrap();
        assert_eq!(load_coefficients(&store), Coefficients::default());
    }
}
