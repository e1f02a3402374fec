use anyhow::{Context, Result};

use super::{load_json, save_json, Store, GLOBAL_STUDENTS};
use crate::roster::{Roster, StudentRecord};
use crate::scoring::{Coefficients, Observations};
use crate::summary::GlobalData;

/// Persisted results of one diagnostic, if any were saved.
///
/// Every row is relabelled with `coefficients`, so a label saved under older
/// coefficients is never reported.
pub fn load_results<O: Observations>(
    store: &impl Store,
    coefficients: &Coefficients,
) -> Option<Vec<StudentRecord<O>>> {
    let mut records: Vec<StudentRecord<O>> = load_json(store, O::KIND.storage_key())?;
    for record in &mut records {
        record.recompute(coefficients);
    }
    Some(records)
}

/// Save the named rows of a roster as the diagnostic's results.
/// Returns how many rows were saved.
pub fn save_results<O: Observations>(store: &mut impl Store, roster: &Roster<O>) -> Result<usize> {
    let completed = roster.completed();
    save_json(store, O::KIND.storage_key(), &completed)
        .with_context(|| format!("Failed to save {} results", O::KIND.title()))?;
    Ok(completed.len())
}

/// The imported class list; empty when none was imported.
pub fn load_global_students(store: &impl Store) -> Vec<String> {
    load_json(store, GLOBAL_STUDENTS).unwrap_or_default()
}

pub fn save_global_students(store: &mut impl Store, names: &[String]) -> Result<()> {
    save_json(store, GLOBAL_STUDENTS, names).context("Failed to save class list")
}

/// The grid a teacher resumes editing.
///
/// Saved results come first; names of the class list that have no row yet are
/// appended as blank rows. Without saved results the grid is seeded from the class
/// list, or is a single blank row when no list was imported. Every row is relabelled
/// with the given coefficients.
pub fn working_roster<O: Observations>(store: &impl Store, coefficients: &Coefficients) -> Roster<O> {
    let names = load_global_students(store);

    let mut roster = match load_results::<O>(store, coefficients) {
        Some(records) if !records.is_empty() => {
            let mut roster = Roster::from_records(records);
            for name in &names {
                if !roster.students().iter().any(|s| &s.name == name) {
                    roster.add_student(name.clone());
                }
            }
            roster
        }
        _ => Roster::from_names(&names),
    };

    roster.recompute_all(coefficients);
    roster
}

/// Saved results of every diagnostic, relabelled with `coefficients`, for the
/// cross-diagnostic summary.
pub fn load_global_data(store: &impl Store, coefficients: &Coefficients) -> GlobalData {
    GlobalData {
        rythme: load_results(store, coefficients),
        style: load_results(store, coefficients),
        intelligences: load_results(store, coefficients),
        soutien: load_results(store, coefficients),
        motivation: load_results(store, coefficients),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::levels::{Mastery, Participation};
    use crate::scoring::{
        DiagnosticType, MotivationObservations, MotivationUpdate, RythmeObservations, Style,
        StyleObservations, StyleUpdate,
    };
    use crate::storage::{load_coefficients, reset_coefficients, set_coefficients, MemoryStore};
    use crate::summary::{class_summary, cross_diagnostic_summary};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_working_roster_blank_without_class_list() {
        let store = MemoryStore::new();
        let roster = working_roster::<RythmeObservations>(&store, &Coefficients::default());
        assert_eq!(roster, Roster::blank());
    }

    #[test]
    fn test_working_roster_seeds_from_class_list() {
        let mut store = MemoryStore::new();
        save_global_students(&mut store, &names(&["Amine", "Sara"])).unwrap();

        let roster = working_roster::<StyleObservations>(&store, &Coefficients::default());
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.students()[1].name, "Sara");
    }

    #[test]
    fn test_results_roundtrip_and_resume() {
        let coefficients = Coefficients::default();
        let mut store = MemoryStore::new();
        save_global_students(&mut store, &names(&["Amine", "Sara"])).unwrap();

        let mut roster = working_roster::<StyleObservations>(&store, &coefficients);
        roster
            .update("Sara", StyleUpdate(Style::Kinesthesique, Mastery::Parfait), true, &coefficients)
            .unwrap();
        assert_eq!(save_results(&mut store, &roster).unwrap(), 2);

        // A student added to the class list later gets a blank row
        save_global_students(&mut store, &names(&["Amine", "Sara", "Nour"])).unwrap();
        let resumed = working_roster::<StyleObservations>(&store, &coefficients);
        assert_eq!(resumed.len(), 3);
        assert_eq!(resumed.find("Sara").unwrap().category, "kinesthesique");
        assert_eq!(resumed.find("Nour").unwrap().category, "");
    }

    #[test]
    fn test_save_results_skips_unnamed_rows() {
        let mut store = MemoryStore::new();
        let mut roster = Roster::<RythmeObservations>::blank();
        roster.add_student("Ines");

        assert_eq!(save_results(&mut store, &roster).unwrap(), 1);
        let saved = load_results::<RythmeObservations>(&store, &Coefficients::default()).unwrap();
        assert_eq!(saved[0].name, "Ines");
    }

    #[test]
    fn test_working_roster_relabels_with_current_coefficients() {
        let mut coefficients = Coefficients::default();
        let mut store = MemoryStore::new();
        save_global_students(&mut store, &names(&["Adam"])).unwrap();

        let mut roster = working_roster::<MotivationObservations>(&store, &coefficients);
        roster
            .update(
                "Adam",
                MotivationUpdate::Participation(Participation::Moyenne),
                true,
                &coefficients,
            )
            .unwrap();
        save_results(&mut store, &roster).unwrap();
        assert_eq!(roster.students()[0].category, "moyenne");

        coefficients.motivation_participation.seuil_haute = 2.0;
        let resumed = working_roster::<MotivationObservations>(&store, &coefficients);
        assert_eq!(resumed.students()[0].category, "haute");
    }

    #[test]
    fn test_malformed_results_fall_back_to_class_list() {
        let mut store = MemoryStore::new();
        save_global_students(&mut store, &names(&["Adam"])).unwrap();
        store
            .set(DiagnosticType::Rythme.storage_key(), "[{\"id\": 1}")
            .unwrap();

        let roster = working_roster::<RythmeObservations>(&store, &Coefficients::default());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.students()[0].name, "Adam");
    }

    #[test]
    fn test_load_global_data() {
        let mut store = MemoryStore::new();
        let roster = Roster::<StyleObservations>::from_names(&names(&["Amine"]));
        save_results(&mut store, &roster).unwrap();

        let data = load_global_data(&store, &Coefficients::default());
        assert!(data.rythme.is_none());
        assert_eq!(data.style.unwrap().len(), 1);
    }

    #[test]
    fn test_load_results_follows_coefficient_changes() {
        let coefficients = Coefficients::default();
        let mut store = MemoryStore::new();
        save_global_students(&mut store, &names(&["Adam"])).unwrap();

        let mut roster = working_roster::<MotivationObservations>(&store, &coefficients);
        roster
            .update(
                "Adam",
                MotivationUpdate::Participation(Participation::Moyenne),
                true,
                &coefficients,
            )
            .unwrap();
        save_results(&mut store, &roster).unwrap();

        let changed = set_coefficients(
            &mut store,
            DiagnosticType::MotivationParticipation,
            &[("seuilHaute".to_string(), 2.0)],
        )
        .unwrap();

        let saved = load_results::<MotivationObservations>(&store, &changed).unwrap();
        assert_eq!(saved[0].category, "haute");
        let summary = class_summary(&saved);
        assert_eq!(summary.count("haute"), 1);
        assert_eq!(summary.count("moyenne"), 0);

        let data = load_global_data(&store, &changed);
        let radar = cross_diagnostic_summary(&data).radar;
        assert_eq!(radar[0].subject, "Motivation haute");
        assert_eq!(radar[0].score, 100);

        // Back to the defaults after a reset
        reset_coefficients(&mut store).unwrap();
        let defaults = load_coefficients(&store);
        let saved = load_results::<MotivationObservations>(&store, &defaults).unwrap();
        assert_eq!(saved[0].category, "moyenne");
    }

    #[test]
    fn test_load_results_labels_rows_saved_without_label() {
        let mut store = MemoryStore::new();
        store
            .set(
                DiagnosticType::Style.storage_key(),
                r#"[{"id": "1", "name": "Lina", "auditif": {"parfait": true}}]"#,
            )
            .unwrap();

        let saved = load_results::<StyleObservations>(&store, &Coefficients::default()).unwrap();
        assert_eq!(saved[0].category, "auditif");
    }
}
