//! Persisted form of a student row.
//!
//! A row is one flat JSON object: `id`, `name`, the grid's criteria, and the label under
//! the grid's own key (`finalCategory`, `styleDominant`, `profilDominant`,
//! `niveauSoutien` or `niveauGlobal`). Rows written with a plain `category` key are
//! still read.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use super::types::StudentRecord;
use crate::scoring::Observations;

const LEGACY_LABEL_KEY: &str = "category";

#[derive(Serialize)]
#[serde(bound = "O: Observations")]
struct RecordRef<'a, O> {
    id: &'a str,
    name: &'a str,
    #[serde(flatten)]
    observations: &'a O,
    #[serde(flatten)]
    label: LabelRef<'a, O>,
}

struct LabelRef<'a, O> {
    value: &'a str,
    grid: PhantomData<O>,
}

impl<O: Observations> Serialize for LabelRef<'_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(O::LABEL_KEY, self.value)?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "O: Observations"))]
struct RecordRepr<O> {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(flatten)]
    observations: O,
    #[serde(flatten)]
    label: Label<O>,
}

/// The label found among the keys the grid itself did not claim.
struct Label<O> {
    value: String,
    grid: PhantomData<O>,
}

impl<'de, O: Observations> Deserialize<'de> for Label<O> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LabelVisitor(PhantomData))
    }
}

struct LabelVisitor<O>(PhantomData<O>);

impl<'de, O: Observations> Visitor<'de> for LabelVisitor<O> {
    type Value = Label<O>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a student row with an optional '{}' field", O::LABEL_KEY)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut label = None;
        let mut legacy = None;
        while let Some(key) = access.next_key::<String>()? {
            if key == O::LABEL_KEY {
                label = access.next_value::<Option<String>>()?;
            } else if key == LEGACY_LABEL_KEY {
                legacy = access.next_value::<Option<String>>()?;
            } else {
                access.next_value::<IgnoredAny>()?;
            }
        }

        Ok(Label {
            value: label.or(legacy).unwrap_or_default(),
            grid: PhantomData,
        })
    }
}

impl<O: Observations> Serialize for StudentRecord<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecordRef {
            id: &self.id,
            name: &self.name,
            observations: &self.observations,
            label: LabelRef {
                value: &self.category,
                grid: PhantomData,
            },
        }
        .serialize(serializer)
    }
}

impl<'de, O: Observations> Deserialize<'de> for StudentRecord<O> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = RecordRepr::<O>::deserialize(deserializer)?;
        Ok(StudentRecord {
            id: repr.id,
            name: repr.name,
            observations: repr.observations,
            category: repr.label.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::levels::{Drive, Participation};
    use crate::scoring::{MotivationObservations, RythmeObservations, StyleObservations};

    #[test]
    fn test_label_written_under_grid_key() {
        let mut record = StudentRecord::<StyleObservations>::new("1", "Amine");
        record.category = "visuel".to_string();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["styleDominant"], "visuel");
        assert!(json.get("category").is_none());
        assert_eq!(json["visuel"]["parfait"], false);
    }

    #[test]
    fn test_reads_row_saved_by_web_app() {
        let raw = r#"{
            "id": "1",
            "name": "Adam",
            "participation": {"active": false, "moyenne": true, "faible": false},
            "motivation": {"forte": true, "moyenne": false, "faible": false},
            "observationEnseignant": "Participe volontiers",
            "niveauGlobal": "haute"
        }"#;

        let record: StudentRecord<MotivationObservations> = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name, "Adam");
        assert_eq!(record.category, "haute");
        assert!(record.observations.participation.is_checked(Participation::Moyenne));
        assert!(record.observations.motivation.is_checked(Drive::Forte));
        assert_eq!(record.observations.observation_enseignant, "Participe volontiers");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["niveauGlobal"], "haute");
        let back: StudentRecord<MotivationObservations> = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_reads_legacy_category_key() {
        let raw = r#"{"id": "2", "name": "Sara", "category": "lent"}"#;
        let record: StudentRecord<RythmeObservations> = serde_json::from_str(raw).unwrap();
        assert_eq!(record.category, "lent");
    }

    #[test]
    fn test_missing_label_is_empty() {
        let raw = r#"{"id": "3", "name": "Nour", "finalCategory": null, "extra": [1, 2]}"#;
        let record: StudentRecord<RythmeObservations> = serde_json::from_str(raw).unwrap();
        assert_eq!(record.category, "");
        assert!(!record.observations.french_reading.is_answered());
    }
}
