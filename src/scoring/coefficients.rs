use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::diagnostic::DiagnosticType;
use super::levels::{
    Answer, ArabicAnswer, Drive, Encadrement, Mastery, Organisation, Participation, Strength,
    Writing,
};

/// Weights and thresholds for every diagnostic.
///
/// Persisted as JSON under `adminCoefficients`. Each section is merged field by field
/// onto the built-in defaults, so an override only needs the values it changes.
///
/// Example:
/// ```json
/// {
///   "soutienFamilial": { "seuilFort": 2.7 },
///   "styleApprentissage": { "parfait": 4 }
/// }
/// ```
///
/// Values are taken as entered. Nothing checks that stronger levels weigh more than
/// weaker ones or that thresholds are ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coefficients {
    pub diagnostic_general: RythmeCoefficients,
    pub style_apprentissage: StyleCoefficients,
    pub intelligences_multiples: IntelligenceCoefficients,
    pub soutien_familial: SoutienCoefficients,
    pub motivation_participation: MotivationCoefficients,
}

/// Flat view of one diagnostic's coefficients, addressed by their JSON key.
pub trait CoefficientTable {
    fn entries(&self) -> Vec<(&'static str, f64)>;
    fn slot_mut(&mut self, key: &str) -> Option<&mut f64>;

    fn keys(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }
}

macro_rules! coefficient_table {
    ($ty:ty { $($field:ident => $key:literal),+ $(,)? }) => {
        impl CoefficientTable for $ty {
            fn entries(&self) -> Vec<(&'static str, f64)> {
                vec![$(($key, self.$field)),+]
            }

            fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
                match key {
                    $($key => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

/// Rythme d'apprentissage. Writing and Arabic reading reuse the answer weights:
/// `oui` weighs as `correct`, `incomplet` as `partiel`, `wrong` as `faux`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RythmeCoefficients {
    pub correct: f64,
    pub partiel: f64,
    pub faux: f64,
    /// Average at or above this is "rapide"
    pub seuil_rapide: f64,
    /// Average below this is "lent"
    pub seuil_lent: f64,
}

impl Default for RythmeCoefficients {
    fn default() -> Self {
        Self {
            correct: 2.0,
            partiel: 1.0,
            faux: 0.0,
            seuil_rapide: 1.5,
            seuil_lent: 1.0,
        }
    }
}

impl RythmeCoefficients {
    pub fn answer(&self, level: Answer) -> f64 {
        match level {
            Answer::Correct => self.correct,
            Answer::Partiel => self.partiel,
            Answer::Faux => self.faux,
        }
    }

    pub fn arabic(&self, level: ArabicAnswer) -> f64 {
        match level {
            ArabicAnswer::Correct => self.correct,
            ArabicAnswer::Partiel => self.partiel,
            ArabicAnswer::Wrong => self.faux,
        }
    }

    pub fn writing(&self, level: Writing) -> f64 {
        match level {
            Writing::Oui => self.correct,
            Writing::Incomplet => self.partiel,
        }
    }
}

coefficient_table!(RythmeCoefficients {
    correct => "correct",
    partiel => "partiel",
    faux => "faux",
    seuil_rapide => "seuilRapide",
    seuil_lent => "seuilLent",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleCoefficients {
    pub parfait: f64,
    pub moyen: f64,
    pub faible: f64,
}

impl Default for StyleCoefficients {
    fn default() -> Self {
        Self {
            parfait: 3.0,
            moyen: 2.0,
            faible: 1.0,
        }
    }
}

impl StyleCoefficients {
    pub fn weight(&self, level: Mastery) -> f64 {
        match level {
            Mastery::Parfait => self.parfait,
            Mastery::Moyen => self.moyen,
            Mastery::Faible => self.faible,
        }
    }
}

coefficient_table!(StyleCoefficients {
    parfait => "parfait",
    moyen => "moyen",
    faible => "faible",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelligenceCoefficients {
    pub fort: f64,
    pub moyen: f64,
    pub faible: f64,
}

impl Default for IntelligenceCoefficients {
    fn default() -> Self {
        Self {
            fort: 3.0,
            moyen: 2.0,
            faible: 1.0,
        }
    }
}

impl IntelligenceCoefficients {
    pub fn weight(&self, level: Strength) -> f64 {
        match level {
            Strength::Fort => self.fort,
            Strength::Moyen => self.moyen,
            Strength::Faible => self.faible,
        }
    }
}

coefficient_table!(IntelligenceCoefficients {
    fort => "fort",
    moyen => "moyen",
    faible => "faible",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoutienCoefficients {
    pub bonne: f64,
    pub moyenne: f64,
    pub faible: f64,
    pub present: f64,
    pub occasionnel: f64,
    pub absent: f64,
    pub forte: f64,
    pub moyenne_motivation: f64,
    pub faible_motivation: f64,
    pub seuil_fort: f64,
    pub seuil_moyen: f64,
}

impl Default for SoutienCoefficients {
    fn default() -> Self {
        Self {
            bonne: 3.0,
            moyenne: 2.0,
            faible: 1.0,
            present: 3.0,
            occasionnel: 2.0,
            absent: 1.0,
            forte: 3.0,
            moyenne_motivation: 2.0,
            faible_motivation: 1.0,
            seuil_fort: 2.5,
            seuil_moyen: 1.5,
        }
    }
}

impl SoutienCoefficients {
    pub fn organisation(&self, level: Organisation) -> f64 {
        match level {
            Organisation::Bonne => self.bonne,
            Organisation::Moyenne => self.moyenne,
            Organisation::Faible => self.faible,
        }
    }

    pub fn encadrement(&self, level: Encadrement) -> f64 {
        match level {
            Encadrement::Present => self.present,
            Encadrement::Occasionnel => self.occasionnel,
            Encadrement::Absent => self.absent,
        }
    }

    pub fn motivation(&self, level: Drive) -> f64 {
        match level {
            Drive::Forte => self.forte,
            Drive::Moyenne => self.moyenne_motivation,
            Drive::Faible => self.faible_motivation,
        }
    }
}

coefficient_table!(SoutienCoefficients {
    bonne => "bonne",
    moyenne => "moyenne",
    faible => "faible",
    present => "present",
    occasionnel => "occasionnel",
    absent => "absent",
    forte => "forte",
    moyenne_motivation => "moyenneMotivation",
    faible_motivation => "faibleMotivation",
    seuil_fort => "seuilFort",
    seuil_moyen => "seuilMoyen",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotivationCoefficients {
    pub active: f64,
    pub moyenne: f64,
    pub faible_participation: f64,
    pub forte: f64,
    pub moyenne_motivation: f64,
    pub faible_motivation: f64,
    pub seuil_haute: f64,
    pub seuil_moyenne: f64,
}

impl Default for MotivationCoefficients {
    fn default() -> Self {
        Self {
            active: 3.0,
            moyenne: 2.0,
            faible_participation: 1.0,
            forte: 3.0,
            moyenne_motivation: 2.0,
            faible_motivation: 1.0,
            seuil_haute: 2.5,
            seuil_moyenne: 1.5,
        }
    }
}

impl MotivationCoefficients {
    pub fn participation(&self, level: Participation) -> f64 {
        match level {
            Participation::Active => self.active,
            Participation::Moyenne => self.moyenne,
            Participation::Faible => self.faible_participation,
        }
    }

    pub fn motivation(&self, level: Drive) -> f64 {
        match level {
            Drive::Forte => self.forte,
            Drive::Moyenne => self.moyenne_motivation,
            Drive::Faible => self.faible_motivation,
        }
    }
}

coefficient_table!(MotivationCoefficients {
    active => "active",
    moyenne => "moyenne",
    faible_participation => "faibleParticipation",
    forte => "forte",
    moyenne_motivation => "moyenneMotivation",
    faible_motivation => "faibleMotivation",
    seuil_haute => "seuilHaute",
    seuil_moyenne => "seuilMoyenne",
});

impl Coefficients {
    pub fn table(&self, diagnostic: DiagnosticType) -> &dyn CoefficientTable {
        match diagnostic {
            DiagnosticType::Rythme => &self.diagnostic_general,
            DiagnosticType::Style => &self.style_apprentissage,
            DiagnosticType::Intelligences => &self.intelligences_multiples,
            DiagnosticType::SoutienFamilial => &self.soutien_familial,
            DiagnosticType::MotivationParticipation => &self.motivation_participation,
        }
    }

    pub fn table_mut(&mut self, diagnostic: DiagnosticType) -> &mut dyn CoefficientTable {
        match diagnostic {
            DiagnosticType::Rythme => &mut self.diagnostic_general,
            DiagnosticType::Style => &mut self.style_apprentissage,
            DiagnosticType::Intelligences => &mut self.intelligences_multiples,
            DiagnosticType::SoutienFamilial => &mut self.soutien_familial,
            DiagnosticType::MotivationParticipation => &mut self.motivation_participation,
        }
    }

    /// Merge a partial update into one diagnostic's coefficients.
    ///
    /// Every key is checked before anything is written, so an unknown key leaves the
    /// set untouched.
    pub fn merge(&mut self, diagnostic: DiagnosticType, updates: &[(String, f64)]) -> Result<()> {
        let table = self.table_mut(diagnostic);
        if let Some((key, _)) = updates.iter().find(|(key, _)| table.slot_mut(key).is_none()) {
            bail!(
                "Unknown coefficient '{}' for {} (expected one of: {})",
                key,
                diagnostic.coefficients_key(),
                table.keys().join(", ")
            );
        }

        for (key, value) in updates {
            if let Some(slot) = table.slot_mut(key) {
                *slot = *value;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_coefficients() {
        let coefficients = Coefficients::default();
        assert_eq!(coefficients.diagnostic_general.correct, 2.0);
        assert_eq!(coefficients.diagnostic_general.seuil_rapide, 1.5);
        assert_eq!(coefficients.style_apprentissage.parfait, 3.0);
        assert_eq!(coefficients.soutien_familial.seuil_fort, 2.5);
        assert_eq!(coefficients.motivation_participation.seuil_moyenne, 1.5);
    }

    #[test]
    fn test_uses_admin_json_names() {
        let json = serde_json::to_value(Coefficients::default()).unwrap();
        assert_eq!(json["soutienFamilial"]["moyenneMotivation"], 2.0);
        assert_eq!(json["motivationParticipation"]["faibleParticipation"], 1.0);
        assert_eq!(json["diagnosticGeneral"]["seuilLent"], 1.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{"soutienFamilial": {"seuilFort": 2.8}}"#;
        let coefficients: Coefficients = serde_json::from_str(json).unwrap();

        assert_eq!(coefficients.soutien_familial.seuil_fort, 2.8);
        assert_eq!(coefficients.soutien_familial.seuil_moyen, 1.5);
        assert_eq!(coefficients.style_apprentissage, StyleCoefficients::default());
    }

    #[test]
    fn test_empty_override_is_default() {
        let coefficients: Coefficients = serde_json::from_str("{}").unwrap();
        assert_eq!(coefficients, Coefficients::default());
    }

    #[test]
    fn test_table_entries_follow_json_keys() {
        let coefficients = Coefficients::default();
        let keys = coefficients.table(DiagnosticType::MotivationParticipation).keys();
        assert_eq!(keys[2], "faibleParticipation");
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_merge_updates_values() {
        let mut coefficients = Coefficients::default();
        coefficients
            .merge(
                DiagnosticType::Style,
                &[("parfait".to_string(), 5.0), ("faible".to_string(), -1.0)],
            )
            .unwrap();

        assert_eq!(coefficients.style_apprentissage.parfait, 5.0);
        // No range checking
        assert_eq!(coefficients.style_apprentissage.faible, -1.0);
        assert_eq!(coefficients.style_apprentissage.moyen, 2.0);
    }

    #[test]
    fn test_merge_unknown_key_changes_nothing() {
        let mut coefficients = Coefficients::default();
        let result = coefficients.merge(
            DiagnosticType::Intelligences,
            &[("fort".to_string(), 9.0), ("parfait".to_string(), 1.0)],
        );

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parfait"));
        assert_eq!(coefficients.intelligences_multiples.fort, 3.0);
    }

    #[test]
    fn test_writing_and_arabic_reuse_answer_weights() {
        let rythme = RythmeCoefficients {
            correct: 10.0,
            partiel: 4.0,
            faux: -2.0,
            ..Default::default()
        };
        assert_eq!(rythme.writing(Writing::Oui), 10.0);
        assert_eq!(rythme.writing(Writing::Incomplet), 4.0);
        assert_eq!(rythme.arabic(ArabicAnswer::Wrong), -2.0);
    }
}
