use std::collections::HashSet;

use crate::roster::StudentRecord;
use crate::scoring::{
    DiagnosticType, IntelligenceObservations, MotivationObservations, RythmeObservations,
    SoutienObservations, StyleObservations,
};

/// Saved results of every diagnostic; `None` where a diagnostic was never saved.
#[derive(Debug, Clone, Default)]
pub struct GlobalData {
    pub rythme: Option<Vec<StudentRecord<RythmeObservations>>>,
    pub style: Option<Vec<StudentRecord<StyleObservations>>>,
    pub intelligences: Option<Vec<StudentRecord<IntelligenceObservations>>>,
    pub soutien: Option<Vec<StudentRecord<SoutienObservations>>>,
    pub motivation: Option<Vec<StudentRecord<MotivationObservations>>>,
}

impl GlobalData {
    /// Student names of every saved diagnostic, in diagnostic order.
    fn names(&self) -> impl Iterator<Item = &str> {
        fn names_of<O>(records: &Option<Vec<StudentRecord<O>>>) -> impl Iterator<Item = &str> {
            records.iter().flatten().map(|s| s.name.as_str())
        }

        names_of(&self.rythme)
            .chain(names_of(&self.style))
            .chain(names_of(&self.intelligences))
            .chain(names_of(&self.soutien))
            .chain(names_of(&self.motivation))
    }

    /// Number of saved rows per diagnostic (`None` when never saved).
    pub fn record_counts(&self) -> [(DiagnosticType, Option<usize>); 5] {
        [
            (DiagnosticType::Rythme, self.rythme.as_ref().map(Vec::len)),
            (DiagnosticType::Style, self.style.as_ref().map(Vec::len)),
            (DiagnosticType::Intelligences, self.intelligences.as_ref().map(Vec::len)),
            (DiagnosticType::SoutienFamilial, self.soutien.as_ref().map(Vec::len)),
            (DiagnosticType::MotivationParticipation, self.motivation.as_ref().map(Vec::len)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarIndicator {
    pub subject: &'static str,
    /// Share of the diagnostic's students in the indicator's category, 0..=100.
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSummary {
    /// Distinct names across all diagnostics (exact, case-sensitive match).
    pub total_unique_students: usize,
    /// Number of diagnostics that have saved results.
    pub diagnostics_with_data: usize,
    /// Saved rows per diagnostic, for diagnostics with at least one row.
    pub completion: Vec<(DiagnosticType, usize)>,
    pub radar: Vec<RadarIndicator>,
    pub text: String,
}

/// Radar score for one diagnostic, or `None` when it has no saved rows.
///
/// A diagnostic saved as an empty list is left out rather than plotted at 0, since
/// a share of zero students is undefined.
fn indicator<O>(
    subject: &'static str,
    records: &Option<Vec<StudentRecord<O>>>,
    category: &str,
) -> Option<RadarIndicator> {
    let records = records.as_ref().filter(|r| !r.is_empty())?;
    let matching = records.iter().filter(|s| s.category == category).count();
    let score = (matching as f64 / records.len() as f64 * 100.0).round() as u32;
    Some(RadarIndicator { subject, score })
}

/// Combine every diagnostic's results into the class overview.
///
/// Students are identified across diagnostics by their exact name string only. Two
/// spellings of one child count twice, and two children sharing a name count once.
pub fn cross_diagnostic_summary(data: &GlobalData) -> GlobalSummary {
    let unique: HashSet<&str> = data.names().collect();
    let total_unique_students = unique.len();

    let counts = data.record_counts();
    let diagnostics_with_data = counts.iter().filter(|(_, n)| n.is_some()).count();
    let completion = counts
        .iter()
        .filter_map(|(diagnostic, n)| n.filter(|n| *n > 0).map(|n| (*diagnostic, n)))
        .collect();

    let radar = [
        indicator("Rythme rapide", &data.rythme, "rapide"),
        indicator("Motivation haute", &data.motivation, "haute"),
        indicator("Soutien fort", &data.soutien, "fort"),
        indicator("Style visuel", &data.style, "visuel"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let text = if total_unique_students == 0 {
        "Aucun diagnostic disponible.".to_string()
    } else {
        format!(
            "Analyse globale de {} élève(s) avec {} type(s) de diagnostic réalisé(s). \
             Les données permettent une vue d'ensemble des profils d'apprentissage de la classe.",
            total_unique_students, diagnostics_with_data
        )
    };

    GlobalSummary {
        total_unique_students,
        diagnostics_with_data,
        completion,
        radar,
        text,
    }
}
