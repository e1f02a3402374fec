use crate::roster::StudentRecord;
use crate::scoring::{DiagnosticType, Level, Observations, RythmeObservations};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Mean chart percentage of one criterion over the students who answered it.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionAverage {
    pub criterion: &'static str,
    /// Rounded to the nearest integer; 0 when nobody answered.
    pub average: u32,
    pub answered: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub diagnostic: DiagnosticType,
    pub total_students: usize,
    /// Students with a determined category.
    pub labelled_students: usize,
    pub category_counts: Vec<CategoryCount>,
    pub criterion_averages: Vec<CriterionAverage>,
    pub text: String,
}

impl ClassSummary {
    pub fn count(&self, label: &str) -> usize {
        self.category_counts
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.count)
    }
}

/// Count students per category label, ignoring undetermined ones.
///
/// Closed category sets are listed in display order with zeros included; open ones
/// (intelligence profiles) in first-seen order.
pub fn count_categories<O: Observations>(students: &[StudentRecord<O>]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = O::KIND
        .categories()
        .iter()
        .map(|label| CategoryCount {
            label: label.to_string(),
            count: 0,
        })
        .collect();

    for student in students.iter().filter(|s| s.is_labelled()) {
        match counts.iter_mut().find(|c| c.label == student.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                label: student.category.clone(),
                count: 1,
            }),
        }
    }
    counts
}

pub fn criterion_averages<O: Observations>(students: &[StudentRecord<O>]) -> Vec<CriterionAverage> {
    let mut averages: Vec<(&'static str, f64, usize)> = Vec::new();

    for student in students {
        for (i, (criterion, percent)) in student.observations.percentages().into_iter().enumerate() {
            if averages.len() <= i {
                averages.push((criterion, 0.0, 0));
            }
            if let Some(percent) = percent {
                averages[i].1 += percent;
                averages[i].2 += 1;
            }
        }
    }

    if averages.is_empty() {
        averages = O::default()
            .percentages()
            .into_iter()
            .map(|(criterion, _)| (criterion, 0.0, 0))
            .collect();
    }

    averages
        .into_iter()
        .map(|(criterion, total, answered)| CriterionAverage {
            criterion,
            average: if answered > 0 {
                (total / answered as f64).round() as u32
            } else {
                0
            },
            answered,
        })
        .collect()
}

/// Reduce a scored roster to the figures and sentence shown on the results page.
pub fn class_summary<O: Observations>(students: &[StudentRecord<O>]) -> ClassSummary {
    let category_counts = count_categories(students);
    let labelled_students = students.iter().filter(|s| s.is_labelled()).count();
    let text = summary_text(O::KIND, students.len(), labelled_students, &category_counts);

    ClassSummary {
        diagnostic: O::KIND,
        total_students: students.len(),
        labelled_students,
        category_counts,
        criterion_averages: criterion_averages(students),
        text,
    }
}

fn summary_text(
    diagnostic: DiagnosticType,
    total: usize,
    labelled: usize,
    counts: &[CategoryCount],
) -> String {
    if labelled == 0 {
        return "Aucun diagnostic complété.".to_string();
    }

    if diagnostic == DiagnosticType::Intelligences {
        let mut ranked: Vec<&CategoryCount> = counts.iter().collect();
        // Stable sort: ties keep first-seen order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        let most = ranked[0];
        return format!(
            "Sur {} élève(s) évalué(s), {} type(s) d'intelligence différent(s) identifié(s). \
             L'intelligence {} est la plus représentée avec {} élève(s).",
            total,
            counts.len(),
            most.label,
            most.count
        );
    }

    let parts: Vec<String> = counts
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| describe(diagnostic, c))
        .collect();

    format!("Sur {} élève(s) évalué(s) : {}.", total, parts.join(", "))
}

fn describe(diagnostic: DiagnosticType, c: &CategoryCount) -> String {
    match diagnostic {
        DiagnosticType::Rythme => format!("{} avec un rythme {}", c.count, c.label),
        DiagnosticType::Style => {
            let style = if c.label == "kinesthesique" {
                "kinesthésique"
            } else {
                c.label.as_str()
            };
            format!("{} avec un style {}", c.count, style)
        }
        DiagnosticType::SoutienFamilial => {
            format!("{} avec un soutien familial {}", c.count, c.label)
        }
        DiagnosticType::MotivationParticipation => {
            format!("{} avec une motivation {}", c.count, c.label)
        }
        DiagnosticType::Intelligences => format!("{} avec le profil {}", c.count, c.label),
    }
}

/// Per-student academic score: each criterion mapped to 100/50/0, averaged over all
/// four criteria (unanswered ones count as 0).
pub fn rythme_global_score(obs: &RythmeObservations) -> f64 {
    let total: f64 = [
        obs.french_reading.selected().map(Level::percent),
        obs.french_calcul.selected().map(Level::percent),
        obs.french_writing.selected().map(Level::percent),
        obs.arabic_reading.selected().map(Level::percent),
    ]
    .into_iter()
    .map(|p| p.unwrap_or(0.0))
    .sum();
    total / 4.0
}
