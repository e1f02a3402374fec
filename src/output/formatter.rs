use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::roster::StudentRecord;
use crate::scoring::{Coefficients, DiagnosticType, Observations, RythmeObservations};
use crate::summary::{rythme_global_score, ClassSummary, GlobalSummary};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Placeholder shown for a student without a category yet.
const UNLABELLED: &str = "-";

fn format_category(category: &str, use_colors: bool) -> String {
    let shown = if category.is_empty() { UNLABELLED } else { category };
    if use_colors {
        if category.is_empty() {
            shown.dimmed().to_string()
        } else {
            shown.green().to_string()
        }
    } else {
        shown.to_string()
    }
}

fn format_title(title: &str, use_colors: bool) -> String {
    if use_colors {
        title.bold().underline().to_string()
    } else {
        title.to_string()
    }
}

/// Format the imported class list, one numbered name per line
pub fn format_class_list(names: &[String], use_colors: bool) -> String {
    if names.is_empty() {
        return "No class list imported.".to_string();
    }

    names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let index_str = format!("{:>3}.", idx + 1);
            if use_colors {
                format!("{} {}", index_str.dimmed(), name)
            } else {
                format!("{} {}", index_str, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one line per student: id, name, category, then each answered criterion
/// with its chart percentage.
pub fn format_student_table<O: Observations>(students: &[StudentRecord<O>], use_colors: bool) -> String {
    if students.is_empty() {
        return "No students.".to_string();
    }

    let name_width = students
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    students
        .iter()
        .map(|student| {
            let id_str = format!("{:>3}.", student.id);
            let name = if student.name.trim().is_empty() {
                "(sans nom)".to_string()
            } else {
                student.name.clone()
            };
            let marks = student
                .observations
                .percentages()
                .into_iter()
                .filter_map(|(criterion, pct)| pct.map(|p| format!("{} {:.0}%", criterion, p)))
                .collect::<Vec<_>>()
                .join(", ");

            let line = if use_colors {
                format!(
                    "{} {:<width$}  {:<14}",
                    id_str.dimmed(),
                    name.bold(),
                    format_category(&student.category, true),
                    width = name_width
                )
            } else {
                format!(
                    "{} {:<width$}  {:<14}",
                    id_str,
                    name,
                    format_category(&student.category, false),
                    width = name_width
                )
            };

            if marks.is_empty() {
                line.trim_end().to_string()
            } else {
                format!("{}{}", line, marks)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the per-student global score of the Rythme grid
pub fn format_rythme_scores(students: &[StudentRecord<RythmeObservations>], use_colors: bool) -> String {
    students
        .iter()
        .map(|student| {
            let score = format!("{:>5.1}%", rythme_global_score(&student.observations));
            if use_colors {
                format!("  {} {}", score.bold(), student.name)
            } else {
                format!("  {} {}", score, student.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a class summary: category counts, criterion averages and the summary text
pub fn format_class_summary(summary: &ClassSummary, use_colors: bool) -> String {
    let mut lines = vec![format_title(summary.diagnostic.title(), use_colors)];
    lines.push(format!(
        "Élèves: {} ({} classé(s))",
        summary.total_students, summary.labelled_students
    ));

    if !summary.category_counts.is_empty() {
        lines.push(String::new());
        lines.push("Répartition:".to_string());
        for count in &summary.category_counts {
            let label = format!("{:<32}", count.label);
            if use_colors && count.count > 0 {
                lines.push(format!("  {} {}", label.green(), count.count.bold()));
            } else {
                lines.push(format!("  {} {}", label, count.count));
            }
        }
    }

    if !summary.criterion_averages.is_empty() {
        lines.push(String::new());
        lines.push("Moyennes par critère:".to_string());
        for avg in &summary.criterion_averages {
            lines.push(format!(
                "  {:<20} {:>3}% ({} réponse(s))",
                avg.criterion, avg.average, avg.answered
            ));
        }
    }

    lines.push(String::new());
    lines.push(summary.text.clone());
    lines.join("\n")
}

/// Format the cross-diagnostic overview
pub fn format_global_summary(summary: &GlobalSummary, use_colors: bool) -> String {
    let mut lines = vec![format_title("Vue d'ensemble", use_colors)];
    lines.push(format!(
        "Élèves uniques: {}   Diagnostics réalisés: {}",
        summary.total_unique_students, summary.diagnostics_with_data
    ));

    if !summary.completion.is_empty() {
        lines.push(String::new());
        lines.push("Complétion:".to_string());
        for (diagnostic, count) in &summary.completion {
            lines.push(format!("  {:<30} {}", diagnostic.title(), count));
        }
    }

    if !summary.radar.is_empty() {
        lines.push(String::new());
        lines.push("Indicateurs:".to_string());
        for indicator in &summary.radar {
            let score = format!("{:>3}%", indicator.score);
            if use_colors {
                lines.push(format!("  {:<20} {}", indicator.subject, score.cyan()));
            } else {
                lines.push(format!("  {:<20} {}", indicator.subject, score));
            }
        }
    }

    lines.push(String::new());
    lines.push(summary.text.clone());
    lines.join("\n")
}

/// Format coefficient values, for one diagnostic or all of them
pub fn format_coefficients(
    coefficients: &Coefficients,
    diagnostic: Option<DiagnosticType>,
    use_colors: bool,
) -> String {
    let diagnostics: Vec<DiagnosticType> = match diagnostic {
        Some(d) => vec![d],
        None => DiagnosticType::ALL.to_vec(),
    };

    diagnostics
        .iter()
        .map(|d| {
            let header = format!("{} ({})", d.title(), d.coefficients_key());
            let mut lines = vec![format_title(&header, use_colors)];
            for (key, value) in coefficients.table(*d).entries() {
                if use_colors {
                    lines.push(format!("  {:<20} {}", key, value.yellow()));
                } else {
                    lines.push(format!("  {:<20} {}", key, value));
                }
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use crate::scoring::levels::{Answer, Mastery};
    use crate::scoring::{RythmeUpdate, Style, StyleObservations, StyleUpdate};
    use crate::summary::{class_summary, cross_diagnostic_summary, GlobalData};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_class_list() {
        assert_eq!(format_class_list(&[], false), "No class list imported.");
        assert_eq!(
            format_class_list(&names(&["Amine", "Sara"]), false),
            "  1. Amine\n  2. Sara"
        );
    }

    #[test]
    fn test_format_student_table_plain() {
        let coefficients = Coefficients::default();
        let mut roster = Roster::<StyleObservations>::from_names(&names(&["Amine", "Sara"]));
        roster
            .update("Amine", StyleUpdate(Style::Visuel, Mastery::Parfait), true, &coefficients)
            .unwrap();

        let output = format_student_table(roster.students(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Amine"));
        assert!(lines[0].contains("visuel"));
        assert!(lines[0].ends_with("Visuel 100%"));
        assert_eq!(lines[1], "  2. Sara   -");
    }

    #[test]
    fn test_format_rythme_scores() {
        let coefficients = Coefficients::default();
        let mut roster = Roster::<RythmeObservations>::from_names(&names(&["Ines"]));
        roster
            .update("Ines", RythmeUpdate::FrenchReading(Answer::Correct), true, &coefficients)
            .unwrap();

        assert_eq!(format_rythme_scores(roster.students(), false), "   25.0% Ines");
    }

    #[test]
    fn test_format_class_summary_includes_text() {
        let roster = Roster::<StyleObservations>::from_names(&names(&["Amine"]));
        let summary = class_summary(&roster.completed());
        let output = format_class_summary(&summary, false);

        assert!(output.starts_with("Style d'apprentissage\n"));
        assert!(output.contains("Élèves: 1 (0 classé(s))"));
        assert!(output.ends_with("Aucun diagnostic complété."));
    }

    #[test]
    fn test_format_global_summary_empty() {
        let summary = cross_diagnostic_summary(&GlobalData::default());
        let output = format_global_summary(&summary, false);
        assert!(!output.contains("Indicateurs:"));
        assert!(output.ends_with("Aucun diagnostic disponible."));
    }

    #[test]
    fn test_format_coefficients_single() {
        let output = format_coefficients(&Coefficients::default(), Some(DiagnosticType::Style), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Style d'apprentissage (styleApprentissage)");
        assert!(lines.iter().any(|l| l.trim_start().starts_with("parfait") && l.ends_with(" 3")));
    }

    #[test]
    fn test_format_coefficients_all() {
        let output = format_coefficients(&Coefficients::default(), None, false);
        for diagnostic in DiagnosticType::ALL {
            assert!(output.contains(diagnostic.coefficients_key()));
        }
    }
}
