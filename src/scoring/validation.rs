use super::coefficients::Coefficients;
use super::diagnostic::DiagnosticType;

/// Parse `key=value` coefficient assignments for one diagnostic.
/// Returns all errors at once (not just the first).
///
/// Only the shape is checked: the key must exist and the value must be a finite number.
/// Any finite value is accepted, including negative weights or inverted thresholds.
pub fn parse_assignments(
    diagnostic: DiagnosticType,
    assignments: &[String],
) -> Result<Vec<(String, f64)>, Vec<String>> {
    let defaults = Coefficients::default();
    let known = defaults.table(diagnostic).keys();
    let section = diagnostic.coefficients_key();

    let mut errors = Vec::new();
    let mut parsed = Vec::new();

    if assignments.is_empty() {
        errors.push(format!("{}: no coefficient given", section));
    }

    for (i, assignment) in assignments.iter().enumerate() {
        let Some((key, value)) = assignment.split_once('=') else {
            errors.push(format!(
                "{}[{}]: expected key=value, got '{}'",
                section, i, assignment
            ));
            continue;
        };
        let key = key.trim();

        if !known.contains(&key) {
            errors.push(format!(
                "{}.{}: unknown coefficient (expected one of: {})",
                section,
                key,
                known.join(", ")
            ));
        }

        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => parsed.push((key.to_string(), number)),
            _ => errors.push(format!("{}.{}: '{}' is not a number", section, key, value.trim())),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_assignments() {
        let parsed = parse_assignments(
            DiagnosticType::SoutienFamilial,
            &args(&["seuilFort=2.7", " bonne = 4 "]),
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![("seuilFort".to_string(), 2.7), ("bonne".to_string(), 4.0)]
        );
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let parsed =
            parse_assignments(DiagnosticType::Style, &args(&["parfait=-12", "faible=1000"]))
                .unwrap();
        assert_eq!(parsed[0].1, -12.0);
        assert_eq!(parsed[1].1, 1000.0);
    }

    #[test]
    fn test_unknown_key() {
        let errors =
            parse_assignments(DiagnosticType::Intelligences, &args(&["parfait=3"])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("intelligencesMultiples.parfait"));
    }

    #[test]
    fn test_not_a_number() {
        let errors = parse_assignments(
            DiagnosticType::Rythme,
            &args(&["correct=abc", "partiel=NaN", "faux=inf"]),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("'abc' is not a number"));
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = parse_assignments(
            DiagnosticType::MotivationParticipation,
            &args(&["seuilHaute", "bogus=1", "active=x"]),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("expected key=value"));
    }

    #[test]
    fn test_empty_assignments() {
        let errors = parse_assignments(DiagnosticType::Style, &[]).unwrap_err();
        assert!(errors[0].contains("no coefficient given"));
    }
}
