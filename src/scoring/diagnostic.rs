use std::fmt;

/// The five observation grids a teacher can fill for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DiagnosticType {
    /// Rythme d'apprentissage
    #[value(name = "rythme")]
    Rythme,
    /// Style d'apprentissage
    #[value(name = "style")]
    Style,
    /// Intelligences multiples
    #[value(name = "intelligences")]
    Intelligences,
    /// Soutien familial
    #[value(name = "soutien")]
    SoutienFamilial,
    /// Motivation et participation
    #[value(name = "motivation")]
    MotivationParticipation,
}

impl DiagnosticType {
    pub const ALL: [DiagnosticType; 5] = [
        DiagnosticType::Rythme,
        DiagnosticType::Style,
        DiagnosticType::Intelligences,
        DiagnosticType::SoutienFamilial,
        DiagnosticType::MotivationParticipation,
    ];

    /// Store key under which the class results are persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            DiagnosticType::Rythme => "diagnosticResults",
            DiagnosticType::Style => "styleApprentissageResults",
            DiagnosticType::Intelligences => "intelligencesMultiplesResults",
            DiagnosticType::SoutienFamilial => "soutienFamilialResults",
            DiagnosticType::MotivationParticipation => "motivationParticipationResults",
        }
    }

    /// Name of this diagnostic's section in the persisted coefficients.
    pub fn coefficients_key(self) -> &'static str {
        match self {
            DiagnosticType::Rythme => "diagnosticGeneral",
            DiagnosticType::Style => "styleApprentissage",
            DiagnosticType::Intelligences => "intelligencesMultiples",
            DiagnosticType::SoutienFamilial => "soutienFamilial",
            DiagnosticType::MotivationParticipation => "motivationParticipation",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DiagnosticType::Rythme => "Rythme d'apprentissage",
            DiagnosticType::Style => "Style d'apprentissage",
            DiagnosticType::Intelligences => "Intelligences multiples",
            DiagnosticType::SoutienFamilial => "Soutien familial",
            DiagnosticType::MotivationParticipation => "Motivation et participation",
        }
    }

    /// The closed set of category labels, in display order.
    ///
    /// Empty for Intelligences multiples, whose labels are open-ended profile combinations.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            DiagnosticType::Rythme => &["rapide", "normal", "lent"],
            DiagnosticType::Style => &["visuel", "auditif", "kinesthesique"],
            DiagnosticType::Intelligences => &[],
            DiagnosticType::SoutienFamilial => &["fort", "moyen", "faible"],
            DiagnosticType::MotivationParticipation => &["haute", "moyenne", "basse"],
        }
    }
}

impl fmt::Display for DiagnosticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_distinct() {
        let mut keys: Vec<_> = DiagnosticType::ALL.iter().map(|d| d.storage_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), DiagnosticType::ALL.len());
    }

    #[test]
    fn test_intelligences_has_open_categories() {
        assert!(DiagnosticType::Intelligences.categories().is_empty());
        assert_eq!(DiagnosticType::Rythme.categories(), &["rapide", "normal", "lent"]);
    }
}
