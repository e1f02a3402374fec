use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::coefficients::Coefficients;
use super::diagnostic::DiagnosticType;
use super::engine::{
    classify_intelligences, classify_motivation, classify_rythme, classify_soutien,
    classify_style, profile_label, Intelligence, Style,
};
use super::levels::{
    Answer, ArabicAnswer, Drive, Encadrement, Group, Level, Mastery, Organisation, Participation,
    Strength, Writing,
};

/// The observation grid of one diagnostic for one student.
pub trait Observations:
    Default + Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned
{
    /// A (criterion, level) pair of this grid.
    type Update: Copy + fmt::Debug;

    const KIND: DiagnosticType;

    /// JSON field holding the derived label in persisted rows.
    const LABEL_KEY: &'static str;

    /// Write one checkbox, keeping each criterion's levels mutually exclusive.
    fn apply(&mut self, update: Self::Update, checked: bool);

    /// Category label for the current state; "" when nothing can be determined yet.
    fn classify(&self, coefficients: &Coefficients) -> String;

    /// Chart percentage per criterion, `None` for unanswered criteria.
    fn percentages(&self) -> Vec<(&'static str, Option<f64>)>;

    /// Free-text teacher observation, for grids that carry one. Never scored.
    fn note_mut(&mut self) -> Option<&mut String> {
        None
    }
}

fn percent<L: Level>(group: &Group<L>) -> Option<f64> {
    group.selected().map(Level::percent)
}

fn parse_level<L: Level>(criterion: &str, level: &str) -> Result<L> {
    match L::parse(level) {
        Some(level) => Ok(level),
        None => bail!(
            "Unknown level '{}' for {} (expected one of: {})",
            level,
            criterion,
            L::expected()
        ),
    }
}

fn unknown_criterion<T>(diagnostic: DiagnosticType, criterion: &str, expected: &[&str]) -> Result<T> {
    bail!(
        "Unknown criterion '{}' for {} (expected one of: {})",
        criterion,
        diagnostic.title(),
        expected.join(", ")
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RythmeObservations {
    pub french_reading: Group<Answer>,
    pub french_calcul: Group<Answer>,
    pub french_writing: Group<Writing>,
    pub arabic_reading: Group<ArabicAnswer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RythmeUpdate {
    FrenchReading(Answer),
    FrenchCalcul(Answer),
    FrenchWriting(Writing),
    ArabicReading(ArabicAnswer),
}

impl RythmeUpdate {
    pub const CRITERIA: [&'static str; 4] =
        ["frenchReading", "frenchCalcul", "frenchWriting", "arabicReading"];

    pub fn parse(criterion: &str, level: &str) -> Result<Self> {
        match criterion {
            "frenchReading" => Ok(Self::FrenchReading(parse_level(criterion, level)?)),
            "frenchCalcul" => Ok(Self::FrenchCalcul(parse_level(criterion, level)?)),
            "frenchWriting" => Ok(Self::FrenchWriting(parse_level(criterion, level)?)),
            "arabicReading" => Ok(Self::ArabicReading(parse_level(criterion, level)?)),
            _ => unknown_criterion(DiagnosticType::Rythme, criterion, &Self::CRITERIA),
        }
    }
}

impl Observations for RythmeObservations {
    type Update = RythmeUpdate;
    const KIND: DiagnosticType = DiagnosticType::Rythme;
    const LABEL_KEY: &'static str = "finalCategory";

    fn apply(&mut self, update: RythmeUpdate, checked: bool) {
        match update {
            RythmeUpdate::FrenchReading(level) => self.french_reading.set(level, checked),
            RythmeUpdate::FrenchCalcul(level) => self.french_calcul.set(level, checked),
            RythmeUpdate::FrenchWriting(level) => self.french_writing.set(level, checked),
            RythmeUpdate::ArabicReading(level) => self.arabic_reading.set(level, checked),
        }
    }

    fn classify(&self, coefficients: &Coefficients) -> String {
        classify_rythme(self, &coefficients.diagnostic_general)
            .map(|c| c.as_str().to_string())
            .unwrap_or_default()
    }

    fn percentages(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Français Lecture", percent(&self.french_reading)),
            ("Français Calcul", percent(&self.french_calcul)),
            ("Français Écriture", percent(&self.french_writing)),
            ("Arabe Lecture", percent(&self.arabic_reading)),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleObservations {
    pub visuel: Group<Mastery>,
    pub auditif: Group<Mastery>,
    pub kinesthesique: Group<Mastery>,
}

impl StyleObservations {
    pub fn group(&self, style: Style) -> &Group<Mastery> {
        match style {
            Style::Visuel => &self.visuel,
            Style::Auditif => &self.auditif,
            Style::Kinesthesique => &self.kinesthesique,
        }
    }

    pub fn group_mut(&mut self, style: Style) -> &mut Group<Mastery> {
        match style {
            Style::Visuel => &mut self.visuel,
            Style::Auditif => &mut self.auditif,
            Style::Kinesthesique => &mut self.kinesthesique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleUpdate(pub Style, pub Mastery);

impl StyleUpdate {
    pub fn parse(criterion: &str, level: &str) -> Result<Self> {
        match Style::ALL.iter().find(|style| style.as_str() == criterion) {
            Some(style) => Ok(Self(*style, parse_level(criterion, level)?)),
            None => {
                let expected: Vec<_> = Style::ALL.iter().map(|s| s.as_str()).collect();
                unknown_criterion(DiagnosticType::Style, criterion, &expected)
            }
        }
    }
}

impl Observations for StyleObservations {
    type Update = StyleUpdate;
    const KIND: DiagnosticType = DiagnosticType::Style;
    const LABEL_KEY: &'static str = "styleDominant";

    fn apply(&mut self, StyleUpdate(style, level): StyleUpdate, checked: bool) {
        self.group_mut(style).set(level, checked);
    }

    fn classify(&self, coefficients: &Coefficients) -> String {
        classify_style(self, &coefficients.style_apprentissage)
            .map(|style| style.as_str().to_string())
            .unwrap_or_default()
    }

    fn percentages(&self) -> Vec<(&'static str, Option<f64>)> {
        Style::ALL
            .iter()
            .map(|style| (style.display_name(), percent(self.group(*style))))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntelligenceObservations {
    pub linguistique: Group<Strength>,
    pub logico_math: Group<Strength>,
    pub spatiale: Group<Strength>,
    pub musicale: Group<Strength>,
    pub corporelle: Group<Strength>,
    pub interpersonnelle: Group<Strength>,
    pub intrapersonnelle: Group<Strength>,
    pub naturaliste: Group<Strength>,
}

impl IntelligenceObservations {
    pub fn group(&self, intelligence: Intelligence) -> &Group<Strength> {
        match intelligence {
            Intelligence::Linguistique => &self.linguistique,
            Intelligence::LogicoMath => &self.logico_math,
            Intelligence::Spatiale => &self.spatiale,
            Intelligence::Musicale => &self.musicale,
            Intelligence::Corporelle => &self.corporelle,
            Intelligence::Interpersonnelle => &self.interpersonnelle,
            Intelligence::Intrapersonnelle => &self.intrapersonnelle,
            Intelligence::Naturaliste => &self.naturaliste,
        }
    }

    pub fn group_mut(&mut self, intelligence: Intelligence) -> &mut Group<Strength> {
        match intelligence {
            Intelligence::Linguistique => &mut self.linguistique,
            Intelligence::LogicoMath => &mut self.logico_math,
            Intelligence::Spatiale => &mut self.spatiale,
            Intelligence::Musicale => &mut self.musicale,
            Intelligence::Corporelle => &mut self.corporelle,
            Intelligence::Interpersonnelle => &mut self.interpersonnelle,
            Intelligence::Intrapersonnelle => &mut self.intrapersonnelle,
            Intelligence::Naturaliste => &mut self.naturaliste,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntelligenceUpdate(pub Intelligence, pub Strength);

impl IntelligenceUpdate {
    pub fn parse(criterion: &str, level: &str) -> Result<Self> {
        match Intelligence::ALL.iter().find(|i| i.key() == criterion) {
            Some(intelligence) => Ok(Self(*intelligence, parse_level(criterion, level)?)),
            None => {
                let expected: Vec<_> = Intelligence::ALL.iter().map(|i| i.key()).collect();
                unknown_criterion(DiagnosticType::Intelligences, criterion, &expected)
            }
        }
    }
}

impl Observations for IntelligenceObservations {
    type Update = IntelligenceUpdate;
    const KIND: DiagnosticType = DiagnosticType::Intelligences;
    const LABEL_KEY: &'static str = "profilDominant";

    fn apply(&mut self, IntelligenceUpdate(intelligence, level): IntelligenceUpdate, checked: bool) {
        self.group_mut(intelligence).set(level, checked);
    }

    fn classify(&self, coefficients: &Coefficients) -> String {
        profile_label(&classify_intelligences(self, &coefficients.intelligences_multiples))
    }

    fn percentages(&self) -> Vec<(&'static str, Option<f64>)> {
        Intelligence::ALL
            .iter()
            .map(|i| (i.display_name(), percent(self.group(*i))))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoutienObservations {
    pub organisation: Group<Organisation>,
    pub encadrement: Group<Encadrement>,
    pub motivation: Group<Drive>,
    pub observation_enseignant: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoutienUpdate {
    Organisation(Organisation),
    Encadrement(Encadrement),
    Motivation(Drive),
}

impl SoutienUpdate {
    pub const CRITERIA: [&'static str; 3] = ["organisation", "encadrement", "motivation"];

    pub fn parse(criterion: &str, level: &str) -> Result<Self> {
        match criterion {
            "organisation" => Ok(Self::Organisation(parse_level(criterion, level)?)),
            "encadrement" => Ok(Self::Encadrement(parse_level(criterion, level)?)),
            "motivation" => Ok(Self::Motivation(parse_level(criterion, level)?)),
            _ => unknown_criterion(DiagnosticType::SoutienFamilial, criterion, &Self::CRITERIA),
        }
    }
}

impl Observations for SoutienObservations {
    type Update = SoutienUpdate;
    const KIND: DiagnosticType = DiagnosticType::SoutienFamilial;
    const LABEL_KEY: &'static str = "niveauSoutien";

    fn apply(&mut self, update: SoutienUpdate, checked: bool) {
        match update {
            SoutienUpdate::Organisation(level) => self.organisation.set(level, checked),
            SoutienUpdate::Encadrement(level) => self.encadrement.set(level, checked),
            SoutienUpdate::Motivation(level) => self.motivation.set(level, checked),
        }
    }

    fn classify(&self, coefficients: &Coefficients) -> String {
        classify_soutien(self, &coefficients.soutien_familial)
            .map(|c| c.as_str().to_string())
            .unwrap_or_default()
    }

    fn percentages(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Organisation", percent(&self.organisation)),
            ("Encadrement", percent(&self.encadrement)),
            ("Motivation", percent(&self.motivation)),
        ]
    }

    fn note_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.observation_enseignant)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotivationObservations {
    pub participation: Group<Participation>,
    pub motivation: Group<Drive>,
    pub observation_enseignant: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotivationUpdate {
    Participation(Participation),
    Motivation(Drive),
}

impl MotivationUpdate {
    pub const CRITERIA: [&'static str; 2] = ["participation", "motivation"];

    pub fn parse(criterion: &str, level: &str) -> Result<Self> {
        match criterion {
            "participation" => Ok(Self::Participation(parse_level(criterion, level)?)),
            "motivation" => Ok(Self::Motivation(parse_level(criterion, level)?)),
            _ => unknown_criterion(
                DiagnosticType::MotivationParticipation,
                criterion,
                &Self::CRITERIA,
            ),
        }
    }
}

impl Observations for MotivationObservations {
    type Update = MotivationUpdate;
    const KIND: DiagnosticType = DiagnosticType::MotivationParticipation;
    const LABEL_KEY: &'static str = "niveauGlobal";

    fn apply(&mut self, update: MotivationUpdate, checked: bool) {
        match update {
            MotivationUpdate::Participation(level) => self.participation.set(level, checked),
            MotivationUpdate::Motivation(level) => self.motivation.set(level, checked),
        }
    }

    fn classify(&self, coefficients: &Coefficients) -> String {
        classify_motivation(self, &coefficients.motivation_participation)
            .map(|c| c.as_str().to_string())
            .unwrap_or_default()
    }

    fn percentages(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Participation", percent(&self.participation)),
            ("Motivation", percent(&self.motivation)),
        ]
    }

    fn note_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.observation_enseignant)
    }
}

/// A checkbox write addressed to any of the five grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationUpdate {
    Rythme(RythmeUpdate),
    Style(StyleUpdate),
    Intelligences(IntelligenceUpdate),
    SoutienFamilial(SoutienUpdate),
    MotivationParticipation(MotivationUpdate),
}

impl ObservationUpdate {
    /// Parse a criterion and level key (as they appear in persisted JSON) for a diagnostic.
    pub fn parse(diagnostic: DiagnosticType, criterion: &str, level: &str) -> Result<Self> {
        let criterion = criterion.trim();
        Ok(match diagnostic {
            DiagnosticType::Rythme => Self::Rythme(RythmeUpdate::parse(criterion, level)?),
            DiagnosticType::Style => Self::Style(StyleUpdate::parse(criterion, level)?),
            DiagnosticType::Intelligences => {
                Self::Intelligences(IntelligenceUpdate::parse(criterion, level)?)
            }
            DiagnosticType::SoutienFamilial => {
                Self::SoutienFamilial(SoutienUpdate::parse(criterion, level)?)
            }
            DiagnosticType::MotivationParticipation => {
                Self::MotivationParticipation(MotivationUpdate::parse(criterion, level)?)
            }
        })
    }

    pub fn diagnostic(&self) -> DiagnosticType {
        match self {
            Self::Rythme(_) => DiagnosticType::Rythme,
            Self::Style(_) => DiagnosticType::Style,
            Self::Intelligences(_) => DiagnosticType::Intelligences,
            Self::SoutienFamilial(_) => DiagnosticType::SoutienFamilial,
            Self::MotivationParticipation(_) => DiagnosticType::MotivationParticipation,
        }
    }
}
