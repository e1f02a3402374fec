use std::fmt;

use super::coefficients::{
    IntelligenceCoefficients, MotivationCoefficients, RythmeCoefficients, SoutienCoefficients,
    StyleCoefficients,
};
use super::observations::{
    IntelligenceObservations, MotivationObservations, RythmeObservations, SoutienObservations,
    StyleObservations,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rhythm {
    Rapide,
    Normal,
    Lent,
}

impl Rhythm {
    pub fn as_str(self) -> &'static str {
        match self {
            Rhythm::Rapide => "rapide",
            Rhythm::Normal => "normal",
            Rhythm::Lent => "lent",
        }
    }
}

/// Learning style. Also names the three criteria of the style grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Visuel,
    Auditif,
    Kinesthesique,
}

impl Style {
    /// Evaluation order; the first style reaching the maximum wins a tie.
    pub const ALL: [Style; 3] = [Style::Visuel, Style::Auditif, Style::Kinesthesique];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Visuel => "visuel",
            Style::Auditif => "auditif",
            Style::Kinesthesique => "kinesthesique",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Style::Visuel => "Visuel",
            Style::Auditif => "Auditif",
            Style::Kinesthesique => "Kinesthésique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intelligence {
    Linguistique,
    LogicoMath,
    Spatiale,
    Musicale,
    Corporelle,
    Interpersonnelle,
    Intrapersonnelle,
    Naturaliste,
}

impl Intelligence {
    pub const ALL: [Intelligence; 8] = [
        Intelligence::Linguistique,
        Intelligence::LogicoMath,
        Intelligence::Spatiale,
        Intelligence::Musicale,
        Intelligence::Corporelle,
        Intelligence::Interpersonnelle,
        Intelligence::Intrapersonnelle,
        Intelligence::Naturaliste,
    ];

    /// Criterion key in persisted JSON.
    pub fn key(self) -> &'static str {
        match self {
            Intelligence::Linguistique => "linguistique",
            Intelligence::LogicoMath => "logicoMath",
            Intelligence::Spatiale => "spatiale",
            Intelligence::Musicale => "musicale",
            Intelligence::Corporelle => "corporelle",
            Intelligence::Interpersonnelle => "interpersonnelle",
            Intelligence::Intrapersonnelle => "intrapersonnelle",
            Intelligence::Naturaliste => "naturaliste",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Intelligence::Linguistique => "Linguistique",
            Intelligence::LogicoMath => "Logico-mathématique",
            Intelligence::Spatiale => "Spatiale",
            Intelligence::Musicale => "Musicale",
            Intelligence::Corporelle => "Corporelle",
            Intelligence::Interpersonnelle => "Interpersonnelle",
            Intelligence::Intrapersonnelle => "Intrapersonnelle",
            Intelligence::Naturaliste => "Naturaliste",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    Fort,
    Moyen,
    Faible,
}

impl Support {
    pub fn as_str(self) -> &'static str {
        match self {
            Support::Fort => "fort",
            Support::Moyen => "moyen",
            Support::Faible => "faible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engagement {
    Haute,
    Moyenne,
    Basse,
}

impl Engagement {
    pub fn as_str(self) -> &'static str {
        match self {
            Engagement::Haute => "haute",
            Engagement::Moyenne => "moyenne",
            Engagement::Basse => "basse",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_as_str!(Rhythm, Style, Support, Engagement);

/// Mean of the answered criteria; `None` when nothing is answered.
pub fn average<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, answered) = scores
        .into_iter()
        .flatten()
        .fold((0.0, 0u32), |(sum, n), score| (sum + score, n + 1));

    if answered == 0 {
        None
    } else {
        Some(sum / answered as f64)
    }
}

pub fn classify_rythme(obs: &RythmeObservations, c: &RythmeCoefficients) -> Option<Rhythm> {
    let avg = average([
        obs.french_reading.selected().map(|l| c.answer(l)),
        obs.french_calcul.selected().map(|l| c.answer(l)),
        obs.french_writing.selected().map(|l| c.writing(l)),
        obs.arabic_reading.selected().map(|l| c.arabic(l)),
    ])?;

    Some(if avg >= c.seuil_rapide {
        Rhythm::Rapide
    } else if avg >= c.seuil_lent {
        Rhythm::Normal
    } else {
        Rhythm::Lent
    })
}

/// Dominant learning style.
///
/// Unanswered criteria score 0. The first style in `Style::ALL` order reaching the
/// maximum wins, so a visuel/auditif tie resolves to visuel. A maximum of 0 yields `None`.
pub fn classify_style(obs: &StyleObservations, c: &StyleCoefficients) -> Option<Style> {
    let scores = Style::ALL.map(|style| {
        let score = obs.group(style).selected().map_or(0.0, |l| c.weight(l));
        (style, score)
    });

    let max = scores
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        return None;
    }

    scores
        .iter()
        .find(|(_, score)| *score == max)
        .map(|(style, _)| *style)
}

/// Every intelligence sharing the highest positive score, in `Intelligence::ALL` order.
pub fn classify_intelligences(
    obs: &IntelligenceObservations,
    c: &IntelligenceCoefficients,
) -> Vec<Intelligence> {
    let mut max = 0.0;
    let mut dominant = Vec::new();

    for intelligence in Intelligence::ALL {
        let score = obs.group(intelligence).selected().map_or(0.0, |l| c.weight(l));
        if score > max {
            max = score;
            dominant = vec![intelligence];
        } else if score == max && score > 0.0 {
            dominant.push(intelligence);
        }
    }

    dominant
}

/// Profile label such as "Linguistique + Spatiale"; "" for an empty profile.
pub fn profile_label(profile: &[Intelligence]) -> String {
    profile
        .iter()
        .map(|i| i.display_name())
        .collect::<Vec<_>>()
        .join(" + ")
}

pub fn classify_soutien(obs: &SoutienObservations, c: &SoutienCoefficients) -> Option<Support> {
    let avg = average([
        obs.organisation.selected().map(|l| c.organisation(l)),
        obs.encadrement.selected().map(|l| c.encadrement(l)),
        obs.motivation.selected().map(|l| c.motivation(l)),
    ])?;

    Some(if avg >= c.seuil_fort {
        Support::Fort
    } else if avg >= c.seuil_moyen {
        Support::Moyen
    } else {
        Support::Faible
    })
}

pub fn classify_motivation(
    obs: &MotivationObservations,
    c: &MotivationCoefficients,
) -> Option<Engagement> {
    let avg = average([
        obs.participation.selected().map(|l| c.participation(l)),
        obs.motivation.selected().map(|l| c.motivation(l)),
    ])?;

    Some(if avg >= c.seuil_haute {
        Engagement::Haute
    } else if avg >= c.seuil_moyenne {
        Engagement::Moyenne
    } else {
        Engagement::Basse
    })
}
