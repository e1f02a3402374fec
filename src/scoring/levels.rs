use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// One checkbox column of an observation grid.
///
/// `ALL` lists the levels strongest first. That order doubles as the precedence used
/// when persisted data has more than one level flagged in the same group.
pub trait Level: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Key used in persisted JSON and on the command line (e.g. "partiel").
    fn key(self) -> &'static str;

    /// Percentage shown in class charts for this level.
    fn percent(self) -> f64;

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|level| level.key() == s)
    }

    /// Comma-separated list of accepted keys, for error messages.
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|level| level.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! levels {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal, $pct:literal;)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Level for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn percent(self) -> f64 {
                match self {
                    $($name::$variant => $pct),+
                }
            }
        }
    };
}

levels! {
    /// French reading and calculation answers.
    Answer {
        Correct => "correct", 100.0;
        Partiel => "partiel", 50.0;
        Faux => "faux", 0.0;
    }
}

levels! {
    /// Arabic reading answers (the wrong answer is keyed "wrong", not "faux").
    ArabicAnswer {
        Correct => "correct", 100.0;
        Partiel => "partiel", 50.0;
        Wrong => "wrong", 0.0;
    }
}

levels! {
    Writing {
        Oui => "oui", 100.0;
        Incomplet => "incomplet", 50.0;
    }
}

levels! {
    /// Learning style affinity.
    Mastery {
        Parfait => "parfait", 100.0;
        Moyen => "moyen", 50.0;
        Faible => "faible", 25.0;
    }
}

levels! {
    /// Strength of one intelligence.
    Strength {
        Fort => "fort", 100.0;
        Moyen => "moyen", 50.0;
        Faible => "faible", 25.0;
    }
}

levels! {
    Organisation {
        Bonne => "bonne", 100.0;
        Moyenne => "moyenne", 50.0;
        Faible => "faible", 25.0;
    }
}

levels! {
    Encadrement {
        Present => "present", 100.0;
        Occasionnel => "occasionnel", 50.0;
        Absent => "absent", 25.0;
    }
}

levels! {
    /// Motivation as observed in the family support and participation grids.
    Drive {
        Forte => "forte", 100.0;
        Moyenne => "moyenne", 50.0;
        Faible => "faible", 25.0;
    }
}

levels! {
    Participation {
        Active => "active", 100.0;
        Moyenne => "moyenne", 50.0;
        Faible => "faible", 25.0;
    }
}

/// A set of mutually exclusive levels for one criterion of one student.
///
/// At most one level is selected; `None` means the teacher left the criterion unanswered.
/// Persisted as `{"<level>": bool, ...}` with one entry per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group<L> {
    selected: Option<L>,
}

impl<L> Default for Group<L> {
    fn default() -> Self {
        Self { selected: None }
    }
}

impl<L: Level> Group<L> {
    pub fn new(selected: Option<L>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<L> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_checked(&self, level: L) -> bool {
        self.selected == Some(level)
    }

    /// Write one checkbox of the group.
    ///
    /// The group is reset before the write: checking a level drops any other level,
    /// and unchecking any level leaves the group unanswered.
    pub fn set(&mut self, level: L, checked: bool) {
        self.selected = checked.then_some(level);
    }
}

impl<L: Level> Serialize for Group<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(L::ALL.len()))?;
        for level in L::ALL {
            map.serialize_entry(level.key(), &self.is_checked(*level))?;
        }
        map.end()
    }
}

impl<'de, L: Level> Deserialize<'de> for Group<L> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupVisitor(PhantomData))
    }
}

struct GroupVisitor<L>(PhantomData<L>);

impl<'de, L: Level> Visitor<'de> for GroupVisitor<L> {
    type Value = Group<L>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a map of {} to booleans", L::expected())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut checked = Vec::new();
        while let Some((key, value)) = access.next_entry::<String, bool>()? {
            // Unknown keys are ignored
            if let Some(level) = L::parse(&key) {
                if value {
                    checked.push(level);
                }
            }
        }

        let selected = L::ALL.iter().copied().find(|level| checked.contains(level));
        Ok(Group { selected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_keys() {
        assert_eq!(Answer::parse("partiel"), Some(Answer::Partiel));
        assert_eq!(ArabicAnswer::parse("wrong"), Some(ArabicAnswer::Wrong));
        assert_eq!(ArabicAnswer::parse("faux"), None);
        assert_eq!(Writing::parse(" oui "), Some(Writing::Oui));
        assert_eq!(Mastery::parse("Parfait"), None);
    }

    #[test]
    fn test_checking_clears_other_levels() {
        let mut group = Group::<Mastery>::default();
        group.set(Mastery::Faible, true);
        group.set(Mastery::Parfait, true);

        assert!(group.is_checked(Mastery::Parfait));
        assert!(!group.is_checked(Mastery::Faible));
        assert!(!group.is_checked(Mastery::Moyen));
    }

    #[test]
    fn test_unchecking_clears_group() {
        let mut group = Group::new(Some(Strength::Fort));
        group.set(Strength::Moyen, false);
        assert!(!group.is_answered());
    }

    #[test]
    fn test_serializes_every_level() {
        let group = Group::new(Some(Answer::Partiel));
        let json = serde_json::to_value(group).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"correct": false, "partiel": true, "faux": false})
        );
    }

    #[test]
    fn test_deserialize_all_false_is_unanswered() {
        let group: Group<Writing> =
            serde_json::from_str(r#"{"oui": false, "incomplet": false}"#).unwrap();
        assert_eq!(group.selected(), None);
    }

    #[test]
    fn test_deserialize_several_flags_keeps_strongest() {
        let group: Group<Answer> =
            serde_json::from_str(r#"{"faux": true, "partiel": true, "correct": false}"#).unwrap();
        assert_eq!(group.selected(), Some(Answer::Partiel));
    }

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let group: Group<Encadrement> =
            serde_json::from_str(r#"{"present": true, "sometimes": true}"#).unwrap();
        assert_eq!(group.selected(), Some(Encadrement::Present));
    }
}
