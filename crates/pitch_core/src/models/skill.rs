//! Player skills and runtime effects.
//!
//! The source represents both a player's permanent skill list and a PIG's
//! transient in-match effects as comma-joined strings, with regex-based
//! membership/removal. This crate models both as a set of tags instead
//! (serialised as a sorted list for stable diffs).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named skill or runtime effect. Unrecognised names round-trip through
/// `Other` so that catalog data (which is just text) never fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Block,
    Dodge,
    Catch,
    Pass,
    SureHands,
    MightyBlow,
    ThickSkull,
    Regeneration,
    Loner,
    BoneHead,
    ReallyStupid,
    RightStuff,
    Stunty,
    AlwaysHungry,
    ThrowTeamMate,
    Other(String),
}

impl Skill {
    const NAMED: &'static [(&'static str, fn() -> Skill)] = &[
        ("Block", || Skill::Block),
        ("Dodge", || Skill::Dodge),
        ("Catch", || Skill::Catch),
        ("Pass", || Skill::Pass),
        ("Sure Hands", || Skill::SureHands),
        ("Mighty Blow", || Skill::MightyBlow),
        ("Thick Skull", || Skill::ThickSkull),
        ("Regeneration", || Skill::Regeneration),
        ("Loner", || Skill::Loner),
        ("Bone-head", || Skill::BoneHead),
        ("Really Stupid", || Skill::ReallyStupid),
        ("Right Stuff", || Skill::RightStuff),
        ("Stunty", || Skill::Stunty),
        ("Always Hungry", || Skill::AlwaysHungry),
        ("Throw Team-Mate", || Skill::ThrowTeamMate),
    ];
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, ctor) in Skill::NAMED {
            if std::mem::discriminant(&ctor()) == std::mem::discriminant(self) {
                return write!(f, "{}", name);
            }
        }
        match self {
            Skill::Other(s) => write!(f, "{}", s),
            _ => unreachable!(),
        }
    }
}

impl FromStr for Skill {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for (name, ctor) in Skill::NAMED {
            if *name == s {
                return Ok(ctor());
            }
        }
        Ok(Skill::Other(s.to_string()))
    }
}

impl Serialize for Skill {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_else(|_| Skill::Other(s)))
    }
}

/// A set of skills or effects. Serialises as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<Skill>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the comma-delimited skill strings used by the catalog and by
    /// wire payloads (e.g. `PlayerInGame.effects`).
    pub fn from_comma_list(raw: &str) -> Self {
        let mut set = BTreeSet::new();
        for part in raw.split(',') {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                set.insert(trimmed.parse().unwrap());
            }
        }
        Self(set)
    }

    pub fn has(&self, skill: &Skill) -> bool {
        self.0.contains(skill)
    }

    pub fn insert(&mut self, skill: Skill) -> bool {
        self.0.insert(skill)
    }

    pub fn remove(&mut self, skill: &Skill) -> bool {
        self.0.remove(skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_list() {
        let set = SkillSet::from_comma_list("Block,Dodge");
        assert!(set.has(&Skill::Block));
        assert!(set.has(&Skill::Dodge));
        assert!(!set.has(&Skill::Loner));
    }

    #[test]
    fn unknown_skill_round_trips() {
        let set = SkillSet::from_comma_list("Frenzy");
        assert!(set.has(&Skill::Other("Frenzy".to_string())));
        let json = serde_json::to_string(&set).unwrap();
        let back: SkillSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn empty_string_yields_empty_set() {
        let set = SkillSet::from_comma_list("");
        assert!(set.is_empty());
    }

    #[test]
    fn add_remove_effect() {
        let mut set = SkillSet::new();
        assert!(set.insert(Skill::BoneHead));
        assert!(set.has(&Skill::BoneHead));
        assert!(set.remove(&Skill::BoneHead));
        assert!(!set.has(&Skill::BoneHead));
    }
}
