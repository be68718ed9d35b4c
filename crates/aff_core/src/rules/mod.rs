//! Affix rules: data model and compiler.
//!
//! A [`Rule`] groups the [`Affix`] transformations declared under one flag.
//! Prefix and suffix affixes share one type; the edge they touch is decided
//! by their [`Direction`].

pub mod compiler;
pub mod condition;
pub mod directive;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::flags::Flag;

pub use compiler::{compile_rules, compile_str, CompiledRules};
pub use condition::{Condition, ConditionError};

/// Which edge of the stem an affix works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prefix,
    Suffix,
}

impl Direction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "PFX" => Some(Direction::Prefix),
            "SFX" => Some(Direction::Suffix),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Prefix => "PFX",
            Direction::Suffix => "SFX",
        }
    }

    /// Remove `strip` from this edge of `stem`, or `None` if the stem does
    /// not carry it there.
    pub fn strip<'a>(self, stem: &'a str, strip: &str) -> Option<&'a str> {
        match self {
            Direction::Prefix => stem.strip_prefix(strip),
            Direction::Suffix => stem.strip_suffix(strip),
        }
    }

    /// Attach `append` at this edge of `base`.
    pub fn attach(self, base: &str, append: &str) -> String {
        let mut out = String::with_capacity(base.len() + append.len());
        match self {
            Direction::Prefix => {
                out.push_str(append);
                out.push_str(base);
            }
            Direction::Suffix => {
                out.push_str(base);
                out.push_str(append);
            }
        }
        out
    }

    /// Anchor a condition body to this edge.
    pub(crate) fn anchor(self, body: &str) -> String {
        match self {
            Direction::Prefix => format!("^(?:{})", body),
            Direction::Suffix => format!("(?:{})$", body),
        }
    }
}

/// One strip/append transformation.
#[derive(Debug, Clone, Serialize)]
pub struct Affix {
    pub direction: Direction,
    /// Removed from the stem edge; empty removes nothing
    pub strip: String,
    /// Added at the same edge; empty adds nothing
    pub append: String,
    /// Flags attached to the derived form (`append/FLAGS`), still encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
    /// `None` always matches
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub morph: Vec<String>,
}

impl Affix {
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_none()
    }

    pub fn matches(&self, stem: &str) -> bool {
        self.condition.as_ref().map_or(true, |c| c.matches(stem))
    }

    /// Strip and append. `None` when the stem lacks the strip text at this
    /// edge or nothing would be left.
    pub fn apply(&self, stem: &str) -> Option<String> {
        let base = self.direction.strip(stem, &self.strip)?;
        let derived = self.direction.attach(base, &self.append);
        if derived.is_empty() {
            None
        } else {
            Some(derived)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Affix(Direction),
    /// Stem marker declared with `NEEDAFFIX`; carries no affixes
    NeedAffix,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub flag: Flag,
    pub kind: RuleKind,
    /// Parsed from the header, unused by expansion
    pub cross_product: bool,
    /// Affix count from the header
    pub declared: usize,
    /// Rule file line that declared the rule
    pub line: usize,
    pub affixes: Vec<Affix>,
}

impl Rule {
    pub fn need_affix(flag: Flag, line: usize) -> Self {
        Self {
            flag,
            kind: RuleKind::NeedAffix,
            cross_product: false,
            declared: 0,
            line,
            affixes: Vec::new(),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.kind {
            RuleKind::Affix(direction) => Some(direction),
            RuleKind::NeedAffix => None,
        }
    }
}

/// Flag → rule mapping. Read-only once compiled.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: FxHashMap<Flag, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, returning the one it replaces.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.flag.clone(), rule)
    }

    pub fn get(&self, flag: &str) -> Option<&Rule> {
        self.rules.get(flag)
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.rules.contains_key(flag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rules keyed and sorted by flag, for stable dumps.
    pub fn sorted(&self) -> BTreeMap<&Flag, &Rule> {
        self.rules.iter().collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.sorted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affix(direction: Direction, strip: &str, append: &str, cond: Option<&str>) -> Affix {
        Affix {
            direction,
            strip: strip.to_string(),
            append: append.to_string(),
            continuation: None,
            condition: cond.map(|c| Condition::compile(c, direction).unwrap()),
            morph: Vec::new(),
        }
    }

    #[test]
    fn test_suffix_strip_and_append() {
        let a = affix(Direction::Suffix, "y", "ies", Some("[^aeiou]y"));
        assert!(a.matches("fly"));
        assert_eq!(a.apply("fly").as_deref(), Some("flies"));
        assert!(!a.matches("day"));
    }

    #[test]
    fn test_prefix_strip_and_append() {
        let a = affix(Direction::Prefix, "", "re", None);
        assert_eq!(a.apply("do").as_deref(), Some("redo"));

        let b = affix(Direction::Prefix, "un", "in", Some("un"));
        assert_eq!(b.apply("undo").as_deref(), Some("indo"));
    }

    #[test]
    fn test_apply_requires_strip_at_edge() {
        let a = affix(Direction::Suffix, "e", "ing", None);
        assert_eq!(a.apply("make").as_deref(), Some("making"));
        assert_eq!(a.apply("walk"), None);
    }

    #[test]
    fn test_apply_never_yields_empty_form() {
        let a = affix(Direction::Suffix, "a", "", None);
        assert_eq!(a.apply("a"), None);
    }

    #[test]
    fn test_direction_keywords() {
        assert_eq!(Direction::from_keyword("PFX"), Some(Direction::Prefix));
        assert_eq!(Direction::from_keyword("SFX"), Some(Direction::Suffix));
        assert_eq!(Direction::from_keyword("sfx"), None);
        assert_eq!(Direction::Suffix.keyword(), "SFX");
    }

    #[test]
    fn test_rule_set_replaces_and_reports_previous() {
        let mut set = RuleSet::new();
        assert!(set.insert(Rule::need_affix(Flag::from("X"), 1)).is_none());
        let previous = set.insert(Rule::need_affix(Flag::from("X"), 9));
        assert_eq!(previous.map(|r| r.line), Some(1));
        assert_eq!(set.get("X").map(|r| r.line), Some(9));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_dump_is_sorted_by_flag() {
        let mut set = RuleSet::new();
        set.insert(Rule::need_affix(Flag::from("B"), 2));
        set.insert(Rule::need_affix(Flag::from("A"), 1));
        let json = set.to_json_pretty().unwrap();
        let a = json.find("\"A\"").unwrap();
        let b = json.find("\"B\"").unwrap();
        assert!(a < b);
    }
}
