//! Affix match conditions.
//!
//! A condition is a sequence of atoms: a literal character, `.` for any
//! character, or a bracket group `[abc]` / `[^abc]`. Prefix conditions are
//! anchored at the start of the stem, suffix conditions at the end.

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::Direction;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("unterminated character group")]
    Unterminated,

    #[error("empty character group")]
    EmptyGroup,

    #[error("unexpected ']'")]
    StrayBracket,

    #[error("{0}")]
    Regex(String),
}

/// A compiled, direction-anchored condition.
#[derive(Debug, Clone)]
pub struct Condition {
    source: String,
    regex: Regex,
}

impl Condition {
    /// Compile `source` for an affix working on the given edge.
    ///
    /// Callers treat `.` as "no condition" before getting here; compiling it
    /// anyway yields a condition that matches any non-empty stem.
    pub fn compile(source: &str, direction: Direction) -> Result<Self, ConditionError> {
        let body = translate(source)?;
        let regex = Regex::new(&direction.anchor(&body))
            .map_err(|e| ConditionError::Regex(e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, stem: &str) -> bool {
        self.regex.is_match(stem)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Rewrite condition atoms as regex syntax. Everything but `.` and bracket
/// groups is literal.
fn translate(source: &str) -> Result<String, ConditionError> {
    let mut out = String::with_capacity(source.len() * 2);
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => out.push('.'),
            '[' => {
                let mut group = String::new();
                let mut negated = false;
                let mut closed = false;
                let mut first = true;
                for g in chars.by_ref() {
                    match g {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '^' if first => negated = true,
                        _ => group.push_str(&regex::escape(&g.to_string())),
                    }
                    first = false;
                }
                if !closed {
                    return Err(ConditionError::Unterminated);
                }
                if group.is_empty() {
                    return Err(ConditionError::EmptyGroup);
                }
                out.push('[');
                if negated {
                    out.push('^');
                }
                out.push_str(&group);
                out.push(']');
            }
            ']' => return Err(ConditionError::StrayBracket),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    Ok(out)
}
