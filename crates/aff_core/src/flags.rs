//! Flag identifiers and the encoding used to pack them into flag strings.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::diagnostics::{Diagnostic, Diagnostics};

/// A rule identifier: one character, two characters, or a decimal number
/// depending on the active [`FlagMode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Flag(String);

impl Flag {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Flag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Flag {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How a flag string such as `AB` or `12,7` splits into flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagMode {
    /// One character per flag
    #[default]
    Char,
    /// Two characters per flag (`FLAG long`)
    Long,
    /// Comma-separated decimal numbers (`FLAG num`)
    Numeric,
}

impl FlagMode {
    /// Parse the argument of a `FLAG` directive.
    pub fn from_directive(value: &str) -> Option<Self> {
        match value {
            "long" => Some(FlagMode::Long),
            "num" => Some(FlagMode::Numeric),
            "UTF-8" | "char" => Some(FlagMode::Char),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlagMode::Char => "char",
            FlagMode::Long => "long",
            FlagMode::Numeric => "num",
        }
    }

    /// Split a flag string into flags, in order, keeping duplicates.
    ///
    /// Pieces that cannot be flags in this mode (a dangling character in
    /// long mode, a non-number in numeric mode) are reported and dropped.
    pub fn decode(self, raw: &str, diagnostics: &mut Diagnostics) -> Vec<Flag> {
        match self {
            FlagMode::Char => raw.chars().map(|c| Flag::new(c.to_string())).collect(),
            FlagMode::Long => {
                let chars: Vec<char> = raw.chars().collect();
                let mut flags = Vec::with_capacity(chars.len() / 2);
                for pair in chars.chunks(2) {
                    let id: String = pair.iter().collect();
                    if pair.len() == 2 {
                        flags.push(Flag::new(id));
                    } else {
                        diagnostics.push(Diagnostic::MalformedFlag {
                            flag: id,
                            raw: raw.to_string(),
                        });
                    }
                }
                flags
            }
            FlagMode::Numeric => raw
                .split(',')
                .map(str::trim)
                .filter_map(|piece| {
                    if !piece.is_empty() && piece.bytes().all(|b| b.is_ascii_digit()) {
                        Some(Flag::new(piece))
                    } else {
                        diagnostics.push(Diagnostic::MalformedFlag {
                            flag: piece.to_string(),
                            raw: raw.to_string(),
                        });
                        None
                    }
                })
                .collect(),
        }
    }
}

/// Settings the rule file fixes for the whole dictionary pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagConfig {
    pub mode: FlagMode,
    /// Flag marking a stem that is only valid with an affix applied.
    pub need_affix: Option<Flag>,
}

impl FlagConfig {
    pub fn is_need_affix(&self, flag: &Flag) -> bool {
        self.need_affix.as_ref() == Some(flag)
    }
}
