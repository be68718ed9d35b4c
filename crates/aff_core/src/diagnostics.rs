//! Recoverable anomalies found while compiling rules or expanding entries.
//!
//! A diagnostic is logged at `warn` the moment it is recorded and kept in a
//! [`Diagnostics`] list, so callers can both watch stderr and enumerate gaps.

use std::fmt;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("line {line}: unknown directive '{name}'")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: '{directive}' needs an argument")]
    MissingArgument { line: usize, directive: String },

    #[error("line {line}: unsupported character set '{charset}', reading as UTF-8")]
    UnsupportedCharset { line: usize, charset: String },

    #[error("line {line}: unknown flag mode '{value}'")]
    UnknownFlagMode { line: usize, value: String },

    #[error("line {line}: FLAG {requested} overrides FLAG {previous} from line {previous_line}")]
    ConflictingFlagMode {
        line: usize,
        previous: String,
        previous_line: usize,
        requested: String,
    },

    #[error("line {line}: NEEDAFFIX {ignored} ignored, already declared as {kept}")]
    DuplicateNeedAffix {
        line: usize,
        kept: String,
        ignored: String,
    },

    #[error("{flag}: duplicate rule @ line {line}, replaces rule from line {previous_line}")]
    DuplicateRule {
        flag: String,
        line: usize,
        previous_line: usize,
    },

    #[error("{flag}: bad affix count '{count}' at line {line}, rule discarded")]
    BadAffixHeader {
        flag: String,
        line: usize,
        count: String,
    },

    #[error("{flag}: malformed affix entry at line {line}")]
    BadAffixLine { flag: String, line: usize },

    #[error("{flag}: entry at line {line} is labelled '{found}'")]
    AffixFlagMismatch {
        flag: String,
        line: usize,
        found: String,
    },

    #[error("{flag}: '{directive}' at line {line} inside affix block skipped")]
    StrayLineInBlock {
        flag: String,
        line: usize,
        directive: String,
    },

    #[error("{flag}: bad condition '{condition}' at line {line}: {reason}")]
    BadCondition {
        flag: String,
        line: usize,
        condition: String,
        reason: String,
    },

    #[error("{flag} not found (stem '{stem}')")]
    UnresolvedFlag { flag: String, stem: String },

    #[error("malformed flag '{flag}' in '{raw}'")]
    MalformedFlag { flag: String, raw: String },

    #[error("'{stem}': derivation depth {depth} reached, continuation flags ignored")]
    DepthLimit { stem: String, depth: usize },

    #[error("dictionary declares {declared} words, read {found}")]
    WordCountMismatch { declared: usize, found: usize },
}

/// Ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    /// Move already-logged diagnostics over without logging them again.
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.items.append(&mut other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for d in &self.items {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
