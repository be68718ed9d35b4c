//! # aff_core - Affix Rule Compiler and Word-Form Expander
//!
//! Generates every surface form of a word list from a Hunspell-style rule
//! file (`.aff`) and a stem dictionary (`.dic`).
//!
//! ## Pipeline
//! - [`compile_rules`] reads the rule file once into a [`RuleSet`] plus the
//!   [`FlagConfig`] it declares
//! - [`Expander`] applies the rules to each `stem[/flags]` line, following
//!   continuation flags on derived forms
//!
//! ```rust
//! use aff_core::{compile_str, Expander};
//!
//! let compiled = compile_str("SFX A Y 1\nSFX A 0 s .\n").unwrap();
//! let expansion = Expander::from_compiled(&compiled).expand_entry("cat/A");
//! assert_eq!(expansion.forms, vec!["cat", "cats"]);
//! ```
//!
//! Recoverable problems (unknown directives, unresolved flags, ...) are
//! [`Diagnostic`]s: logged through `tracing` and collected, never raised.
//! Only structural damage is an [`AffError`].

pub mod diagnostics;
pub mod dictionary;
pub mod error;
pub mod expand;
pub mod flags;
pub mod rules;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use dictionary::{DictionaryReader, Entry};
pub use error::{AffError, Result};
pub use expand::{ExpandOptions, Expander, Expansion, ExpansionReport, DEFAULT_MAX_DEPTH};
pub use flags::{Flag, FlagConfig, FlagMode};
pub use rules::{
    compile_rules, compile_str, Affix, CompiledRules, Condition, ConditionError, Direction, Rule,
    RuleKind, RuleSet,
};
