//! Expansion engine.
//!
//! Turns each dictionary line into its word forms: the stem itself (unless
//! it carries the need-affix flag), then every form its flags derive, each
//! derived form followed immediately by the forms derived from it.

use std::io::{BufRead, Write};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dictionary::{DictionaryReader, Entry};
use crate::error::Result;
use crate::flags::FlagConfig;
use crate::rules::{CompiledRules, RuleSet};

pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Continuation levels followed before further flags are ignored; 0
    /// applies the dictionary entry's own flags only
    pub max_depth: usize,
    /// Append the morphological tags of the producing affixes to each form
    pub annotate: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            annotate: false,
        }
    }
}

impl ExpandOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }
}

/// Forms generated from one dictionary line.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub forms: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Totals for a whole dictionary pass.
#[derive(Debug, Clone, Default)]
pub struct ExpansionReport {
    pub declared_words: usize,
    pub entries: usize,
    pub forms: usize,
    pub diagnostics: Diagnostics,
}

impl ExpansionReport {
    fn new(declared_words: usize) -> Self {
        Self {
            declared_words,
            ..Self::default()
        }
    }

    fn record<W: Write>(&mut self, mut expansion: Expansion, out: &mut W) -> std::io::Result<()> {
        for form in &expansion.forms {
            writeln!(out, "{}", form)?;
        }
        self.entries += 1;
        self.forms += expansion.forms.len();
        self.diagnostics.append(&mut expansion.diagnostics);
        Ok(())
    }

    fn finish(&mut self) {
        if self.declared_words != self.entries {
            self.diagnostics.push(Diagnostic::WordCountMismatch {
                declared: self.declared_words,
                found: self.entries,
            });
        }
        info!(
            "Expanded {} entries into {} forms ({} diagnostics)",
            self.entries,
            self.forms,
            self.diagnostics.len()
        );
    }
}

/// Applies a compiled rule set to dictionary lines.
///
/// Holds only shared references, so one expander can serve many threads.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    rules: &'a RuleSet,
    config: &'a FlagConfig,
    options: ExpandOptions,
}

impl<'a> Expander<'a> {
    pub fn new(rules: &'a RuleSet, config: &'a FlagConfig) -> Self {
        Self {
            rules,
            config,
            options: ExpandOptions::default(),
        }
    }

    pub fn from_compiled(compiled: &'a CompiledRules) -> Self {
        Self::new(&compiled.rules, &compiled.config)
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExpandOptions {
        self.options
    }

    /// Expand a single `stem[/flags]` line.
    pub fn expand_entry(&self, line: &str) -> Expansion {
        let mut forms = Vec::new();
        let mut diagnostics = Diagnostics::new();
        self.expand_with(line, &mut diagnostics, &mut |form: String| forms.push(form));
        Expansion { forms, diagnostics }
    }

    /// Expand a single line, handing each form to `emit` as soon as it is
    /// generated.
    pub fn expand_with(
        &self,
        line: &str,
        diagnostics: &mut Diagnostics,
        emit: &mut dyn FnMut(String),
    ) {
        let mut tags = Vec::new();
        self.expand_line(line, 0, &mut tags, diagnostics, emit);
    }

    fn expand_line(
        &self,
        line: &str,
        depth: usize,
        tags: &mut Vec<&'a str>,
        diagnostics: &mut Diagnostics,
        emit: &mut dyn FnMut(String),
    ) {
        let entry = Entry::parse(line);
        let Some(raw_flags) = entry.flags else {
            emit(self.format(entry.stem, tags));
            return;
        };

        let flags = self.config.mode.decode(raw_flags, diagnostics);
        let needs_affix = flags.iter().any(|f| self.config.is_need_affix(f));
        if !needs_affix {
            emit(self.format(entry.stem, tags));
        }

        // Dictionary entries always derive; only continuation levels count.
        if depth > 0 && depth >= self.options.max_depth {
            diagnostics.push(Diagnostic::DepthLimit {
                stem: entry.stem.to_string(),
                depth,
            });
            return;
        }

        for flag in &flags {
            if self.config.is_need_affix(flag) {
                continue;
            }
            let Some(rule) = self.rules.get(flag.as_str()) else {
                diagnostics.push(Diagnostic::UnresolvedFlag {
                    flag: flag.to_string(),
                    stem: entry.stem.to_string(),
                });
                continue;
            };

            for affix in &rule.affixes {
                if !affix.matches(entry.stem) {
                    continue;
                }
                match affix.apply(entry.stem) {
                    Some(derived) => {
                        let pushed = if self.options.annotate {
                            tags.extend(affix.morph.iter().map(String::as_str));
                            affix.morph.len()
                        } else {
                            0
                        };
                        match &affix.continuation {
                            Some(cont) => {
                                let next = format!("{}/{}", derived, cont);
                                self.expand_line(&next, depth + 1, tags, diagnostics, emit);
                            }
                            None => self.expand_line(&derived, depth + 1, tags, diagnostics, emit),
                        }
                        tags.truncate(tags.len() - pushed);
                    }
                    None => debug!(
                        "{}: '{}' lacks '{}' at the {:?} edge",
                        flag, entry.stem, affix.strip, affix.direction
                    ),
                }

                // An unconditional entry ends the rule whether or not it produced a form.
                if affix.is_unconditional() {
                    break;
                }
            }
        }
    }

    fn format(&self, word: &str, tags: &[&str]) -> String {
        if self.options.annotate && !tags.is_empty() {
            format!("{}\t{}", word, tags.join(" "))
        } else {
            word.to_string()
        }
    }

    /// Expand a whole dictionary, writing one form per line to `out` as it
    /// is generated.
    pub fn expand_dictionary<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut out: W,
    ) -> Result<ExpansionReport> {
        let mut dict = DictionaryReader::new(reader)?;
        let mut report = ExpansionReport::new(dict.declared());
        debug!("{} words declared", dict.declared());

        while let Some(line) = dict.next_entry()? {
            let mut written = 0;
            let mut failed: Option<std::io::Error> = None;
            self.expand_with(&line, &mut report.diagnostics, &mut |form: String| {
                if failed.is_some() {
                    return;
                }
                match writeln!(out, "{}", form) {
                    Ok(()) => written += 1,
                    Err(e) => failed = Some(e),
                }
            });
            if let Some(e) = failed {
                return Err(e.into());
            }
            report.entries += 1;
            report.forms += written;
        }
        out.flush()?;

        report.finish();
        Ok(report)
    }

    /// Same output as [`expand_dictionary`](Self::expand_dictionary), with
    /// entries expanded on the rayon pool. The dictionary is read fully
    /// first; forms are written in input order.
    pub fn expand_parallel<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut out: W,
    ) -> Result<ExpansionReport> {
        let dict = DictionaryReader::new(reader)?;
        let mut report = ExpansionReport::new(dict.declared());
        let entries = dict.entries()?;

        let expansions: Vec<Expansion> = entries
            .par_iter()
            .map(|line| self.expand_entry(line))
            .collect();
        for expansion in expansions {
            report.record(expansion, &mut out)?;
        }
        out.flush()?;

        report.finish();
        Ok(report)
    }
}


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use crate::rules::compile_str;
    use proptest::prelude::*;

    proptest! {
        /// Property: a line without flags expands to exactly itself
        #[test]
        fn prop_plain_stem_is_identity(stem in "[a-zà-ÿ]{1,12}") {
            let compiled = compile_str("SFX A Y 1\nA 0 s .\n").unwrap();
            let e = Expander::from_compiled(&compiled).expand_entry(&stem);
            prop_assert_eq!(e.forms, vec![stem]);
        }

        /// Property: the need-affix flag keeps the bare stem out of the output
        #[test]
        fn prop_need_affix_never_emits_stem(stem in "[a-z]{1,12}") {
            let compiled = compile_str("NEEDAFFIX X\nSFX A Y 1\nA 0 s .\n").unwrap();
            let line = format!("{}/XA", stem);
            let e = Expander::from_compiled(&compiled).expand_entry(&line);
            prop_assert!(!e.forms.contains(&stem));
            prop_assert_eq!(e.forms, vec![format!("{}s", stem)]);
        }

        /// Property: an unconditional entry ends the rule, whatever follows it
        #[test]
        fn prop_unconditional_entry_short_circuits(stem in "[a-z]{1,12}", tail in 1usize..5) {
            let mut aff = format!("SFX A Y {}\nSFX A 0 s .\n", tail + 1);
            for i in 0..tail {
                aff.push_str(&format!("SFX A 0 x{} .\n", i));
            }
            let compiled = compile_str(&aff).unwrap();
            let e = Expander::from_compiled(&compiled).expand_entry(&format!("{}/A", stem));
            prop_assert_eq!(e.forms.len(), 2);
        }
    }
}
