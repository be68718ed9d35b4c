//! Rule file compiler.
//!
//! Reads the rule file once, front to back, and produces the [`RuleSet`],
//! the [`FlagConfig`] and every diagnostic noticed on the way. The only
//! failures are I/O errors and an affix block cut short by end of input.

use std::io::{BufRead, Lines};

use tracing::{debug, info};

use super::condition::Condition;
use super::directive::{tokenize, AffixHeader, AffixLine, Directive};
use super::{Affix, Direction, Rule, RuleKind, RuleSet};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{AffError, Result};
use crate::flags::{Flag, FlagConfig, FlagMode};

/// Output of a rule compile.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    pub rules: RuleSet,
    pub config: FlagConfig,
    pub diagnostics: Diagnostics,
}

/// Compile a rule file from any buffered reader.
pub fn compile_rules<R: BufRead>(reader: R) -> Result<CompiledRules> {
    RuleCompiler::new(reader).compile()
}

/// Compile rule file text held in memory.
pub fn compile_str(text: &str) -> Result<CompiledRules> {
    compile_rules(text.as_bytes())
}

struct RuleCompiler<R> {
    lines: Lines<R>,
    line_no: usize,
    rules: RuleSet,
    mode: Option<(FlagMode, usize)>,
    need_affix: Option<Flag>,
    /// Flag of the last header whose count was unreadable; its entries are
    /// skipped without further reports
    discarded: Option<Flag>,
    diagnostics: Diagnostics,
}

impl<R: BufRead> RuleCompiler<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            rules: RuleSet::new(),
            mode: None,
            need_affix: None,
            discarded: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Next line that is neither blank nor a comment.
    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if tokenize(&line).is_some() {
                return Ok(Some((self.line_no, line)));
            }
        }
        Ok(None)
    }

    fn compile(mut self) -> Result<CompiledRules> {
        while let Some((line_no, line)) = self.next_line()? {
            let tokens = tokenize(&line).unwrap_or_default();
            if tokens.is_empty() {
                continue;
            }
            match Directive::parse(&tokens) {
                Directive::Flag(value) => self.flag_mode(line_no, value),
                Directive::Set(value) => self.charset(line_no, value),
                Directive::Try => {}
                Directive::NeedAffix(value) => self.need_affix(line_no, value),
                Directive::Affix(header) => self.affix_block(line_no, header)?,
                Directive::ShortHeader(_, Some(flag)) if self.is_discarded(flag) => {}
                Directive::ShortHeader(direction, flag) => {
                    self.diagnostics.push(Diagnostic::BadAffixHeader {
                        flag: flag.unwrap_or_default().to_string(),
                        line: line_no,
                        count: String::new(),
                    });
                    debug!("{} header at line {} has too few fields", direction.keyword(), line_no);
                }
                Directive::Unknown(name) => {
                    if self.is_discarded(name) {
                        continue;
                    }
                    self.diagnostics.push(Diagnostic::UnknownDirective {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
            }
        }

        let config = FlagConfig {
            mode: self.mode.map(|(mode, _)| mode).unwrap_or_default(),
            need_affix: self.need_affix,
        };
        info!(
            "Compiled {} rules (flag mode {}, {} diagnostics)",
            self.rules.len(),
            config.mode.name(),
            self.diagnostics.len()
        );

        Ok(CompiledRules {
            rules: self.rules,
            config,
            diagnostics: self.diagnostics,
        })
    }

    fn is_discarded(&self, flag: &str) -> bool {
        self.discarded.as_ref().is_some_and(|d| d.as_str() == flag)
    }

    fn flag_mode(&mut self, line_no: usize, value: Option<&str>) {
        let Some(value) = value else {
            self.diagnostics.push(Diagnostic::MissingArgument {
                line: line_no,
                directive: "FLAG".to_string(),
            });
            return;
        };
        let Some(mode) = FlagMode::from_directive(value) else {
            self.diagnostics.push(Diagnostic::UnknownFlagMode {
                line: line_no,
                value: value.to_string(),
            });
            return;
        };
        if let Some((previous, previous_line)) = self.mode {
            if previous != mode {
                self.diagnostics.push(Diagnostic::ConflictingFlagMode {
                    line: line_no,
                    previous: previous.name().to_string(),
                    previous_line,
                    requested: mode.name().to_string(),
                });
            }
        }
        self.mode = Some((mode, line_no));
    }

    fn charset(&mut self, line_no: usize, value: Option<&str>) {
        match value {
            Some(v) if v.eq_ignore_ascii_case("UTF-8") => {}
            Some(v) => self.diagnostics.push(Diagnostic::UnsupportedCharset {
                line: line_no,
                charset: v.to_string(),
            }),
            None => self.diagnostics.push(Diagnostic::MissingArgument {
                line: line_no,
                directive: "SET".to_string(),
            }),
        }
    }

    fn need_affix(&mut self, line_no: usize, value: Option<&str>) {
        let Some(value) = value else {
            self.diagnostics.push(Diagnostic::MissingArgument {
                line: line_no,
                directive: "NEEDAFFIX".to_string(),
            });
            return;
        };
        if let Some(kept) = &self.need_affix {
            self.diagnostics.push(Diagnostic::DuplicateNeedAffix {
                line: line_no,
                kept: kept.to_string(),
                ignored: value.to_string(),
            });
            return;
        }
        let flag = Flag::from(value);
        self.need_affix = Some(flag.clone());
        self.insert(Rule::need_affix(flag, line_no));
    }

    /// Last declaration wins; the replaced one is reported.
    fn insert(&mut self, rule: Rule) {
        let (flag, line) = (rule.flag.to_string(), rule.line);
        if let Some(previous) = self.rules.insert(rule) {
            self.diagnostics.push(Diagnostic::DuplicateRule {
                flag,
                line,
                previous_line: previous.line,
            });
        }
    }

    fn affix_block(&mut self, line_no: usize, header: AffixHeader) -> Result<()> {
        // Entries of a discarded block look like headers; a numeric append
        // field would otherwise read as a count.
        if self.is_discarded(header.flag.as_str()) {
            debug!("{}: skipping entry of discarded rule at line {}", header.flag, line_no);
            return Ok(());
        }
        let count = match header.count {
            Ok(count) => count,
            Err(raw) => {
                self.diagnostics.push(Diagnostic::BadAffixHeader {
                    flag: header.flag.to_string(),
                    line: line_no,
                    count: raw,
                });
                self.discarded = Some(header.flag);
                return Ok(());
            }
        };
        self.discarded = None;

        let flag = header.flag;
        let direction = header.direction;
        let mut affixes = Vec::with_capacity(count);
        let mut taken = 0;

        while taken < count {
            let Some((entry_line, line)) = self.next_line()? else {
                return Err(AffError::TruncatedAffixBlock {
                    flag: flag.to_string(),
                    declared: count,
                    found: taken,
                    line: line_no,
                });
            };
            let tokens = tokenize(&line).unwrap_or_default();
            let fields: &[&str] = if Direction::from_keyword(tokens[0]).is_some() {
                &tokens[1..]
            } else if tokens[0] == flag.as_str() {
                &tokens
            } else {
                self.diagnostics.push(Diagnostic::StrayLineInBlock {
                    flag: flag.to_string(),
                    line: entry_line,
                    directive: tokens[0].to_string(),
                });
                continue;
            };
            taken += 1;

            if let Some(affix) = self.affix_entry(&flag, direction, entry_line, fields) {
                affixes.push(affix);
            }
        }

        debug!(
            "{} {}: {} of {} entries kept",
            direction.keyword(),
            flag,
            affixes.len(),
            count
        );
        self.insert(Rule {
            flag,
            kind: RuleKind::Affix(direction),
            cross_product: header.cross_product,
            declared: count,
            line: line_no,
            affixes,
        });
        Ok(())
    }

    fn affix_entry(
        &mut self,
        flag: &Flag,
        direction: Direction,
        line_no: usize,
        fields: &[&str],
    ) -> Option<Affix> {
        let Some(entry) = AffixLine::parse(fields) else {
            self.diagnostics.push(Diagnostic::BadAffixLine {
                flag: flag.to_string(),
                line: line_no,
            });
            return None;
        };
        if entry.flag != flag.as_str() {
            self.diagnostics.push(Diagnostic::AffixFlagMismatch {
                flag: flag.to_string(),
                line: line_no,
                found: entry.flag.to_string(),
            });
        }

        let condition = entry.condition.and_then(|source| {
            match Condition::compile(source, direction) {
                Ok(condition) => Some(condition),
                Err(e) => {
                    self.diagnostics.push(Diagnostic::BadCondition {
                        flag: flag.to_string(),
                        line: line_no,
                        condition: source.to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        });

        Some(Affix {
            direction,
            strip: entry.strip.to_string(),
            append: entry.append.to_string(),
            continuation: entry.continuation.map(str::to_string),
            condition,
            morph: entry.morph.iter().map(|m| m.to_string()).collect(),
        })
    }
}
