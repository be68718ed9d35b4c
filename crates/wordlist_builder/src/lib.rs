//! Word List Builder Library
//!
//! `.aff` rule file + `.dic` stem dictionary → one word form per line

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use aff_core::{compile_rules, CompiledRules, ExpandOptions, Expander, ExpansionReport};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

/// Settings for one build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub expand: ExpandOptions,
    /// Expand entries on the rayon pool
    pub parallel: bool,
}

/// Summary of a finished build
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    /// Rules compiled from the rule file
    pub rules: usize,
    /// Word count declared by the dictionary header
    pub declared_words: usize,
    /// Dictionary entries read
    pub entries: usize,
    /// Word forms written
    pub forms: usize,
    /// Diagnostics from rule compilation
    pub rule_diagnostics: usize,
    /// Diagnostics from expansion
    pub expansion_diagnostics: usize,
}

impl BuildSummary {
    pub fn new(compiled: &CompiledRules, report: &ExpansionReport) -> Self {
        Self {
            rules: compiled.rules.len(),
            declared_words: report.declared_words,
            entries: report.entries,
            forms: report.forms,
            rule_diagnostics: compiled.diagnostics.len(),
            expansion_diagnostics: report.diagnostics.len(),
        }
    }
}

/// Warn about unexpected file extensions; the files are read regardless.
pub fn check_extension(path: &Path, expected: &str) {
    if path.extension().and_then(|e| e.to_str()) != Some(expected) {
        warn!("{}: expected a .{} file", path.display(), expected);
    }
}

/// Compile a rule file.
///
/// # Errors
///
/// Unreadable file or a truncated affix block
pub fn load_rules(aff_path: &Path) -> Result<CompiledRules> {
    let file = File::open(aff_path)
        .with_context(|| format!("Failed to open rule file: {}", aff_path.display()))?;
    compile_rules(BufReader::new(file))
        .with_context(|| format!("Failed to compile rule file: {}", aff_path.display()))
}

/// Expand a dictionary with already compiled rules.
pub fn expand_file<W: Write>(
    compiled: &CompiledRules,
    dic_path: &Path,
    out: W,
    options: &BuildOptions,
) -> Result<ExpansionReport> {
    let file = File::open(dic_path)
        .with_context(|| format!("Failed to open dictionary: {}", dic_path.display()))?;
    let reader = BufReader::new(file);
    let expander = Expander::from_compiled(compiled).with_options(options.expand);

    let report = if options.parallel {
        expander.expand_parallel(reader, out)
    } else {
        expander.expand_dictionary(reader, out)
    };
    report.with_context(|| format!("Failed to expand dictionary: {}", dic_path.display()))
}

/// Compile `aff_path`, expand `dic_path`, and write every word form to `out`.
///
/// # Arguments
///
/// * `aff_path` - affix rule file
/// * `dic_path` - stem dictionary (word count header, then `stem[/flags]` lines)
/// * `out` - destination for the generated forms
/// * `options` - expansion settings
///
/// # Returns
///
/// Counts for the build
pub fn build_wordlist<W: Write>(
    aff_path: &Path,
    dic_path: &Path,
    out: W,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let compiled = load_rules(aff_path)?;
    let report = expand_file(&compiled, dic_path, out, options)?;
    Ok(BuildSummary::new(&compiled, &report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_build_wordlist() -> Result<()> {
        let aff = temp_file(
            "SET UTF-8\n\
             NEEDAFFIX X\n\
             SFX S Y 2\n\
             SFX S y ies [^aeiou]y\n\
             SFX S 0 s [^y]\n\
             SFX D Y 1\n\
             SFX D 0 ed/L .\n\
             SFX L Y 1\n\
             SFX L 0 ly .\n",
        )?;
        let dic = temp_file("4\nfly/S\ncat/S\nmark/DX\nthe\n")?;

        let mut out = Vec::new();
        let summary = build_wordlist(aff.path(), dic.path(), &mut out, &BuildOptions::default())?;

        let text = String::from_utf8(out)?;
        let words: Vec<&str> = text.lines().collect();
        assert_eq!(
            words,
            vec!["fly", "flies", "cat", "cats", "marked", "markedly", "the"]
        );
        assert_eq!(summary.rules, 4);
        assert_eq!(summary.entries, 4);
        assert_eq!(summary.forms, 7);
        assert_eq!(summary.rule_diagnostics, 0);
        assert_eq!(summary.expansion_diagnostics, 0);

        Ok(())
    }

    #[test]
    fn test_parallel_build_matches() -> Result<()> {
        let aff = temp_file("PFX U Y 1\nPFX U 0 un .\nSFX A Y 1\nSFX A 0 s .\n")?;
        let dic = temp_file("3\ndo/U\nlock/UA\nkey/A\n")?;

        let mut seq = Vec::new();
        build_wordlist(aff.path(), dic.path(), &mut seq, &BuildOptions::default())?;

        let options = BuildOptions {
            parallel: true,
            ..BuildOptions::default()
        };
        let mut par = Vec::new();
        build_wordlist(aff.path(), dic.path(), &mut par, &options)?;

        assert_eq!(seq, par);
        Ok(())
    }

    #[test]
    fn test_unresolved_flag_does_not_fail_build() -> Result<()> {
        let aff = temp_file("SFX A Y 1\nSFX A 0 s .\n")?;
        let dic = temp_file("1\ncat/Z\n")?;

        let mut out = Vec::new();
        let summary = build_wordlist(aff.path(), dic.path(), &mut out, &BuildOptions::default())?;

        assert_eq!(String::from_utf8(out)?, "cat\n");
        assert_eq!(summary.expansion_diagnostics, 1);
        Ok(())
    }

    #[test]
    fn test_truncated_rule_file_fails() -> Result<()> {
        let aff = temp_file("SFX A Y 3\nSFX A 0 s .\n")?;
        let dic = temp_file("1\ncat/A\n")?;

        let mut out = Vec::new();
        let err = build_wordlist(aff.path(), dic.path(), &mut out, &BuildOptions::default())
            .unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to compile rule file"));
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_dictionary_fails() -> Result<()> {
        let aff = temp_file("SFX A Y 1\nSFX A 0 s .\n")?;
        let missing = aff.path().with_extension("missing.dic");

        let err = build_wordlist(aff.path(), &missing, Vec::new(), &BuildOptions::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open dictionary"));
        Ok(())
    }
}
