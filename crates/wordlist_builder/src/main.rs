//! Word List Builder CLI
//!
//! .aff + .dic → every word form, one per line

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::fs::File;
#[cfg(feature = "cli")]
use std::io::{self, BufWriter, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "wordlist_builder")]
#[command(about = "Expand a stem dictionary with its affix rules", long_about = None)]
struct Cli {
    /// Affix rule file (.aff)
    aff: PathBuf,

    /// Stem dictionary (.dic)
    dic: PathBuf,

    /// Log rule and entry details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Write word forms here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Derivation levels to follow through continuation flags
    #[arg(long, default_value_t = aff_core::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Append morphological tags after a tab
    #[arg(long)]
    annotate: bool,

    /// Expand entries in parallel (reads the whole dictionary first)
    #[arg(long)]
    parallel: bool,

    /// Print the compiled rules as JSON to stderr
    #[arg(long)]
    dump_rules: bool,

    /// Write a JSON build summary
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    wordlist_builder::check_extension(&cli.aff, "aff");
    wordlist_builder::check_extension(&cli.dic, "dic");

    let compiled = wordlist_builder::load_rules(&cli.aff)?;
    if cli.dump_rules {
        eprintln!("{}", compiled.rules.to_json_pretty()?);
    }

    let options = wordlist_builder::BuildOptions {
        expand: aff_core::ExpandOptions::default()
            .with_max_depth(cli.max_depth)
            .with_annotations(cli.annotate),
        parallel: cli.parallel,
    };

    let report = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            wordlist_builder::expand_file(&compiled, &cli.dic, BufWriter::new(file), &options)?
        }
        None => {
            let stdout = io::stdout();
            let out = BufWriter::new(stdout.lock());
            wordlist_builder::expand_file(&compiled, &cli.dic, out, &options)?
        }
    };

    tracing::info!(
        "{} rules, {} of {} declared words, {} forms",
        compiled.rules.len(),
        report.entries,
        report.declared_words,
        report.forms
    );

    if let Some(path) = &cli.summary {
        let summary = wordlist_builder::BuildSummary::new(&compiled, &report);
        save_summary(path, &summary)?;
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn save_summary(path: &Path, summary: &wordlist_builder::BuildSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    writeln!(file, "{}", json)?;
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("wordlist_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
