// ABOUTME: CLI for cleaning captured HTML pages with the pagescrub library.
// ABOUTME: Provides clean (navigation-preserving prune) and styles (font/color report) commands.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagescrub::CleanConfig;

#[derive(Parser, Debug)]
#[command(name = "pagescrub")]
#[command(about = "Clean captured HTML pages while preserving navigation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean one HTML file and write the pruned document.
    Clean {
        /// Input HTML file.
        input: PathBuf,

        /// Output file path.
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// JSON file with rule-set overrides (defaults apply for missing fields).
        #[arg(long = "rules")]
        rules: Option<PathBuf>,

        /// Print a size-reduction summary to stderr.
        #[arg(long = "stats")]
        stats: bool,
    },
    /// Report the fonts, colors, and stylesheets used by an HTML file.
    Styles {
        /// Input HTML file.
        input: PathBuf,

        /// Output file path (default: stdout).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output the report as JSON instead of plain text.
        #[arg(long = "json")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Clean {
            input,
            output,
            rules,
            stats,
        } => run_clean(&input, &output, rules.as_deref(), stats),
        Command::Styles {
            input,
            output,
            json,
        } => run_styles(&input, output.as_deref(), json),
    }
}

fn run_clean(input: &Path, output: &Path, rules: Option<&Path>, stats: bool) -> Result<()> {
    let config = load_config(rules)?;
    let cleaned = pagescrub::clean_file(input, &config)
        .with_context(|| format!("failed to clean {}", input.display()))?;

    write_atomic(output, cleaned.html.as_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    if stats {
        eprintln!("original size: {} bytes", cleaned.input_bytes);
        eprintln!("cleaned size:  {} bytes", cleaned.output_bytes);
        eprintln!(
            "reduced by:    {} bytes ({:.1}%)",
            cleaned.reduction(),
            cleaned.reduction_percent()
        );
        eprintln!(
            "removed {} elements, stripped {} attributes",
            cleaned.removed_elements, cleaned.stripped_attributes
        );
    }

    Ok(())
}

fn run_styles(input: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let report = pagescrub::analyze_file(input)
        .with_context(|| format!("failed to analyze {}", input.display()))?;

    let rendered = if json {
        let mut s = serde_json::to_string_pretty(&report)?;
        s.push('\n');
        s
    } else {
        report.to_text()
    };

    match output {
        Some(path) => write_atomic(path, rendered.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn load_config(rules: Option<&Path>) -> Result<CleanConfig> {
    match rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid rules file {}", path.display()))
        }
        None => Ok(CleanConfig::default()),
    }
}

/// Write via a temporary file in the destination directory and rename into
/// place, so a failure never leaves a truncated output file behind.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path)?;
    Ok(())
}
