use std::path::{Path, PathBuf};

use clap::Parser;

mod aggregate;
mod config;
mod files;
mod identity;
mod models;
mod report;

use config::ReportConfig;

#[derive(Parser)]
#[command(name = "attendance-reports")]
#[command(
    about = "Generate cohort attendance reports from meeting participant exports",
    long_about = None
)]
struct Cli {
    /// Directories containing participants*.csv exports; each is processed
    /// independently, with reports written back into it
    directories: Vec<PathBuf>,

    /// Warn about participants who attended this many distinct sessions or fewer
    #[arg(short = 'm', long, default_value_t = 0)]
    min_sessions: u32,

    /// Path to a JSON identity configuration file (aliases, excluded and
    /// verified domains)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let directories = if cli.directories.is_empty() {
        println!("No directories given, processing the current directory");
        vec![PathBuf::from(".")]
    } else {
        cli.directories.clone()
    };

    let mut failures = 0usize;
    for dir in &directories {
        println!("===== Processing directory \"{}\" =====", dir.display());
        if let Err(err) = process_directory(dir, &config, cli.min_sessions) {
            eprintln!("error: no reports written for {}: {:#}", dir.display(), err);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} directories failed", directories.len());
    }
    Ok(())
}

/// One isolated unit of work: aggregate every export in `dir` into a fresh
/// ledger, then write the three reports back into `dir`. Any malformed row
/// aborts before anything is written; other directories are unaffected.
fn process_directory(
    dir: &Path,
    config: &ReportConfig,
    warning_threshold: u32,
) -> anyhow::Result<()> {
    let exports = files::discover_participant_files(dir)?;
    if exports.is_empty() {
        println!("No participants*.csv files found in {}", dir.display());
    }

    let mut ledger = aggregate::AttendanceLedger::new();
    for file in &exports {
        let rows = files::read_attendance_rows(file)?;
        println!("Processing file {} ({} rows)", file.display(), rows.len());
        for row in rows {
            ledger.fold(config, row);
        }
    }

    for suggestion in identity::suggest_pairings(config, &ledger) {
        println!(
            "NOTE: participant {}, {} not matched to an institutional email address",
            suggestion.name, suggestion.email
        );
        for candidate in &suggestion.matches {
            println!("  might match {}, {}", candidate.name, candidate.email);
            println!(
                "  if so, add alias entry \"{}\": \"{}\" to the configuration",
                suggestion.email, candidate.email
            );
        }
    }

    let reports = report::build_reports(&ledger, config, warning_threshold);
    files::write_reports(dir, &reports)?;

    for warning in &reports.warnings {
        println!(
            "WARNING: participant {} {} only attended {} sessions",
            warning.name, warning.email, warning.sessions
        );
    }

    println!("Reports written to {}", dir.display());
    Ok(())
}
