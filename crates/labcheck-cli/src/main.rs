//! Labcheck CLI - lab worksheet checking tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use labcheck::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "labcheck")]
#[command(author, version, about = "Load, check, and report on lab worksheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the structure of a worksheet document
    Info {
        /// Worksheet document (CSV)
        input: PathBuf,

        /// Also list every row with its id and trial slots
        #[arg(short, long)]
        rows: bool,
    },

    /// Grade saved answers against a worksheet
    Check {
        /// Worksheet document (CSV)
        input: PathBuf,

        /// Answers file (JSON, as produced by a saved session)
        #[arg(short, long)]
        answers: PathBuf,

        /// Only check the named subsection (as listed by `info`)
        #[arg(short, long)]
        subsection: Option<String>,

        /// Emit verdicts as JSON instead of text
        #[arg(short, long)]
        json: bool,
    },

    /// Produce a text report of graded answers
    Report {
        /// Worksheet document (CSV)
        input: PathBuf,

        /// Answers file (JSON, as produced by a saved session)
        #[arg(short, long)]
        answers: PathBuf,

        /// Student name for the report header
        #[arg(short, long)]
        student: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, rows } => show_info(&input, rows),
        Commands::Check {
            input,
            answers,
            subsection,
            json,
        } => check(&input, &answers, subsection.as_deref(), json),
        Commands::Report {
            input,
            answers,
            student,
            output,
        } => report(&input, &answers, student.as_deref(), output.as_deref()),
    }
}

fn show_info(input: &Path, rows: bool) -> Result<()> {
    let sheet = Worksheet::load(input)
        .with_context(|| format!("Failed to load '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Title: {}", sheet.title());
    println!(
        "Tolerance: {} (close: {})",
        sheet.tolerance(),
        sheet.tolerance_close()
    );
    let (_, input_cells) = sheet.completion();
    println!("Rows: {} ({} input cells)", sheet.row_count(), input_cells);
    println!();

    for key in sheet.subsections() {
        let count = sheet.rows_in_subsection(&key).count();
        println!("{}: {} rows", key, count);
        if rows {
            for row in sheet.rows_in_subsection(&key) {
                let slots: Vec<String> = row
                    .trial_cells()
                    .map(|(slot, cell)| {
                        if cell.accepts_input {
                            slot.to_string()
                        } else {
                            format!("{} (no input)", slot)
                        }
                    })
                    .collect();
                let unit = if row.unit.is_empty() {
                    String::new()
                } else {
                    format!(", {}", row.unit)
                };
                println!(
                    "  {} {} [{}{}] {}",
                    row.id,
                    row.label,
                    row.entry_type,
                    unit,
                    slots.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Load the worksheet and replay the saved answers into a session
fn load_session(input: &Path, answers: &Path) -> Result<Session> {
    let mut session = Session::with_pacing(CheckPacing::none());
    session
        .load_worksheet_file(input)
        .with_context(|| format!("Failed to load '{}'", input.display()))?;

    let raw = fs::read_to_string(answers)
        .with_context(|| format!("Failed to read '{}'", answers.display()))?;
    let snapshot: SessionSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse '{}'", answers.display()))?;

    let applied = session.restore_snapshot(&snapshot);
    eprintln!("Applied {} of {} saved entries", applied, snapshot.len());
    Ok(session)
}

fn check(input: &Path, answers: &Path, subsection: Option<&str>, json: bool) -> Result<()> {
    let mut session = load_session(input, answers)?;

    let keys: Vec<SubsectionKey> = session
        .worksheet()
        .subsections()
        .into_iter()
        .filter(|key| subsection.map_or(true, |name| key.to_string() == name))
        .collect();
    if keys.is_empty() {
        anyhow::bail!("No subsection matches '{}'", subsection.unwrap_or_default());
    }

    for key in &keys {
        let ticket = session.check_subsection(key)?;
        session.finish_check(ticket);
    }

    if json {
        print_verdicts_json(&session, &keys)?;
    } else {
        print_verdicts(&session, &keys);
    }
    Ok(())
}

fn print_verdicts(session: &Session, keys: &[SubsectionKey]) {
    let mut correct = 0;
    let mut close = 0;
    let mut incorrect = 0;

    for key in keys {
        println!("{}", key);
        for row in session.worksheet().rows_in_subsection(key) {
            for (slot, cell) in row.trial_cells() {
                if let Some(verdict) = cell.verdict {
                    match verdict {
                        Verdict::Correct => correct += 1,
                        Verdict::Close => close += 1,
                        Verdict::Incorrect => incorrect += 1,
                    }
                    println!("  {} {} ({})", verdict.glyph(), row.label, slot);
                }
            }
        }
    }

    println!();
    println!(
        "Graded {}: {} correct, {} close, {} incorrect",
        correct + close + incorrect,
        correct,
        close,
        incorrect
    );
}

fn print_verdicts_json(session: &Session, keys: &[SubsectionKey]) -> Result<()> {
    let mut findings = Vec::new();
    for key in keys {
        for row in session.worksheet().rows_in_subsection(key) {
            for (slot, cell) in row.trial_cells() {
                if let Some(verdict) = cell.verdict {
                    findings.push(serde_json::json!({
                        "section": key.section,
                        "subsection": key.subsection,
                        "row": row.id.0,
                        "label": row.label,
                        "trial": slot.to_string(),
                        "verdict": verdict.to_string(),
                    }));
                }
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&findings)?);
    Ok(())
}

fn report(
    input: &Path,
    answers: &Path,
    student: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let mut session = load_session(input, answers)?;

    // Grade everything so the report carries verdicts
    for key in session.worksheet().subsections() {
        let ticket = session.check_subsection(&key)?;
        session.finish_check(ticket);
    }

    let mut report = Report::build(session.worksheet());
    if let Some(name) = student {
        report = report.with_student(name);
    }
    let text = report.render(78, 52);

    match output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote report to '{}'", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
