//! Matchboard CLI
//!
//! Inspect solver snapshots, replay modification journals and report slot
//! conflicts from the terminal:
//!
//! ```text
//! matchboard inspect solution.json
//! matchboard conflicts solution.json --journal journal.json
//! matchboard export solution.json --journal journal.json -o edits.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use thiserror::Error;

use matchboard::prelude::*;
use matchboard::{FileJournalStore, SnapshotError};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "matchboard", version, about = "Inspect match timetables and their edit journals")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides the default filter).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize a snapshot document.
    Inspect { snapshot: PathBuf },

    /// Report slot conflicts, optionally with a journal replayed on top.
    Conflicts {
        snapshot: PathBuf,

        /// Persisted journal document to replay.
        #[arg(long)]
        journal: Option<PathBuf>,

        /// Override the institution-overlap threshold.
        #[arg(long)]
        threshold: Option<usize>,
    },

    /// Write the journal's export document to a file or stdout.
    Export {
        snapshot: PathBuf,

        /// Persisted journal document to export.
        #[arg(long)]
        journal: PathBuf,

        /// Output path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("matchboard_engine=debug,matchboard_core=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Inspect { snapshot } => {
            let snapshot = ScheduleSnapshot::from_json_file(snapshot)?;
            print_summary(&snapshot);
            Ok(ExitCode::SUCCESS)
        }
        Command::Conflicts {
            snapshot,
            journal,
            threshold,
        } => {
            let session = open_session(&snapshot, journal.as_ref(), threshold)?;
            let has_critical = print_conflicts(&session);
            Ok(if has_critical {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Export {
            snapshot,
            journal,
            output,
        } => {
            let session = open_session(&snapshot, Some(&journal), None)?;
            let json = session.export().to_json_string()?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_session(
    snapshot: &PathBuf,
    journal: Option<&PathBuf>,
    threshold: Option<usize>,
) -> Result<EditSession, CliError> {
    let base = ScheduleSnapshot::from_json_file(snapshot)?;
    let mut config = EngineConfig::default();
    if let Some(threshold) = threshold {
        config.institution_overlap_threshold = threshold;
    }
    Ok(match journal {
        Some(path) => {
            config.journal_path = Some(path.clone());
            EditSession::with_store(base, config, Box::new(FileJournalStore::new(path)))
        }
        None => EditSession::new(base, config),
    })
}

fn print_summary(snapshot: &ScheduleSnapshot) {
    let assigned = snapshot.matches.iter().filter(|m| m.is_assigned()).count();
    let unassigned = snapshot.matches.len() - assigned;

    println!("{}", "Snapshot".bold().underline());
    println!("  version:    {}", snapshot.version);
    println!(
        "  solution:   {}",
        snapshot.solution_id().unwrap_or("(none)")
    );
    println!("  teams:      {}", snapshot.teams.len());
    println!("  venues:     {}", snapshot.venues.len());
    println!("  pools:      {}", snapshot.pools.len());
    println!(
        "  matches:    {} ({} scheduled, {} unscheduled)",
        snapshot.matches.len(),
        assigned.green(),
        unassigned.yellow()
    );
}

fn print_conflicts(session: &EditSession) -> bool {
    let summary = session.conflict_summary();
    if summary.is_empty() {
        println!("{} no conflicts", "ok".green().bold());
        return false;
    }

    let mut has_critical = false;
    for (slot, report) in &summary {
        let severity = match report.severity {
            ConflictSeverity::Critical => {
                has_critical = true;
                "critical".red().bold().to_string()
            }
            ConflictSeverity::Warning => "warning".yellow().bold().to_string(),
            ConflictSeverity::None => continue,
        };
        println!("{severity} {slot}");
        for detail in &report.details {
            println!("    {detail}");
        }
        for note in session.projected().preference_notes_for_slot(slot) {
            println!("    {} {note}", "note:".dimmed());
        }
    }
    println!(
        "{} conflicted slot(s), {} modification(s) applied",
        summary.len(),
        session.modification_count()
    );
    has_critical
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchboard::{JournalDocument, JournalStore, MemoryJournalStore};

    const SNAPSHOT: &str = r#"{
        "version": "1.0",
        "metadata": { "solution_id": "sol-1" },
        "entities": {
            "equipes": [
                { "equipe_id": "t1", "nom": "Lions", "institution": "North" },
                { "equipe_id": "t2", "nom": "Bears", "institution": "South" },
                { "equipe_id": "t3", "nom": "Hawks", "institution": "East" },
                { "equipe_id": "t4", "nom": "Wolves", "institution": "West" }
            ],
            "gymnases": [ { "gymnase_id": "g1", "nom": "North Gym", "capacite": 1 } ],
            "poules": []
        },
        "matches": {
            "scheduled": [
                { "match_id": "m1", "equipe1_id": "t1", "equipe2_id": "t2",
                  "semaine": 1, "horaire": "18:00", "gymnase": "g1" },
                { "match_id": "m2", "equipe1_id": "t3", "equipe2_id": "t4",
                  "semaine": 1, "horaire": "18:00", "gymnase": "g1" }
            ],
            "unscheduled": []
        }
    }"#;

    fn snapshot_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        path
    }

    #[test]
    fn conflicts_on_over_capacity_snapshot_fail() {
        let dir = tempfile::tempdir().unwrap();
        let session = open_session(&snapshot_file(&dir), None, None).unwrap();
        assert!(print_conflicts(&session));
    }

    #[test]
    fn session_replays_journal_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_file(&dir);

        // Persist a journal that moves m2 out of the conflicted slot.
        let base = ScheduleSnapshot::from_json_file(&snapshot).unwrap();
        let mut session = EditSession::new(base, EngineConfig::default());
        assert!(session
            .move_match(&MatchId::new("m2"), SlotKey::new(2, "18:00", "g1"))
            .is_committed());
        let doc = JournalDocument::from_journal(session.journal(), Some("sol-1"));

        let journal_path = dir.path().join("journal.json");
        let mut store = FileJournalStore::new(&journal_path);
        store.save(&doc).unwrap();

        let replayed = open_session(&snapshot, Some(&journal_path), None).unwrap();
        assert_eq!(replayed.modification_count(), 1);
        assert!(!print_conflicts(&replayed));
    }

    #[test]
    fn export_round_trips_through_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_file(&dir);

        let base = ScheduleSnapshot::from_json_file(&snapshot).unwrap();
        let mut session = EditSession::new(base, EngineConfig::default());
        session.move_match(&MatchId::new("m2"), SlotKey::new(2, "18:00", "g1"));

        let json = session.export().to_json_string().unwrap();
        let parsed = matchboard::ExportDocument::from_json_str(&json).unwrap();
        assert_eq!(parsed.statistics.total_modifications, 1);
    }

    #[test]
    fn memory_store_keeps_cli_tests_hermetic() {
        let base = ScheduleSnapshot::from_json_str(SNAPSHOT).unwrap();
        let mut session = EditSession::with_store(
            base,
            EngineConfig::default(),
            Box::new(MemoryJournalStore::new()),
        );
        session.move_match(&MatchId::new("m2"), SlotKey::new(2, "18:00", "g1"));
        assert_eq!(session.modification_count(), 1);
    }
}
