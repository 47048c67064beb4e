//! Brown Bell Snapshot Inspector
//!
//! Read-only view over the persisted snapshot for human review:
//! - summary: run bookkeeping and table sizes
//! - ledger: substitution history with team/week/sentinel filters

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process;

use award_engine::SubstitutionRecord;
use persistence::AwardSnapshot;

#[derive(Parser)]
#[command(name = "snapshot-inspect")]
#[command(about = "Inspect a Brown Bell snapshot - run summary and substitution ledger")]
#[command(version = "0.1.0")]
struct Cli {
    /// Snapshot file to read
    #[arg(short, long, default_value = "brown-bell-data.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run bookkeeping and per-award table sizes
    Summary,

    /// Substitution history, newest first
    Ledger {
        /// Only records for this fantasy team
        #[arg(short, long)]
        team: Option<String>,

        /// Only records covering this week
        #[arg(short, long)]
        week: Option<u16>,

        /// Only no-substitute sentinel records
        #[arg(long)]
        sentinels_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let snapshot = match load_snapshot(&cli.file) {
        Ok(snapshot) => snapshot,
        Err(message) => {
            eprintln!("{} {message}", "error:".red().bold());
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Summary => print_summary(&snapshot),
        Commands::Ledger { team, week, sentinels_only } => {
            print_ledger(&snapshot, team.as_deref(), week, sentinels_only)
        }
    }
}

fn load_snapshot(path: &Path) -> Result<AwardSnapshot, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("{} is not a snapshot: {err}", path.display()))
}

fn print_summary(snapshot: &AwardSnapshot) {
    println!("{}", "🏈 Brown Bell Snapshot".cyan().bold());
    println!("=======================");
    println!("Version:         {}", snapshot.version);
    println!(
        "Generated:       {} (run {})",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        snapshot.run_id
    );
    println!("Current week:    {}", snapshot.current_week);
    println!("Checkpoint:      {}", snapshot.last_checkpoint_type);
    println!("League:          {}", snapshot.sleeper_league_id);
    println!();
    println!(
        "Main award:      {} teams, {} score tables",
        snapshot.teams.len(),
        snapshot.scores.len()
    );
    println!(
        "Next Up award:   {} teams, {} score tables",
        snapshot.next_up_teams.len(),
        snapshot.next_up_scores.len()
    );

    let sentinels = snapshot.substitutions.iter().filter(|r| r.is_sentinel()).count();
    let active = snapshot.substitutions.iter().filter(|r| r.active).count();
    println!(
        "Ledger:          {} records ({} active, {} sentinels)",
        snapshot.substitutions.len(),
        active,
        sentinels
    );
    println!();

    let stats = &snapshot.automation_stats;
    println!("{}", "Last run".bold());
    println!("  📊 {} team score tables updated", stats.scores_updated);
    println!("  🔄 {} new substitutions", stats.new_substitutions);
    println!("  🧹 {} records cleaned", stats.cleaned_substitutions);

    if !snapshot.inactive_teams.is_empty() {
        println!();
        println!("{}", "Inactive teams".bold());
        for (team, note) in &snapshot.inactive_teams {
            println!("  {} - {note}", team.yellow());
        }
    }
    if !snapshot.manager_changes.is_empty() {
        println!();
        println!("{}", "Manager changes".bold());
        for (team, note) in &snapshot.manager_changes {
            println!("  {} - {note}", team.yellow());
        }
    }
}

fn print_ledger(
    snapshot: &AwardSnapshot,
    team: Option<&str>,
    week: Option<u16>,
    sentinels_only: bool,
) {
    println!("{}", "📋 Substitution Ledger".cyan().bold());
    println!("=======================");

    let mut shown = 0usize;
    for record in snapshot.substitutions.iter().rev() {
        if !matches(record, team, week, sentinels_only) {
            continue;
        }
        shown += 1;
        print_record(record);
    }

    println!();
    if shown == 0 {
        println!("{}", "No records match the filters".yellow());
    } else {
        println!("{shown} of {} records shown", snapshot.substitutions.len());
    }
}

fn matches(
    record: &SubstitutionRecord,
    team: Option<&str>,
    week: Option<u16>,
    sentinels_only: bool,
) -> bool {
    if let Some(team) = team {
        if record.team_name != team {
            return false;
        }
    }
    if let Some(week) = week {
        if !record.in_effect(week) {
            return false;
        }
    }
    if sentinels_only && !record.is_sentinel() {
        return false;
    }
    true
}

fn print_record(record: &SubstitutionRecord) {
    let weeks = format_weeks(record.start_week, record.end_week);
    let state = if record.active {
        "active".green()
    } else {
        "closed".normal()
    };
    let origin = if record.auto_generated {
        "".normal()
    } else {
        " [manual]".magenta()
    };

    let filling = match (&record.substitute_name, &record.substitute_position) {
        (Some(name), Some(position)) => format!("{name} ({position})").normal(),
        (Some(name), None) => name.clone().normal(),
        _ => "no eligible substitute".red().bold(),
    };

    println!();
    println!(
        "{} {} {} slot {} ({state}{origin})",
        weeks.bold(),
        record.team_name,
        record.award_type,
        record.slot_index
    );
    println!(
        "  {} ({}) -> {filling}",
        record.original_name, record.original_position
    );
    println!("  {}", record.reason.dimmed());
}

fn format_weeks(start: u16, end: Option<u16>) -> String {
    match end {
        Some(end) if end == start => format!("W{start}"),
        Some(end) => format!("W{start}-{end}"),
        None => format!("W{start}+"),
    }
}
