//! Checkpoint scheduling: which kind of run this invocation is.
//!
//! Explicit env flags win so operators can force a pass. Otherwise the
//! run type follows the weekly rhythm the awards operate on: Tuesday and
//! Thursday reviews, early weekend windows for international kickoffs,
//! Sunday morning for the regular slate, and routine score refreshes the
//! rest of the time.

use award_engine::LedgerPasses;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointTrigger {
    /// Operator-forced full substitution run.
    ManualFull,
    /// Early-window check for franchises kicking off overseas.
    International,
    /// Sunday-morning sweep before the main slate locks.
    PreKickoff,
    /// Tuesday/Thursday review of the whole ledger.
    WeeklyReview,
    /// Score refresh only, the ledger is left alone.
    Routine,
}

/// Env flags that force a specific checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckpointFlags {
    pub force_substitutions: bool,
    pub international_check: bool,
    pub pregame_check: bool,
}

impl CheckpointFlags {
    pub fn from_env() -> CheckpointFlags {
        CheckpointFlags {
            force_substitutions: env_flag("FORCE_SUBSTITUTIONS"),
            international_check: env_flag("INTERNATIONAL_CHECK"),
            pregame_check: env_flag("PREGAME_CHECK"),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v.parse().unwrap_or(false)).unwrap_or(false)
}

impl CheckpointTrigger {
    /// Decide the run type for a moment in time. Flags take precedence in
    /// the order forced, international, pre-kickoff.
    pub fn decide(now: DateTime<Utc>, flags: &CheckpointFlags) -> CheckpointTrigger {
        if flags.force_substitutions {
            return CheckpointTrigger::ManualFull;
        }
        if flags.international_check {
            return CheckpointTrigger::International;
        }
        if flags.pregame_check {
            return CheckpointTrigger::PreKickoff;
        }

        match (now.weekday(), now.hour()) {
            (Weekday::Tue, _) | (Weekday::Thu, _) => CheckpointTrigger::WeeklyReview,
            (Weekday::Sat, hour) if hour >= 7 => CheckpointTrigger::International,
            (Weekday::Sun, hour) if (7..11).contains(&hour) => CheckpointTrigger::International,
            (Weekday::Sun, hour) if hour >= 11 => CheckpointTrigger::PreKickoff,
            _ => CheckpointTrigger::Routine,
        }
    }

    /// Ledger passes this run performs. Routine runs touch nothing.
    pub fn passes(&self) -> LedgerPasses {
        match self {
            CheckpointTrigger::Routine => LedgerPasses::none(),
            _ => LedgerPasses::full(),
        }
    }

    /// Prefix for the reason field of records created under this run.
    pub fn reason_label(&self) -> &'static str {
        match self {
            CheckpointTrigger::ManualFull => "Manual Trigger",
            CheckpointTrigger::International => "Injury Checkpoint (1)",
            CheckpointTrigger::PreKickoff => "Injury Checkpoint (2)",
            CheckpointTrigger::WeeklyReview => "Injury Checkpoint (3)",
            CheckpointTrigger::Routine => "Routine Update",
        }
    }

    /// Label written to the snapshot's `lastCheckpointType` field.
    pub fn persisted_label(&self) -> &'static str {
        match self {
            CheckpointTrigger::ManualFull => "MANUAL_TRIGGER",
            CheckpointTrigger::International => "INTERNATIONAL_CHECK",
            CheckpointTrigger::PreKickoff => "PREGAME_CHECK",
            CheckpointTrigger::WeeklyReview => "WEEKLY_REVIEW",
            CheckpointTrigger::Routine => "ROUTINE_UPDATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> DateTime<Utc> {
        text.parse().unwrap()
    }

    #[test]
    fn flags_override_the_clock() {
        // A Monday, which would otherwise be routine.
        let monday = at("2025-09-08T12:00:00Z");
        let forced = CheckpointFlags {
            force_substitutions: true,
            ..CheckpointFlags::default()
        };
        assert_eq!(
            CheckpointTrigger::decide(monday, &forced),
            CheckpointTrigger::ManualFull
        );

        let international = CheckpointFlags {
            international_check: true,
            ..CheckpointFlags::default()
        };
        assert_eq!(
            CheckpointTrigger::decide(monday, &international),
            CheckpointTrigger::International
        );

        let pregame = CheckpointFlags {
            pregame_check: true,
            ..CheckpointFlags::default()
        };
        assert_eq!(
            CheckpointTrigger::decide(monday, &pregame),
            CheckpointTrigger::PreKickoff
        );
    }

    #[test]
    fn weekly_reviews_run_tuesday_and_thursday() {
        let flags = CheckpointFlags::default();
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-09T03:00:00Z"), &flags),
            CheckpointTrigger::WeeklyReview
        );
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-11T22:00:00Z"), &flags),
            CheckpointTrigger::WeeklyReview
        );
    }

    #[test]
    fn weekend_windows_split_by_hour() {
        let flags = CheckpointFlags::default();
        // Saturday before and after the 07:00 gate.
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-13T06:59:00Z"), &flags),
            CheckpointTrigger::Routine
        );
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-13T07:00:00Z"), &flags),
            CheckpointTrigger::International
        );
        // Sunday: international window, then pre-kickoff.
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-14T08:30:00Z"), &flags),
            CheckpointTrigger::International
        );
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-14T11:00:00Z"), &flags),
            CheckpointTrigger::PreKickoff
        );
        assert_eq!(
            CheckpointTrigger::decide(at("2025-09-14T02:00:00Z"), &flags),
            CheckpointTrigger::Routine
        );
    }

    #[test]
    fn routine_runs_no_ledger_passes() {
        assert!(!CheckpointTrigger::Routine.passes().any());
        assert!(CheckpointTrigger::WeeklyReview.passes().any());
        assert_eq!(CheckpointTrigger::Routine.persisted_label(), "ROUTINE_UPDATE");
        assert_eq!(
            CheckpointTrigger::WeeklyReview.reason_label(),
            "Injury Checkpoint (3)"
        );
    }
}
