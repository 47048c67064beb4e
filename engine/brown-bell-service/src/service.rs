//! One automation run: fetch league state, run the warranted ledger
//! passes, resolve scores, write the snapshot.
//!
//! Failure handling is tiered. The core platform fetches are fatal and
//! abort before anything is written. Weekly score fetches and the schedule
//! scrape degrade with a warning, since the engine can still make sound
//! decisions without them.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use award_engine::{
    resolve_player, AvailabilityClassifier, AwardType, GlobalSearch, LeagueView, LedgerManager,
    PlatformPlayer, Position, ScoreBook, ScoreReport, ScoreResolver, SeasonConfig,
    SubstituteSelector, SubstitutionLedger, TeamRoster,
};
use chrono::Utc;
use persistence::{
    AutomationStats, AwardSnapshot, SnapshotPlayer, SnapshotStore, SnapshotTeam, SNAPSHOT_VERSION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schedule_scraper::ScheduleScraper;
use sleeper_client::{current_week, SleeperClient, SleeperPlayer, SleeperRoster, SleeperUser};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::checkpoint::{CheckpointFlags, CheckpointTrigger};
use crate::config::ServiceConfig;
use crate::schedule::LiveSchedule;

pub async fn run_automation(config: ServiceConfig) -> Result<()> {
    let season =
        SeasonConfig::load(&config.season_file).context("failed to load season configuration")?;

    let store = SnapshotStore::new(&config.data_file);
    let _lock = store.lock().context("another run holds the snapshot lock")?;
    let previous = store.load();

    let sleeper = SleeperClient::with_timeout(&config.api_base_url, config.http_timeout())?;
    let (league, rosters, users, players) = tokio::try_join!(
        sleeper.get_league(&config.league_id),
        sleeper.get_rosters(&config.league_id),
        sleeper.get_users(&config.league_id),
        sleeper.get_players(),
    )
    .context("platform fetch failed, keeping the previous snapshot")?;

    let now = Utc::now();
    let week = current_week(Some(&league), season.season_start, now);

    let mut checkpoint = CheckpointTrigger::decide(now, &CheckpointFlags::from_env());
    if checkpoint == CheckpointTrigger::International && season.international_teams(week).is_empty()
    {
        info!(week, "no international games this week, downgrading to routine");
        checkpoint = CheckpointTrigger::Routine;
    }
    info!(
        week,
        checkpoint = checkpoint.persisted_label(),
        league = %league.name,
        "starting automation run"
    );

    let mut scores = ScoreBook::new();
    for fetch_week in 1..=week {
        match sleeper.get_week_scores(&config.league_id, fetch_week).await {
            Ok(map) => scores.insert_week(fetch_week, map),
            Err(err) => {
                warn!(week = fetch_week, error = %err, "weekly scores unavailable, using empty map");
                scores.insert_week(fetch_week, BTreeMap::new());
            }
        }
    }

    let scraped = fetch_schedule(&config, &season, week).await;
    let schedule = LiveSchedule::new(
        season.bye_weeks.clone(),
        scraped,
        week,
        season.season_start,
        now,
    );

    let league_view = build_league_view(&rosters, &users, &players, scores);

    let mut ledger = SubstitutionLedger::new(
        previous
            .as_ref()
            .map(|snapshot| snapshot.substitutions.clone())
            .unwrap_or_default(),
    );
    for manual in &season.manual_substitutions {
        ledger.merge_manual(manual.clone());
    }

    let classifier = AvailabilityClassifier::new(&league_view, &schedule);
    let selector = SubstituteSelector::new(&season, &league_view, &classifier);
    let manager = LedgerManager::new(
        &season,
        &league_view,
        &classifier,
        &selector,
        week,
        checkpoint.reason_label(),
    );
    let mut rng = StdRng::from_entropy();
    let stats = manager.run(&mut ledger, checkpoint.passes(), &mut rng);

    let prior_scores = previous.as_ref().map(previous_report);
    let resolver = ScoreResolver::new(&season, &league_view, &schedule, &ledger, week);
    let mut report = resolver.resolve(prior_scores.as_ref());

    let automation_stats = AutomationStats {
        scores_updated: report.values().map(|table| table.len()).sum(),
        new_substitutions: stats.records_created() + stats.sentinels,
        total_substitutions: ledger.len(),
        cleaned_substitutions: stats.cleaned,
    };

    let snapshot = AwardSnapshot {
        version: SNAPSHOT_VERSION.to_string(),
        generated_at: now,
        run_id: Uuid::new_v4(),
        current_week: week,
        current_award: "main".to_string(),
        teams: team_entries(&season, &league_view, AwardType::Main),
        next_up_teams: team_entries(&season, &league_view, AwardType::NextUp),
        scores: report.remove(&AwardType::Main).unwrap_or_default(),
        next_up_scores: report.remove(&AwardType::NextUp).unwrap_or_default(),
        substitutions: ledger.into_records(),
        sleeper_league_id: config.league_id.clone(),
        last_checkpoint_type: checkpoint.persisted_label().to_string(),
        inactive_teams: season.inactive_teams.clone(),
        manager_changes: season.manager_changes.clone(),
        automation_stats,
    };
    store.save(&snapshot).context("failed to write the snapshot")?;

    info!(
        scores_updated = automation_stats.scores_updated,
        new_substitutions = automation_stats.new_substitutions,
        cleaned = automation_stats.cleaned_substitutions,
        total = automation_stats.total_substitutions,
        "automation run complete"
    );
    Ok(())
}

async fn fetch_schedule(
    config: &ServiceConfig,
    season: &SeasonConfig,
    week: u16,
) -> Option<schedule_scraper::WeekSchedule> {
    let scraper = match ScheduleScraper::with_timeout(
        &config.schedule_base_url,
        &season.season,
        config.http_timeout(),
    ) {
        Ok(scraper) => scraper,
        Err(err) => {
            warn!(error = %err, "schedule scraper unavailable, relying on fallback clock");
            return None;
        }
    };
    match scraper.fetch_week(week).await {
        Ok(schedule) => Some(schedule),
        Err(err) => {
            warn!(error = %err, "schedule scrape failed, relying on fallback clock");
            None
        }
    }
}

/// Assemble the immutable league view from the raw platform payloads.
/// Rosters are keyed by owner display name; orphaned rosters are skipped.
fn build_league_view(
    rosters: &[SleeperRoster],
    users: &[SleeperUser],
    players: &BTreeMap<String, SleeperPlayer>,
    scores: ScoreBook,
) -> LeagueView {
    let user_names: BTreeMap<&str, String> = users
        .iter()
        .map(|user| {
            let name = user
                .display_name
                .clone()
                .or_else(|| user.username.clone())
                .unwrap_or_else(|| user.user_id.clone());
            (user.user_id.as_str(), name)
        })
        .collect();

    let mut view = LeagueView::default();
    for roster in rosters {
        let Some(owner_id) = &roster.owner_id else {
            debug!(roster_id = roster.roster_id, "roster has no owner, skipping");
            continue;
        };
        let Some(team) = user_names.get(owner_id.as_str()) else {
            warn!(roster_id = roster.roster_id, "roster owner missing from user list, skipping");
            continue;
        };
        view.rosters.insert(
            team.clone(),
            TeamRoster {
                roster_id: roster.roster_id,
                players: roster.players.clone().unwrap_or_default(),
            },
        );
    }

    for (id, player) in players {
        view.players.insert(id.clone(), platform_player(id, player));
    }
    view.scores = scores;
    view
}

fn platform_player(id: &str, raw: &SleeperPlayer) -> PlatformPlayer {
    PlatformPlayer {
        id: id.to_string(),
        first_name: raw.first_name.clone().unwrap_or_default(),
        last_name: raw.last_name.clone().unwrap_or_default(),
        position: raw.position.as_deref().and_then(Position::parse),
        team: raw.team.clone(),
        years_exp: raw.years_exp,
        injury_status: raw.injury_status.clone(),
    }
}

/// Both award tables from the previous snapshot, for inactive-team replay.
fn previous_report(snapshot: &AwardSnapshot) -> ScoreReport {
    ScoreReport::from([
        (AwardType::Main, snapshot.scores.clone()),
        (AwardType::NextUp, snapshot.next_up_scores.clone()),
    ])
}

/// The duo list for one award as the snapshot publishes it, with platform
/// ids resolved against each team's current roster.
fn team_entries(
    season: &SeasonConfig,
    league: &LeagueView,
    award: AwardType,
) -> Vec<SnapshotTeam> {
    let Some(duos) = season.duos_for(award) else {
        return Vec::new();
    };
    duos.iter()
        .map(|(team, duo)| {
            let roster = league.roster(team);
            let players = duo
                .iter()
                .map(|tracked| SnapshotPlayer {
                    player: tracked.clone(),
                    sleeper_id: roster.and_then(|r| {
                        resolve_player(tracked, &r.players, &league.players, GlobalSearch::RosterOnly)
                    }),
                })
                .collect();
            let name = match award {
                AwardType::Main => team.clone(),
                AwardType::NextUp => format!("{team} (Next Up)"),
            };
            SnapshotTeam {
                name,
                main_team_name: (award == AwardType::NextUp).then(|| team.clone()),
                players,
                sleeper_roster_id: roster.map(|r| r.roster_id),
            }
        })
        .collect()
}
