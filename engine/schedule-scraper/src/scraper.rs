//! Schedule page fetching and parsing.
//!
//! Pages are laid out as day sections, each with a date header and game
//! rows naming the two franchises and a local kickoff time. A trailing
//! "Byes:" element lists the franchises idle that week.

use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::teams;
use crate::types::{ScheduledGame, WeekSchedule};

pub const DEFAULT_BASE_URL: &str = "https://www.nfl.com/schedules";

pub struct ScheduleScraper {
    client: Client,
    base_url: String,
    season: String,
    season_year: i32,
}

impl ScheduleScraper {
    pub fn new(base_url: impl Into<String>, season: &str) -> Result<Self, ScheduleError> {
        Self::with_timeout(base_url, season, StdDuration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        season: &str,
        timeout: StdDuration,
    ) -> Result<Self, ScheduleError> {
        let season = season.trim();
        let season_year: i32 = season
            .parse()
            .map_err(|_| ScheduleError::Parse(format!("season {season} is not a year")))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
            .build()?;
        Ok(ScheduleScraper {
            client,
            base_url: base_url.into(),
            season: season.to_string(),
            season_year,
        })
    }

    /// Fetch and parse one week's schedule page.
    pub async fn fetch_week(&self, week: u16) -> Result<WeekSchedule, ScheduleError> {
        let url = format!("{}/{}/REG{}", self.base_url, self.season, week);
        debug!(%url, "fetching schedule page");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::Status { url, status });
        }
        let html = response.text().await?;
        let schedule = parse_week(&html, week, self.season_year)?;
        info!(week, teams = schedule.games.len(), "parsed schedule page");
        Ok(schedule)
    }
}

/// Parse a schedule page. Malformed rows are skipped; a page yielding no
/// franchises at all is an error the caller degrades on.
pub fn parse_week(html: &str, week: u16, season_year: i32) -> Result<WeekSchedule, ScheduleError> {
    let document = Html::parse_document(html);
    let day_selector = parse_selector("section.schedule-day")?;
    let date_selector = parse_selector("h2.schedule-day__date")?;
    let row_selector = parse_selector("div.game-strip")?;
    let team_selector = parse_selector("span.team-name")?;
    let time_selector = parse_selector("span.game-time")?;
    let byes_selector = parse_selector("div.schedule-byes")?;

    let mut schedule = WeekSchedule {
        week,
        games: BTreeMap::new(),
    };

    for day in document.select(&day_selector) {
        let Some(date) = day
            .select(&date_selector)
            .next()
            .and_then(|header| parse_day_header(&text_of(&header), season_year))
        else {
            warn!(week, "day section without a parseable date header");
            continue;
        };
        for row in day.select(&row_selector) {
            let Some((away, home, kickoff)) =
                parse_game_row(&row, &team_selector, &time_selector, date)
            else {
                warn!(week, date = %date, "skipping malformed game row");
                continue;
            };
            schedule.games.insert(
                away.clone(),
                ScheduledGame {
                    opponent: Some(home.clone()),
                    kickoff_utc: Some(kickoff),
                },
            );
            schedule.games.insert(
                home,
                ScheduledGame {
                    opponent: Some(away),
                    kickoff_utc: Some(kickoff),
                },
            );
        }
    }

    for byes in document.select(&byes_selector) {
        for team in parse_bye_list(&text_of(&byes)) {
            schedule.games.insert(
                team,
                ScheduledGame {
                    opponent: None,
                    kickoff_utc: None,
                },
            );
        }
    }

    if schedule.games.is_empty() {
        return Err(ScheduleError::Parse(format!(
            "week {week} page had no recognizable games"
        )));
    }
    Ok(schedule)
}

fn parse_selector(css: &str) -> Result<Selector, ScheduleError> {
    Selector::parse(css).map_err(|err| ScheduleError::Parse(format!("selector {css}: {err}")))
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// "Thursday, September 4" plus the season year. January dates belong to
/// the season's closing weeks and roll into the next calendar year.
fn parse_day_header(text: &str, season_year: i32) -> Option<NaiveDate> {
    let (_, rest) = text.trim().split_once(", ")?;
    let date =
        NaiveDate::parse_from_str(&format!("{} {}", rest.trim(), season_year), "%B %d %Y").ok()?;
    if date.month() < 3 {
        date.with_year(season_year + 1)
    } else {
        Some(date)
    }
}

fn parse_game_row(
    row: &ElementRef,
    team_selector: &Selector,
    time_selector: &Selector,
    date: NaiveDate,
) -> Option<(String, String, DateTime<Utc>)> {
    let mut names = row.select(team_selector);
    let away = teams::abbreviation(&text_of(&names.next()?))?;
    let home = teams::abbreviation(&text_of(&names.next()?))?;
    let time_text = text_of(&row.select(time_selector).next()?);
    let kickoff = kickoff_to_utc(date, &time_text)?;
    Some((away.to_string(), home.to_string(), kickoff))
}

/// "8:20 PM ET" on a given date, converted to UTC.
fn kickoff_to_utc(date: NaiveDate, text: &str) -> Option<DateTime<Utc>> {
    let (clock, zone) = text.trim().rsplit_once(' ')?;
    let offset = zone_offset_hours(zone)?;
    let time = NaiveTime::parse_from_str(clock.trim(), "%l:%M %p").ok()?;
    let local = date.and_time(time);
    Some(Utc.from_utc_datetime(&(local - Duration::hours(offset))))
}

/// Offsets from UTC for the zone abbreviations schedule pages print. Bare
/// ET/CT/MT/PT map to their daylight offsets, which hold for nearly all of
/// the season and only ever err on the early side.
fn zone_offset_hours(zone: &str) -> Option<i64> {
    match zone.trim().to_ascii_uppercase().as_str() {
        "ET" | "EDT" => Some(-4),
        "EST" => Some(-5),
        "CT" | "CDT" => Some(-5),
        "CST" => Some(-6),
        "MT" | "MDT" => Some(-6),
        "MST" => Some(-7),
        "PT" | "PDT" => Some(-7),
        "PST" => Some(-8),
        "GMT" | "UTC" => Some(0),
        "BST" => Some(1),
        "CET" => Some(1),
        "CEST" => Some(2),
        _ => None,
    }
}

fn parse_bye_list(text: &str) -> Vec<String> {
    let Some((_, list)) = text.split_once(':') else {
        return Vec::new();
    };
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match teams::abbreviation(name) {
            Some(abbr) => Some(abbr.to_string()),
            None => {
                warn!(name, "unrecognized franchise in bye list");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_PAGE: &str = r#"
        <html><body>
        <section class="schedule-day">
          <h2 class="schedule-day__date">Thursday, September 4</h2>
          <div class="game-strip">
            <span class="team-name">Dallas Cowboys</span>
            <span class="team-name">Philadelphia Eagles</span>
            <span class="game-time">8:20 PM ET</span>
          </div>
        </section>
        <section class="schedule-day">
          <h2 class="schedule-day__date">Sunday, September 7</h2>
          <div class="game-strip">
            <span class="team-name">Minnesota Vikings</span>
            <span class="team-name">Pittsburgh Steelers</span>
            <span class="game-time">9:30 AM GMT</span>
          </div>
          <div class="game-strip">
            <span class="team-name">Buffalo Bills</span>
            <span class="team-name">New York Jets</span>
            <span class="game-time">1:00 PM ET</span>
          </div>
        </section>
        <div class="schedule-byes">Byes: Kansas City Chiefs, Chicago Bears</div>
        </body></html>
    "#;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn parses_games_and_byes() {
        let schedule = parse_week(WEEK_PAGE, 1, 2025).unwrap();
        assert_eq!(schedule.week, 1);
        assert_eq!(schedule.games.len(), 8);

        let dal = &schedule.games["DAL"];
        assert_eq!(dal.opponent.as_deref(), Some("PHI"));
        assert_eq!(dal.kickoff_utc, Some(utc("2025-09-05T00:20:00Z")));

        let min = &schedule.games["MIN"];
        assert_eq!(min.kickoff_utc, Some(utc("2025-09-07T09:30:00Z")));

        let buf = &schedule.games["BUF"];
        assert_eq!(buf.kickoff_utc, Some(utc("2025-09-07T17:00:00Z")));

        assert!(schedule.is_bye("KC"));
        assert!(schedule.is_bye("CHI"));
        assert!(!schedule.game_started("KC", utc("2025-12-01T00:00:00Z")));
        assert!(schedule.game_started("DAL", utc("2025-09-05T00:20:00Z")));
        assert!(!schedule.game_started("BUF", utc("2025-09-07T16:59:00Z")));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let page = r#"
            <section class="schedule-day">
              <h2 class="schedule-day__date">Sunday, October 5</h2>
              <div class="game-strip">
                <span class="team-name">Detroit Lions</span>
                <span class="game-time">1:00 PM ET</span>
              </div>
              <div class="game-strip">
                <span class="team-name">Green Bay Packers</span>
                <span class="team-name">Denver Broncos</span>
                <span class="game-time">4:25 PM PT</span>
              </div>
            </section>
        "#;
        let schedule = parse_week(page, 5, 2025).unwrap();
        assert_eq!(schedule.games.len(), 2);
        assert!(schedule.games.contains_key("GB"));
        assert!(schedule.games.contains_key("DEN"));
        assert_eq!(
            schedule.games["GB"].kickoff_utc,
            Some(utc("2025-10-05T23:25:00Z"))
        );
    }

    #[test]
    fn empty_page_is_an_error() {
        assert!(matches!(
            parse_week("<html><body></body></html>", 3, 2025),
            Err(ScheduleError::Parse(_))
        ));
    }

    #[test]
    fn january_dates_roll_into_the_next_year() {
        let page = r#"
            <section class="schedule-day">
              <h2 class="schedule-day__date">Sunday, January 4</h2>
              <div class="game-strip">
                <span class="team-name">Buffalo Bills</span>
                <span class="team-name">Miami Dolphins</span>
                <span class="game-time">1:00 PM ET</span>
              </div>
            </section>
        "#;
        let schedule = parse_week(page, 18, 2025).unwrap();
        assert_eq!(
            schedule.games["BUF"].kickoff_utc,
            Some(utc("2026-01-04T18:00:00Z"))
        );
    }

    #[test]
    fn unknown_time_zones_invalidate_the_row() {
        assert_eq!(kickoff_to_utc(NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(), "1:00 PM XYZ"), None);
        assert_eq!(
            kickoff_to_utc(NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(), "4:05 PM CT"),
            Some(utc("2025-09-07T21:05:00Z"))
        );
    }
}
