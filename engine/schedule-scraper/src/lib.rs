//! # Schedule Scraper
//!
//! Scrapes weekly NFL schedule pages into per-franchise kickoff times and
//! bye lists. The award engine uses the result to decide whether a game
//! has started and whether a franchise is idle for the week.

pub mod error;
pub mod scraper;
pub mod teams;
pub mod types;

pub use error::ScheduleError;
pub use scraper::{parse_week, ScheduleScraper, DEFAULT_BASE_URL};
pub use teams::abbreviation;
pub use types::{week_concluded_fallback, ScheduledGame, WeekSchedule};
