//! # Brown Bell Automation Service
//!
//! Library surface of the automation binary: configuration, checkpoint
//! scheduling, the live schedule adapter, and the run pipeline that ties
//! the fetchers, the award engine, and the snapshot store together.

use anyhow::{Context, Result};

pub mod checkpoint;
pub mod config;
pub mod logging;
pub mod schedule;
pub mod service;

pub use checkpoint::{CheckpointFlags, CheckpointTrigger};
pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use schedule::LiveSchedule;
pub use service::run_automation;

/// Load configuration from environment variables over the defaults
pub fn load_configuration() -> Result<ServiceConfig> {
    config::load_config().context("failed to load service configuration")
}
