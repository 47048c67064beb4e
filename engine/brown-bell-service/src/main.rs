//! Brown Bell automation entry point.
//!
//! Each invocation is one complete run: fetch, decide, resolve, persist.
//! Scheduling lives outside the binary, in whatever cron or CI trigger
//! invokes it.

use anyhow::Result;
use tracing::{error, info};

use brown_bell_service::{initialize_logging, load_configuration, run_automation};

#[tokio::main]
async fn main() -> Result<()> {
    initialize_logging()?;

    info!("Starting Brown Bell automation v{}", env!("CARGO_PKG_VERSION"));

    let config = load_configuration()?;

    if let Err(err) = run_automation(config).await {
        error!(error = %format!("{err:#}"), "automation run failed");
        std::process::exit(1);
    }

    Ok(())
}
