use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nbsort=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nbsort=warn,error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log WebDriver round trips
pub fn log_webdriver_command(command: &str, succeeded: bool, duration_ms: u64) {
    if succeeded {
        tracing::debug!(
            command = command,
            duration_ms = duration_ms,
            "WebDriver command completed"
        );
    } else {
        tracing::warn!(
            command = command,
            duration_ms = duration_ms,
            "WebDriver command failed"
        );
    }
}

/// Log a click on a sort control
pub fn log_sort_click(scenario: &str, control: usize) {
    tracing::info!(scenario = scenario, control = control, "Clicked sort control");
}

/// Log the order read back from the page
pub fn log_observed_order(scenario: &str, observed: &[String]) {
    tracing::debug!(scenario = scenario, observed = ?observed, "Observed listing order");
}

/// Log notebook server lifecycle events
pub fn log_server_event(url: &str, event: &str) {
    tracing::info!(url = url, event = event, "Notebook server");
}

/// Log scenario outcomes
pub fn log_scenario_outcome(scenario: &str, passed: bool, duration_ms: u64) {
    if passed {
        tracing::info!(
            scenario = scenario,
            duration_ms = duration_ms,
            "Scenario passed"
        );
    } else {
        tracing::error!(
            scenario = scenario,
            duration_ms = duration_ms,
            "Scenario failed"
        );
    }
}
