//! Real browser run against a freshly launched notebook server
//!
//! Requires `jupyter` in PATH and a WebDriver listening at NBSORT_WEBDRIVER_URL
//! (default http://localhost:9515, e.g. `chromedriver --port=9515`).
//!
//! Run with: cargo test --test browser_e2e_tests -- --ignored

use nbsort::config::HarnessConfig;
use nbsort::driver::WebDriverClient;
use nbsort::page;
use nbsort::scenario::{builtin_scenarios, Harness};
use nbsort::server::launcher::{LaunchOptions, NotebookLauncher};
use std::time::Duration;

fn start() -> Option<(HarnessConfig, NotebookLauncher, WebDriverClient)> {
    let mut config = HarnessConfig::default();
    config.apply_env().ok()?;

    if which::which("jupyter").is_err() {
        eprintln!("skipping: jupyter not installed");
        return None;
    }
    let launcher = NotebookLauncher::start(&LaunchOptions {
        startup: config.startup_wait(),
        ..LaunchOptions::default()
    })
    .ok()?;

    let browser = match WebDriverClient::connect(
        &config.webdriver_url,
        &config.session_options(),
        Duration::from_secs(30),
    ) {
        Ok(browser) => browser,
        Err(e) => {
            eprintln!("skipping: {}", e.plain_message());
            return None;
        }
    };
    Some((config, launcher, browser))
}

#[test]
#[ignore]
fn test_builtin_suite_against_real_notebook() {
    let Some((config, launcher, browser)) = start() else {
        return;
    };

    let scenarios = builtin_scenarios();
    let report =
        Harness::new(&browser, launcher.info(), config.wait_config()).run_suite(&scenarios);

    for outcome in &report.outcomes {
        assert!(outcome.passed, "{}: {:?}", outcome.name, outcome.error);
    }
}

#[test]
#[ignore]
fn test_tree_view_exposes_three_sort_buttons() {
    let Some((config, launcher, browser)) = start() else {
        return;
    };

    page::open_tree(&browser, launcher.info()).unwrap();
    let items = page::get_list_items(&browser, launcher.info(), &config.wait_config()).unwrap();
    assert!(items.iter().any(|i| i.label == "My Notebook 10.ipynb"));

    let buttons = page::get_sort_buttons(&browser).unwrap();
    assert_eq!(buttons.len(), 3);
}
