//! The `run` command: connect everything and play the suite.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::driver::WebDriverClient;
use crate::scenario::{builtin_scenarios, select_scenarios, Harness, SuiteReport};
use crate::server::launcher::{LaunchOptions, NotebookLauncher};

pub struct RunCommand {
    config: HarnessConfig,
    scenarios: Vec<String>,
    notebook_dir: Option<PathBuf>,
    report_path: Option<PathBuf>,
    verbose: bool,
}

impl RunCommand {
    pub fn new(config: HarnessConfig, verbose: bool) -> Self {
        Self {
            config,
            scenarios: Vec::new(),
            notebook_dir: None,
            report_path: None,
            verbose,
        }
    }

    pub fn with_scenarios(mut self, names: Vec<String>) -> Self {
        self.scenarios = names;
        self
    }

    pub fn with_notebook_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.notebook_dir = dir;
        self
    }

    pub fn with_report(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    pub fn execute(&self) -> Result<SuiteReport> {
        self.config.validate()?;
        let scenarios = select_scenarios(builtin_scenarios(), &self.scenarios)?;
        if let (Some(dir), Some(info)) = (&self.notebook_dir, self.config.server_info()) {
            bail!(
                "--notebook-dir {} only applies when nbsort launches the server, \
                 but {} is already configured",
                dir.display(),
                info.url
            );
        }

        // Keep the launcher alive until the suite is done.
        let launcher = match self.config.server_info() {
            Some(_) => None,
            None => Some(self.launch_server()?),
        };
        let server = match (&launcher, self.config.server_info()) {
            (Some(launcher), _) => launcher.info().clone(),
            (None, Some(info)) => info,
            (None, None) => bail!("No notebook server configured"),
        };

        println!(
            "{} Testing file tree sorting at {}",
            "→".green(),
            server.tree_url().cyan()
        );

        let browser = WebDriverClient::connect(
            &self.config.webdriver_url,
            &self.config.session_options(),
            Duration::from_millis(self.config.timeout_ms.max(30_000)),
        )
        .with_context(|| {
            format!("Could not start a browser via {}", self.config.webdriver_url)
        })?;

        let harness = Harness::new(&browser, &server, self.config.wait_config());
        let report = harness.run_suite(&scenarios);

        if let Err(e) = browser.quit() {
            tracing::warn!(error = %e, "Failed to close browser session");
        }
        if let Some(launcher) = launcher {
            if let Err(e) = launcher.stop() {
                tracing::warn!(error = %e, "Failed to stop notebook server");
            }
        }

        report.print_summary();
        if let Some(path) = &self.report_path {
            report.write_json(path)?;
            println!("{} Report written to {}", "→".green(), path.display());
        }

        if !report.passed() {
            bail!("{} sort scenario(s) failed", report.failed_count());
        }
        Ok(report)
    }

    fn launch_server(&self) -> Result<NotebookLauncher> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid spinner template")?,
        );
        spinner.set_message("Starting notebook server...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let options = LaunchOptions {
            notebook_dir: self.notebook_dir.clone(),
            startup: self.config.startup_wait(),
            show_output: self.verbose,
            ..LaunchOptions::default()
        };
        let launched = NotebookLauncher::start(&options);

        match &launched {
            Ok(launcher) => spinner.finish_with_message(format!(
                "Notebook server ready, serving {}",
                launcher.notebook_dir().display()
            )),
            Err(_) => spinner.finish_with_message("Notebook server failed to start"),
        }
        launched
    }
}
