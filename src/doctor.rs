//! Environment diagnostics.
//!
//! The doctor command checks that everything a sort run needs is in place: a WebDriver
//! executable and endpoint, a way to get a notebook server, and a usable configuration.

use colored::Colorize;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::HarnessError;

/// Diagnostic check result
#[derive(Debug)]
pub struct DiagnosticResult {
    pub category: String,
    pub check: String,
    pub status: DiagnosticStatus,
    pub message: Option<String>,
    pub solution: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum DiagnosticStatus {
    Ok,
    Warning,
    Error,
}

pub struct DoctorCommand {
    config: HarnessConfig,
    verbose: bool,
}

impl DoctorCommand {
    pub fn new(config: HarnessConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub fn execute(&self) -> Result<(), HarnessError> {
        println!("{}", "🏥 nbsort doctor".blue().bold());
        println!();

        let results = self.run_checks();

        let mut has_errors = false;
        let mut has_warnings = false;
        for result in &results {
            let status_symbol = match result.status {
                DiagnosticStatus::Ok => "✓".green(),
                DiagnosticStatus::Warning => "⚠".yellow(),
                DiagnosticStatus::Error => "✗".red(),
            };
            println!(
                "{} {} - {}",
                status_symbol,
                result.category.cyan(),
                result.check
            );
            if let Some(message) = &result.message {
                println!("  {}", message.dimmed());
            }

            match result.status {
                DiagnosticStatus::Ok => continue,
                DiagnosticStatus::Warning => has_warnings = true,
                DiagnosticStatus::Error => has_errors = true,
            }
            if let Some(solution) = &result.solution {
                println!("  {} {}", "→ Solution:".green(), solution);
            }
        }

        println!();
        if has_errors {
            println!("{}", "❌ Critical issues found".red().bold());
            return Err(HarnessError::Other(anyhow::anyhow!(
                "Critical issues found. Please fix them before running the suite."
            )));
        } else if has_warnings {
            println!(
                "{}",
                "⚠️  Some warnings found but sort checks may still run"
                    .yellow()
                    .bold()
            );
        } else {
            println!("{}", "✅ All checks passed!".green().bold());
        }
        Ok(())
    }

    pub fn run_checks(&self) -> Vec<DiagnosticResult> {
        let mut results = Vec::new();
        self.check_config(&mut results);
        self.check_driver_binary(&mut results);
        self.check_webdriver_endpoint(&mut results);
        self.check_notebook_server(&mut results);
        results
    }

    fn check_config(&self, results: &mut Vec<DiagnosticResult>) {
        let (status, message) = match self.config.validate() {
            Ok(()) => (DiagnosticStatus::Ok, None),
            Err(e) => (DiagnosticStatus::Error, Some(e.plain_message())),
        };
        results.push(DiagnosticResult {
            category: "Config".to_string(),
            check: "Configuration is valid".to_string(),
            status,
            message,
            solution: Some("Fix the fields listed above in your config file or NBSORT_* variables".to_string()),
        });
    }

    fn check_driver_binary(&self, results: &mut Vec<DiagnosticResult>) {
        let binary = self.config.browser.driver_binary();
        let result = match which::which(binary) {
            Ok(path) => DiagnosticResult {
                category: "WebDriver".to_string(),
                check: format!("{binary} installed"),
                status: DiagnosticStatus::Ok,
                message: self.verbose.then(|| path.display().to_string()),
                solution: None,
            },
            // A remote endpoint does not need a local binary.
            Err(_) => DiagnosticResult {
                category: "WebDriver".to_string(),
                check: format!("{binary} installed"),
                status: DiagnosticStatus::Warning,
                message: Some(format!("{binary} not found in PATH")),
                solution: Some(format!(
                    "Install {binary} or point --webdriver at a running driver"
                )),
            },
        };
        results.push(result);
    }

    fn check_webdriver_endpoint(&self, results: &mut Vec<DiagnosticResult>) {
        let status_url = format!("{}/status", self.config.webdriver_url.trim_end_matches('/'));
        let reachable = http_client()
            .and_then(|client| client.get(&status_url).send().ok())
            .map(|resp| resp.status().is_success())
            .unwrap_or(false);

        results.push(DiagnosticResult {
            category: "WebDriver".to_string(),
            check: format!("Endpoint {} reachable", self.config.webdriver_url),
            status: if reachable {
                DiagnosticStatus::Ok
            } else {
                DiagnosticStatus::Error
            },
            message: None,
            solution: Some(format!(
                "Start the driver, e.g. `{} --port=9515`",
                self.config.browser.driver_binary()
            )),
        });
    }

    fn check_notebook_server(&self, results: &mut Vec<DiagnosticResult>) {
        let result = match self.config.server_info() {
            Some(info) => {
                let ready = http_client()
                    .map(|client| info.is_ready(&client))
                    .unwrap_or(false);
                DiagnosticResult {
                    category: "Notebook".to_string(),
                    check: format!("Server {} answering", info.url),
                    status: if ready {
                        DiagnosticStatus::Ok
                    } else {
                        DiagnosticStatus::Error
                    },
                    message: None,
                    solution: Some(
                        "Check the server URL and token, or drop --server-url to launch one"
                            .to_string(),
                    ),
                }
            }
            None => match which::which("jupyter") {
                Ok(path) => DiagnosticResult {
                    category: "Notebook".to_string(),
                    check: "jupyter available to launch a server".to_string(),
                    status: DiagnosticStatus::Ok,
                    message: self.verbose.then(|| path.display().to_string()),
                    solution: None,
                },
                Err(_) => DiagnosticResult {
                    category: "Notebook".to_string(),
                    check: "jupyter available to launch a server".to_string(),
                    status: DiagnosticStatus::Error,
                    message: Some("No --server-url given and jupyter is not in PATH".to_string()),
                    solution: Some("pip install notebook".to_string()),
                },
            },
        };
        results.push(result);
    }
}

fn http_client() -> Option<Client> {
    Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .ok()
}
