//! Sort scenarios and the runner that plays them against a browser.
//!
//! A scenario is a list of reference labels plus a script of clicks and expectations. The
//! expectations encode how the notebook front-end is supposed to order its listing: digit
//! runs compare numerically, and the extension only breaks ties between equal stems.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::core::order::ExpectedOrder;
use crate::driver::Browser;
use crate::error::{HarnessError, Result};
use crate::logging;
use crate::page::{self, SortControl};
use crate::server::NotebookServerInfo;
use crate::wait::{wait_until, WaitConfig};

/// Sort buttons of the file-tree view, in the order the page renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Name,
    LastModified,
    FileSize,
}

impl SortKey {
    pub fn index(&self) -> usize {
        match self {
            SortKey::Name => 0,
            SortKey::LastModified => 1,
            SortKey::FileSize => 2,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "Name"),
            SortKey::LastModified => write!(f, "Last Modified"),
            SortKey::FileSize => write!(f, "File size"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Click(SortKey),
    /// `positions[i]` is where the i-th reference label must be rendered.
    Expect(Vec<usize>),
    /// The reference labels in the order they must be rendered.
    ExpectRendered(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub labels: Vec<String>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        description: impl Into<String>,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            steps: Vec::new(),
        }
    }

    pub fn click(mut self, key: SortKey) -> Self {
        self.steps.push(Step::Click(key));
        self
    }

    pub fn expect(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.steps.push(Step::Expect(positions.into_iter().collect()));
        self
    }

    pub fn expect_rendered<S: Into<String>>(
        mut self,
        rendered: impl IntoIterator<Item = S>,
    ) -> Self {
        self.steps.push(Step::ExpectRendered(
            rendered.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Resolves an expectation step against this scenario's labels.
    pub fn expected_order(&self, step: &Step) -> anyhow::Result<Option<ExpectedOrder>> {
        match step {
            Step::Click(_) => Ok(None),
            Step::Expect(positions) => {
                ExpectedOrder::new(self.labels.iter().cloned(), positions.iter().copied()).map(Some)
            }
            Step::ExpectRendered(rendered) => {
                ExpectedOrder::from_rendered(&self.labels, rendered).map(Some)
            }
        }
    }

    /// Checks every expectation is well formed without touching a browser.
    pub fn validate(&self) -> anyhow::Result<()> {
        for step in &self.steps {
            self.expected_order(step)
                .map_err(|e| anyhow!("scenario '{}': {e}", self.name))?;
        }
        Ok(())
    }
}

/// The built-in scenarios, in suite order.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "all-sorting",
            "Notebooks with numeric suffixes through every sort button",
            [
                "My Notebook 1.ipynb",
                "My Notebook 2.ipynb",
                "My Notebook 10.ipynb",
            ],
        )
        // 1, 2, 10
        .expect([0, 1, 2])
        .click(SortKey::Name)
        // 10, 2, 1
        .expect([2, 1, 0])
        .click(SortKey::LastModified)
        // 10, 1, 2
        .expect([1, 2, 0])
        .click(SortKey::LastModified)
        // 2, 1, 10
        .expect([1, 0, 2])
        // sizes are equal, previous order stays
        .click(SortKey::FileSize)
        .expect([1, 0, 2])
        .click(SortKey::FileSize)
        .expect([1, 0, 2])
        .click(SortKey::Name)
        .expect([0, 1, 2]),
        Scenario::new(
            "letters-between-numbers",
            "Digit runs separated by letters",
            ["t1es1t.txt", "t2es2t.txt", "t10es10t.txt"],
        )
        .expect([0, 1, 2])
        .click(SortKey::Name)
        .expect([2, 1, 0]),
        Scenario::new(
            "dotted-numbers",
            "Dot-separated numbers with a leading zero",
            ["0.1.0.txt", "20.0.1.txt", "0201.0.0.txt"],
        )
        .expect([0, 1, 2])
        .click(SortKey::Name)
        .expect([2, 1, 0]),
        Scenario::new(
            "extension-secondary-key",
            "Equal stems are ordered by extension",
            ["1.txt", "1.doc", "1.docx", "1.rtf", "1.py"],
        )
        .expect_rendered(["1.doc", "1.docx", "1.py", "1.rtf", "1.txt"]),
        Scenario::new(
            "extensionless-first",
            "A name without extension precedes the same name with one",
            ["a", "a.txt"],
        )
        .expect_rendered(["a", "a.txt"]),
    ]
}

/// Picks scenarios by name, keeping suite order. An empty selection means all of them.
pub fn select_scenarios(all: Vec<Scenario>, names: &[String]) -> anyhow::Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(all);
    }
    if let Some(unknown) = names.iter().find(|n| !all.iter().any(|s| &s.name == *n)) {
        let known: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        anyhow::bail!(
            "Unknown scenario '{unknown}'. Available: {}",
            known.join(", ")
        );
    }
    Ok(all.into_iter().filter(|s| names.contains(&s.name)).collect())
}

/// Plays scenarios against one browser session.
pub struct Harness<'a> {
    browser: &'a dyn Browser,
    server: &'a NotebookServerInfo,
    wait: WaitConfig,
}

impl<'a> Harness<'a> {
    pub fn new(
        browser: &'a dyn Browser,
        server: &'a NotebookServerInfo,
        wait: WaitConfig,
    ) -> Self {
        Self {
            browser,
            server,
            wait,
        }
    }

    /// Reloads the tree view and runs every step, stopping at the first failure.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<()> {
        page::open_tree(self.browser, self.server)?;
        let buttons = self.sort_buttons()?;

        for step in &scenario.steps {
            match step {
                Step::Click(key) => {
                    let control = buttons.get(key.index()).ok_or_else(|| {
                        anyhow!(
                            "no '{key}' sort button: the page has {} sort buttons",
                            buttons.len()
                        )
                    })?;
                    control.click(self.browser)?;
                    logging::log_sort_click(&scenario.name, control.index);
                }
                expectation => {
                    let expected = scenario
                        .expected_order(expectation)?
                        .ok_or_else(|| anyhow!("step is not an expectation"))?;
                    let observed = page::current_order(
                        self.browser,
                        self.server,
                        &self.wait,
                        &scenario.labels,
                    )?;
                    logging::log_observed_order(&scenario.name, &observed);
                    expected.check(&observed)?;
                }
            }
        }
        Ok(())
    }

    pub fn run_suite(&self, scenarios: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::new();
        for scenario in scenarios {
            let started = Instant::now();
            let result = self.run_scenario(scenario);
            let duration_ms = started.elapsed().as_millis() as u64;

            logging::log_scenario_outcome(&scenario.name, result.is_ok(), duration_ms);
            let (failure, error) = match result {
                Ok(()) => (None, None),
                Err(e) => (Some(FailureKind::of(&e)), Some(e.plain_message())),
            };
            report.outcomes.push(ScenarioOutcome {
                name: scenario.name.clone(),
                passed: failure.is_none(),
                failure,
                error,
                duration_ms,
            });
        }
        report
    }

    fn sort_buttons(&self) -> Result<Vec<SortControl>> {
        wait_until(&self.wait, || {
            let buttons = page::get_sort_buttons(self.browser)?;
            Ok((!buttons.is_empty()).then_some(buttons))
        })?
        .ok_or_else(|| HarnessError::Other(anyhow!("no sort buttons rendered on the tree view")))
    }
}

/// Why a scenario failed: the page sorted wrong, or the harness could not check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Order,
    Harness,
}

impl FailureKind {
    pub fn of(error: &HarnessError) -> Self {
        if error.is_verification_failure() {
            FailureKind::Order
        } else {
            FailureKind::Harness
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Order => write!(f, "wrong order"),
            FailureKind::Harness => write!(f, "could not run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    pub fn print_summary(&self) {
        for outcome in &self.outcomes {
            if outcome.passed {
                println!(
                    "{} {} {}",
                    "✓".green(),
                    outcome.name.cyan(),
                    format!("({}ms)", outcome.duration_ms).dimmed()
                );
            } else {
                let kind = outcome
                    .failure
                    .map(|kind| format!("({kind})"))
                    .unwrap_or_default();
                println!("{} {} {}", "✗".red(), outcome.name.cyan(), kind.yellow());
                if let Some(error) = &outcome.error {
                    println!("  {} {}", "→".blue(), error);
                }
            }
        }

        println!();
        let total = self.outcomes.len();
        let failed = self.failed_count();
        if failed == 0 {
            println!(
                "{}",
                format!("✅ {total} scenarios passed").green().bold()
            );
        } else {
            println!(
                "{}",
                format!("❌ {failed} of {total} scenarios failed").red().bold()
            );
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HarnessError::Other(anyhow!("Failed to serialize report: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| HarnessError::io("write report", Some(path.display().to_string()), e))
    }
}
