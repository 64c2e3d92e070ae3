//! Builders for scripted tree pages

use super::mocks::ScriptedTreePage;
use crate::scenario::{Scenario, Step};
use crate::server::NotebookServerInfo;

/// Items the real tree view lists next to the fixtures.
pub const UNRELATED_ITEMS: &[&str] = &["Untitled Folder", "README.md", "My Notebook.ipynb"];

pub fn local_server() -> NotebookServerInfo {
    NotebookServerInfo::new("http://127.0.0.1:8888/", Some("test-token".to_string()))
}

/// Listings a scenario expects after 0, 1, 2, ... clicks.
pub fn scenario_frames(scenario: &Scenario) -> Vec<Vec<String>> {
    let mut frames: Vec<Vec<String>> = Vec::new();
    let mut clicks = 0;

    for step in &scenario.steps {
        if let Step::Click(_) = step {
            clicks += 1;
            continue;
        }
        let Ok(Some(expected)) = scenario.expected_order(step) else {
            continue;
        };
        while frames.len() < clicks {
            let previous = frames.last().cloned().unwrap_or_else(|| scenario.labels.clone());
            frames.push(previous);
        }
        frames.truncate(clicks);
        frames.push(expected.rendered());
    }
    frames
}

/// A page whose listings satisfy every expectation of `scenarios`.
///
/// Unrelated items are interleaved so that filtering is exercised too.
pub fn conforming_page(scenarios: &[Scenario]) -> ScriptedTreePage {
    let per_scenario: Vec<Vec<Vec<String>>> = scenarios.iter().map(scenario_frames).collect();
    let frame_count = per_scenario.iter().map(Vec::len).max().unwrap_or(1);

    let frames = (0..frame_count)
        .map(|k| {
            let mut listing: Vec<String> = vec![UNRELATED_ITEMS[0].to_string()];
            for frames in &per_scenario {
                if let Some(frame) = frames.get(k.min(frames.len().saturating_sub(1))) {
                    listing.extend(frame.iter().cloned());
                }
                listing.push(UNRELATED_ITEMS[1].to_string());
            }
            listing.push(UNRELATED_ITEMS[2].to_string());
            listing
        })
        .collect();

    ScriptedTreePage::new(frames)
}
