use serde::{Deserialize, Serialize};

/// A single entry of the rendered directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
}

impl Item {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Returns the labels of `items` that are one of `labels`, in the order they were rendered.
///
/// Matching is exact: `"a.txt"` does not match `"a.txt "` or `"A.txt"`. Unrelated items are
/// dropped and a label rendered twice shows up twice.
pub fn filter_labels<S: AsRef<str>>(items: &[Item], labels: &[S]) -> Vec<String> {
    items
        .iter()
        .filter(|item| labels.iter().any(|label| label.as_ref() == item.label))
        .map(|item| item.label.clone())
        .collect()
}
