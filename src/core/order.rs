use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where each reference label must sit in the filtered listing.
///
/// `positions[i]` is the index at which `labels[i]` is expected. Positions always form a
/// permutation of `0..labels.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedOrder {
    labels: Vec<String>,
    positions: Vec<usize>,
}

impl ExpectedOrder {
    pub fn new<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        positions: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let positions: Vec<usize> = positions.into_iter().collect();

        if labels.len() != positions.len() {
            bail!(
                "{} labels but {} positions were given",
                labels.len(),
                positions.len()
            );
        }

        let mut seen = vec![false; positions.len()];
        for &pos in &positions {
            match seen.get_mut(pos) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => bail!("position {pos} is used more than once"),
                None => bail!("position {pos} is out of range for {} labels", labels.len()),
            }
        }

        Ok(Self { labels, positions })
    }

    /// Builds the positions from the order the labels should be rendered in.
    pub fn from_rendered<S: AsRef<str>>(labels: &[S], rendered: &[S]) -> Result<Self> {
        let positions = labels
            .iter()
            .map(|label| {
                rendered
                    .iter()
                    .position(|r| r.as_ref() == label.as_ref())
                    .ok_or_else(|| anyhow::anyhow!("label '{}' is missing", label.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(labels.iter().map(|l| l.as_ref().to_string()), positions)
    }

    /// The listing this expectation describes, in rendered order.
    pub fn rendered(&self) -> Vec<String> {
        let mut rendered = vec![String::new(); self.labels.len()];
        for (label, &pos) in self.labels.iter().zip(&self.positions) {
            rendered[pos] = label.clone();
        }
        rendered
    }

    /// Compares `observed` position by position.
    pub fn check(&self, observed: &[String]) -> std::result::Result<(), OrderMismatch> {
        for (label, &pos) in self.labels.iter().zip(&self.positions) {
            let found = observed.get(pos);
            if found != Some(label) {
                return Err(OrderMismatch {
                    position: pos,
                    expected_label: label.clone(),
                    found_label: found.cloned(),
                    expected: self.rendered(),
                    observed: observed.to_vec(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMismatch {
    pub position: usize,
    pub expected_label: String,
    pub found_label: Option<String>,
    pub expected: Vec<String>,
    pub observed: Vec<String>,
}

impl fmt::Display for OrderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found_label {
            Some(found) => writeln!(
                f,
                "  position {}: expected '{}', found '{}'",
                self.position, self.expected_label, found
            )?,
            None => writeln!(
                f,
                "  position {}: expected '{}', but only {} labels were rendered",
                self.position,
                self.expected_label,
                self.observed.len()
            )?,
        }
        writeln!(f, "  expected: {:?}", self.expected)?;
        write!(f, "  observed: {:?}", self.observed)
    }
}

impl std::error::Error for OrderMismatch {}
