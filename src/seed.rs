//! Fixture files the built-in scenarios expect to find in the served directory.
//!
//! Notebooks share identical content so that sorting by size cannot tell them apart, and
//! carry explicit modification times so that sorting by date has a known answer.

use serde_json::json;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    Notebook,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub name: &'static str,
    pub kind: FixtureKind,
    /// How far in the past the file's modification time is set.
    pub age: Duration,
}

const fn notebook(name: &'static str, age_secs: u64) -> Fixture {
    Fixture {
        name,
        kind: FixtureKind::Notebook,
        age: Duration::from_secs(age_secs),
    }
}

const fn text(name: &'static str) -> Fixture {
    Fixture {
        name,
        kind: FixtureKind::Text,
        age: Duration::from_secs(600),
    }
}

/// Oldest to newest: 10, 1, 2.
pub const FIXTURES: &[Fixture] = &[
    notebook("My Notebook 10.ipynb", 300),
    notebook("My Notebook 1.ipynb", 200),
    notebook("My Notebook 2.ipynb", 100),
    text("t1es1t.txt"),
    text("t2es2t.txt"),
    text("t10es10t.txt"),
    text("0.1.0.txt"),
    text("20.0.1.txt"),
    text("0201.0.0.txt"),
    text("1.txt"),
    text("1.doc"),
    text("1.docx"),
    text("1.rtf"),
    text("1.py"),
    text("a"),
    text("a.txt"),
];

pub fn empty_notebook() -> String {
    let nb = json!({
        "cells": [],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 2
    });
    // serializing a literal cannot fail
    serde_json::to_string_pretty(&nb).unwrap_or_default()
}

/// Writes every fixture into `dir`, overwriting files of the same name.
pub fn seed_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        HarnessError::io("create notebook directory", Some(dir.display().to_string()), e)
    })?;

    let now = SystemTime::now();
    FIXTURES
        .iter()
        .map(|fixture| write_fixture(dir, fixture, now))
        .collect()
}

fn write_fixture(dir: &Path, fixture: &Fixture, now: SystemTime) -> Result<PathBuf> {
    let path = dir.join(fixture.name);
    let io_err = |op: &str, e| HarnessError::io(op, Some(path.display().to_string()), e);

    let contents = match fixture.kind {
        FixtureKind::Notebook => empty_notebook(),
        FixtureKind::Text => String::new(),
    };
    fs::write(&path, contents).map_err(|e| io_err("write fixture", e))?;

    let mtime = now.checked_sub(fixture.age).unwrap_or(now);
    File::options()
        .write(true)
        .open(&path)
        .and_then(|file| file.set_modified(mtime))
        .map_err(|e| io_err("set fixture modification time", e))?;

    tracing::debug!(path = %path.display(), "Seeded fixture");
    Ok(path)
}
