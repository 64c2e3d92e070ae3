use colored::Colorize;
use std::fmt;
use std::time::Duration;

use crate::core::order::OrderMismatch;

/// The current page cannot serve the requested listing query.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    NotInTreeView { url: String },
    NoItemsRendered { timeout: Duration },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInTreeView { url } => write!(
                f,
                "You are not in the notebook's file tree view (current url: {url}). \
                 This function can only be used in the file tree context."
            ),
            Self::NoItemsRendered { timeout } => write!(
                f,
                "No .item_link element rendered within {}ms",
                timeout.as_millis()
            ),
        }
    }
}

impl std::error::Error for PageError {}

#[derive(Debug)]
pub enum HarnessError {
    Page(PageError),
    Order(OrderMismatch),
    WebDriver {
        command: String,
        message: String,
    },
    Server {
        url: String,
        message: String,
    },
    Config {
        path: String,
        message: String,
    },
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl HarnessError {
    pub fn webdriver(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WebDriver {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn server(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, path: Option<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// True for failures that describe the page under test rather than the tooling.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Self::Page(_) | Self::Order(_))
    }

    /// Single-line description without terminal styling, for reports.
    pub fn plain_message(&self) -> String {
        match self {
            Self::Page(err) => err.to_string(),
            Self::Order(mismatch) => match &mismatch.found_label {
                Some(found) => format!(
                    "position {}: expected '{}', found '{}' (observed {:?})",
                    mismatch.position, mismatch.expected_label, found, mismatch.observed
                ),
                None => format!(
                    "position {}: expected '{}', nothing rendered there (observed {:?})",
                    mismatch.position, mismatch.expected_label, mismatch.observed
                ),
            },
            Self::WebDriver { command, message } => format!("{command}: {message}"),
            Self::Server { url, message } => format!("{url}: {message}"),
            Self::Config { path, message } => format!("{path}: {message}"),
            Self::Io {
                operation, source, ..
            } => format!("{operation}: {source}"),
            Self::Other(err) => err.to_string(),
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(err) => {
                writeln!(f, "{} Page error", "✗".red().bold())?;
                write!(f, "  {} {}", "→".blue(), err)
            }
            Self::Order(mismatch) => {
                writeln!(f, "{} Unexpected sort order", "✗".red().bold())?;
                write!(f, "{mismatch}")
            }
            Self::WebDriver { command, message } => {
                writeln!(
                    f,
                    "{} WebDriver command failed: {}",
                    "✗".red().bold(),
                    command.yellow()
                )?;
                write!(f, "  {} {}", "→".blue(), message)
            }
            Self::Server { url, message } => {
                writeln!(
                    f,
                    "{} Notebook server error: {}",
                    "✗".red().bold(),
                    url.yellow()
                )?;
                write!(f, "  {} {}", "→".blue(), message)
            }
            Self::Config { path, message } => {
                writeln!(f, "{} Configuration error", "✗".red().bold())?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                write!(f, "  {} Error: {}", "→".blue(), message)
            }
            Self::Io {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                write!(f, "  {} Error: {}", "→".blue(), source)
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Page(err) => Some(err),
            Self::Order(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<PageError> for HarnessError {
    fn from(err: PageError) -> Self {
        Self::Page(err)
    }
}

impl From<OrderMismatch> for HarnessError {
    fn from(err: OrderMismatch) -> Self {
        Self::Order(err)
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
