//! Starts a throwaway notebook server over a seeded directory.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

use super::NotebookServerInfo;
use crate::error::HarnessError;
use crate::logging;
use crate::seed;
use crate::wait::WaitConfig;

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Port to bind; a free one is picked when `None`.
    pub port: Option<u16>,
    /// Directory to serve; a temporary one is created when `None`.
    pub notebook_dir: Option<PathBuf>,
    pub startup: WaitConfig,
    pub show_output: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            port: None,
            notebook_dir: None,
            startup: WaitConfig::new(
                std::time::Duration::from_secs(30),
                std::time::Duration::from_millis(250),
            ),
            show_output: false,
        }
    }
}

/// A running `jupyter notebook` child process. Killed on drop.
pub struct NotebookLauncher {
    child: Child,
    info: NotebookServerInfo,
    notebook_dir: PathBuf,
    _temp_dir: Option<TempDir>,
}

impl NotebookLauncher {
    pub fn start(options: &LaunchOptions) -> Result<Self> {
        let jupyter = which::which("jupyter").context(
            "Could not find `jupyter` in PATH. Install it with `pip install notebook` \
             or point --server-url at a running server.",
        )?;

        let (temp_dir, notebook_dir) = match &options.notebook_dir {
            Some(dir) => (None, dir.clone()),
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("nbsort-")
                    .tempdir()
                    .context("Failed to create notebook directory")?;
                let path = temp.path().to_path_buf();
                (Some(temp), path)
            }
        };
        seed::seed_directory(&notebook_dir)
            .with_context(|| format!("Failed to seed {}", notebook_dir.display()))?;

        let port = match options.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let token = generate_token();
        let args = notebook_args(port, &token, &notebook_dir);

        tracing::debug!(jupyter = %jupyter.display(), args = ?args, "Starting notebook server");

        let (stdout, stderr) = if options.show_output {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::null())
        };
        let child = Command::new(&jupyter)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .with_context(|| format!("Failed to execute command: {}", jupyter.display()))?;

        let info = NotebookServerInfo::new(format!("http://127.0.0.1:{port}/"), Some(token));
        logging::log_server_event(&info.url, "spawned");

        let mut launcher = Self {
            child,
            info,
            notebook_dir,
            _temp_dir: temp_dir,
        };

        if let Err(e) = launcher.info.wait_until_ready(&options.startup) {
            let exit = launcher.child.try_wait().ok().flatten();
            return Err(startup_error(e, exit));
        }

        Ok(launcher)
    }

    pub fn info(&self) -> &NotebookServerInfo {
        &self.info
    }

    pub fn notebook_dir(&self) -> &Path {
        &self.notebook_dir
    }

    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.child.try_wait()?.is_none() {
            self.child.kill().context("Failed to stop notebook server")?;
            self.child.wait()?;
            logging::log_server_event(&self.info.url, "stopped");
        }
        Ok(())
    }
}

impl Drop for NotebookLauncher {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "Failed to stop notebook server");
        }
    }
}

/// Explains a failed startup, keeping the readiness error as the cause.
fn startup_error(error: HarnessError, exit: Option<ExitStatus>) -> anyhow::Error {
    let context = match exit {
        Some(status) => format!("Notebook server exited during startup with status: {status}"),
        None => "Notebook server did not become ready".to_string(),
    };
    anyhow::Error::new(error).context(context)
}

pub fn notebook_args(port: u16, token: &str, notebook_dir: &Path) -> Vec<String> {
    vec![
        "notebook".to_string(),
        "--no-browser".to_string(),
        "--ip=127.0.0.1".to_string(),
        format!("--port={port}"),
        "--port-retries=0".to_string(),
        format!("--NotebookApp.token={token}"),
        "--NotebookApp.password=".to_string(),
        format!("--notebook-dir={}", notebook_dir.display()),
    ]
}

static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Random-enough token for a short-lived local server.
pub fn generate_token() -> String {
    let count = TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(count.to_le_bytes());
    hex::encode(&hasher.finalize()[..24])
}

pub fn find_free_port() -> Result<u16> {
    let listener =
        TcpListener::bind("127.0.0.1:0").context("Failed to reserve a local port")?;
    Ok(listener.local_addr()?.port())
}
