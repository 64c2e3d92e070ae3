use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use nbsort::config::HarnessConfig;
use nbsort::doctor::DoctorCommand;
use nbsort::driver::BrowserKind;
use nbsort::logging;
use nbsort::run::RunCommand;
use nbsort::scenario::builtin_scenarios;
use nbsort::seed;

#[derive(Parser)]
#[command(name = "nbsort")]
#[command(author = "nbsort Contributors")]
#[command(version = "0.1.0")]
#[command(about = "nbsort - check the notebook file tree sorts the way people expect", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, help = "Path to a JSON config file", global = true)]
    config: Option<PathBuf>,

    #[arg(long, help = "WebDriver endpoint URL", global = true)]
    webdriver: Option<String>,

    #[arg(long, help = "URL of a running notebook server", global = true)]
    server_url: Option<String>,

    #[arg(long, help = "Notebook server token", global = true)]
    token: Option<String>,

    #[arg(long, help = "Browser to drive (chrome or firefox)", global = true)]
    browser: Option<BrowserKind>,

    #[arg(long, help = "Show the browser window", global = true)]
    headed: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the sort scenarios")]
    Run {
        #[arg(short, long = "scenario", help = "Only run the named scenario (repeatable)")]
        scenarios: Vec<String>,

        #[arg(long, help = "Directory to serve when launching a notebook server")]
        notebook_dir: Option<PathBuf>,

        #[arg(long, help = "Write a JSON report to this path")]
        report: Option<PathBuf>,
    },

    #[command(about = "List the built-in scenarios")]
    List,

    #[command(about = "Write the fixture files into a directory")]
    Seed {
        #[arg(help = "Directory to seed")]
        dir: PathBuf,
    },

    #[command(about = "Diagnose the browser and server setup")]
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    match &cli.command {
        Commands::List => {
            println!("{}", "Built-in scenarios:".blue().bold());
            for scenario in builtin_scenarios() {
                println!(
                    "  {} {} - {}",
                    "•".blue(),
                    scenario.name.cyan(),
                    scenario.description
                );
            }
        }
        Commands::Seed { dir } => {
            let written = seed::seed_directory(dir)?;
            println!(
                "{} Seeded {} files into {}",
                "✓".green(),
                written.len(),
                dir.display()
            );
        }
        Commands::Doctor => {
            let config = load_config(&cli)?;
            DoctorCommand::new(config, cli.verbose).execute()?;
        }
        Commands::Run {
            scenarios,
            notebook_dir,
            report,
        } => {
            let config = load_config(&cli)?;
            RunCommand::new(config, cli.verbose)
                .with_scenarios(scenarios.clone())
                .with_notebook_dir(notebook_dir.clone())
                .with_report(report.clone())
                .execute()?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::load(cli.config.as_deref())?;
    config.apply_env()?;

    if let Some(url) = &cli.webdriver {
        config.webdriver_url = url.clone();
    }
    if let Some(url) = &cli.server_url {
        config.server_url = Some(url.clone());
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(browser) = cli.browser {
        config.browser = browser;
    }
    if cli.headed {
        config.headless = false;
    }
    Ok(config)
}
