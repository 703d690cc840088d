use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use review_core::{color_for, normalize_url, ReviewConfig, ScoreRange};
use review_core::url::truncate_with_limit;
use review_page::{load_page_str, Action, ReviewSession};

#[derive(Parser, Debug)]
#[command(
    name = "review-cli",
    about = "Drive the incident review form without a browser."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the slider colour for a score.
    Color {
        value: f64,
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        #[arg(long, default_value_t = 10.0)]
        max: f64,
    },
    /// Print the stored and displayed form of a URL field value.
    Url {
        input: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replay an action script against a page description and print the
    /// resulting page as JSON.
    Replay {
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print every action report before the final page.
        #[arg(long)]
        verbose: bool,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReviewConfig> {
    let Some(path) = path else {
        return Ok(ReviewConfig::default());
    };
    let config = ReviewConfig::from_json_str(&read(path)?)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match args.command {
        Command::Color { value, min, max } => {
            let color = color_for(value, ScoreRange::new(min, max));
            println!("{color} {}", color.to_hex());
        }
        Command::Url { input, config } => {
            let config = load_config(config.as_deref())?;
            let full = normalize_url(&input);
            println!("stored:    {full}");
            println!("displayed: {}", truncate_with_limit(&full, config.truncate_len));
        }
        Command::Replay {
            page,
            script,
            config,
            verbose,
        } => {
            let config = load_config(config.as_deref())?;
            let page = load_page_str(&read(&page)?)
                .with_context(|| format!("Invalid page description in {}", page.display()))?;
            let actions: Vec<Action> = serde_json::from_str(&read(&script)?)
                .with_context(|| format!("Invalid action script in {}", script.display()))?;

            let mut session = ReviewSession::new(page, &config);
            let reports = session.replay(&actions).context("Replay stopped")?;
            log::info!("replayed {} actions", reports.len());
            if verbose {
                for (index, report) in reports.iter().enumerate() {
                    println!("{index:>3} {}", serde_json::to_string(report)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
    }

    Ok(())
}
