use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::orchestrator::BriefOrchestrator;
use crate::render;
use crate::sentiment::backend_from_config;

#[derive(Parser)]
#[command(
    name = "marketbrief",
    about = "Morning market brief: headline sentiment and price changes",
    version = "0.1.0"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch headlines and prices, build the brief, and emit it
    Run {
        /// Comma-separated tickers (overrides TICKERS)
        #[arg(short, long)]
        tickers: Option<String>,

        /// Write the rendered HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the report model as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Classify a single headline and print the corrected judgment
    Classify {
        /// Headline text to classify
        #[arg(short, long)]
        text: String,
    },
}

pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Run {
            tickers,
            output,
            json,
        } => {
            if let Some(raw) = tickers {
                config.tickers = raw
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }

            info!("Building market brief for {} tickers", config.tickers.len());
            let orchestrator = BriefOrchestrator::new(config).await?;
            let outcome = orchestrator.run_live().await?;

            for item_error in &outcome.errors {
                warn!("Skipped {}: {}", item_error.item, item_error.reason);
            }

            let rendered = if json {
                serde_json::to_string_pretty(&serde_json::json!({
                    "report": &outcome.report,
                    "errors": &outcome.errors,
                }))
                .context("Failed to serialize report")?
            } else {
                render::render_html(&outcome.report)
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Brief written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Classify { text } => {
            let backend = backend_from_config(&config).await?;
            let corrector =
                crate::sentiment::RuleCorrector::new(&config.sentiment.override_keywords);

            let score = backend.classify(&text).await?;
            let corrected = corrector.correct(&text, &score);

            println!(
                "{} (confidence {:.2}, backend {})",
                corrected.label,
                corrected.confidence,
                backend.name()
            );
            if corrected != score {
                println!(
                    "rule correction applied: {} {:.2} -> {} {:.2}",
                    score.label, score.confidence, corrected.label, corrected.confidence
                );
            }
        }
    }
    Ok(())
}
