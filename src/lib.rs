// marketbrief - Morning Market Brief pipeline
// Annotates news headlines with sentiment, computes per-ticker price change,
// and assembles a typed report ready for rendering.

#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod data;
pub mod orchestrator;
pub mod pricing;
pub mod render;
pub mod report;
pub mod sentiment;

// Re-export commonly used items
pub use config::Config;
pub use data::{Article, ClosingPrice};
pub use report::{EmergingEntry, HeadlineSignal, ItemError, PriceQuote, Report};
pub use sentiment::{SentimentBackend, SentimentLabel, SentimentScore};
