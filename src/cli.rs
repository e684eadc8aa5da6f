// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CheckerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "index-checker",
    version,
    about = "Check whether URLs appear in a search engine's index",
    long_about = "index-checker runs a `site:` query and then an exact-phrase query for each URL \
                  and reports whether the URL shows up in the results. URLs are checked one at a \
                  time with a pause after every query to avoid being blocked."
)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a batch of URLs
    ///
    /// Example: index-checker check https://example.com/page1 --file more-urls.txt
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// URLs to check (one per argument)
    pub urls: Vec<String>,

    /// Read more URLs from a file, one per line ("-" reads stdin)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// JSON config file (endpoint, headers, phrase rules, ...)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Interface language hint sent as `hl`
    #[arg(long)]
    pub locale: Option<String>,

    /// Country restriction sent as `cr` (e.g. countryFR)
    #[arg(long)]
    pub country: Option<String>,

    /// Pause after every query, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl CheckArgs {
    // Applies the flags that were given on top of a loaded config
    pub fn apply_overrides(&self, config: &mut CheckerConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        if let Some(country) = &self.country {
            config.country = Some(country.clone());
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
    }
}
