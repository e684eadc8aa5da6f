// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the checker config (defaults -> config file -> flags)
// 3. Collect the URLs (arguments, then --file)
// 4. Check them one by one and print the table (or JSON) at the end
// 5. Exit with 0 when the batch ran, 2 on an internal error
// =============================================================================

mod checker;
mod cli;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;
use url::Url;

use checker::{CheckResult, HttpTransport, IndexChecker, IndexStatus};
use cli::{CheckArgs, Cli, Commands};
use config::CheckerConfig;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Check(args) => handle_check(&args).await,
    }
}

// Handles the 'check' subcommand
async fn handle_check(args: &CheckArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => CheckerConfig::from_file(path)?,
        None => CheckerConfig::default(),
    };
    args.apply_overrides(&mut config);

    let mut urls = args.urls.clone();
    if let Some(path) = &args.file {
        urls.extend(read_url_file(path)?);
    }
    let urls = clean_urls(urls);

    if urls.is_empty() {
        println!("⚠️  Please provide at least one URL");
        return Ok(0);
    }

    for url in &urls {
        if Url::parse(url).is_err() {
            warn!(url = %url, "not a well-formed URL, checking it anyway");
        }
    }

    let transport = HttpTransport::new(&config).context("Failed to create HTTP client")?;
    let checker = IndexChecker::new(transport, config);

    let results = checker
        .check_batch(&urls, |i, total, url| {
            eprintln!("🔎 Checking {}/{}: {}", i + 1, total, url);
        })
        .await;

    eprintln!("✅ Done\n");

    print_results(&results, args.json)?;

    if results.iter().any(|r| r.status.is_blocked()) {
        eprintln!(
            "\nNote: blocked results usually mean the search engine has temporarily \
             blocked your IP address. Try again later or raise --delay-ms."
        );
    }

    Ok(0)
}

// Reads one URL per line from a file, or stdin for "-"
fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open URL file {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let lines = reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read URL file {}", path.display()))?;
    Ok(lines)
}

// Trims every entry and drops blank ones, order preserved
fn clean_urls(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn print_results(results: &[CheckResult], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        print_table(results);
    }
    Ok(())
}

fn print_table(results: &[CheckResult]) {
    println!("{:<60} {:<40}", "URL", "STATUS");
    println!("{}", "=".repeat(100));

    for result in results {
        // Truncate on a char boundary; URLs may contain non-ASCII text
        let url_display = if result.url.chars().count() > 57 {
            let truncated: String = result.url.chars().take(57).collect();
            format!("{}...", truncated)
        } else {
            result.url.clone()
        };

        println!("{:<60} {:<40}", url_display, format_status(&result.status));
    }

    println!();

    let indexed = results.iter().filter(|r| r.status.is_indexed()).count();
    let blocked = results.iter().filter(|r| r.status.is_blocked()).count();
    let not_indexed = results.len() - indexed - blocked;

    println!("📊 Summary:");
    println!("   ✅ Indexed: {}", indexed);
    println!("   ❌ Not indexed: {}", not_indexed);
    println!("   🚫 Blocked: {}", blocked);
    println!("   📋 Total: {}", results.len());
}

fn format_status(status: &IndexStatus) -> String {
    let icon = match status {
        IndexStatus::IndexedViaSite | IndexStatus::IndexedViaExactPhrase => "✅",
        IndexStatus::NotIndexed => "❌",
        IndexStatus::Blocked { .. } => "🚫",
    };
    format!("{} {}", icon, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_urls_trims_and_skips_blanks() {
        let raw = vec![
            "  https://example.com/a  ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "https://example.com/b".to_string(),
        ];
        assert_eq!(
            clean_urls(raw),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_read_missing_url_file() {
        let err = read_url_file(Path::new("/nonexistent/urls.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to open URL file"));
    }

    #[test]
    fn test_read_url_file() {
        let path = std::env::temp_dir().join(format!("index-checker-urls-{}.txt", std::process::id()));
        std::fs::write(&path, "https://example.com/a\n\nhttps://example.com/b\n").unwrap();

        let urls = clean_urls(read_url_file(&path).unwrap());
        std::fs::remove_file(&path).unwrap();

        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(&IndexStatus::IndexedViaSite), "✅ indexed via site-query");
        assert_eq!(format_status(&IndexStatus::NotIndexed), "❌ not indexed");
    }
}
