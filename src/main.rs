//! Nexus-Search: a multi-source dork search aggregation engine
//!
//! This is the caller-facing entry point: it validates user input, runs one
//! aggregation, prints the outcome, and hands the result to the recorder.

use anyhow::Result;
use nexus_search::{
    config::Settings,
    search::Aggregator,
    RunRecorder, MAX_RESULTS,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings()?;

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if settings.general.debug {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .init();

    info!("Starting Nexus-Search v{}", nexus_search::VERSION);

    let Some((query, count)) = parse_args() else {
        print_usage();
        std::process::exit(2);
    };

    if !settings.primary_enabled() {
        warn!("primary API key missing, secondary backend only");
    }

    let aggregator = Aggregator::from_settings(&settings)?;
    let result = aggregator.aggregate(&query, count).await;

    if result.is_empty() {
        println!("No results for '{}'", query);
    } else {
        println!(
            "{} results in {:.2}s via {}",
            result.result_count(),
            result.search_time,
            result.sources_used.join(", ")
        );
        for url in &result.urls {
            println!("{}", url);
        }
    }

    // Artifacts are best-effort; a failed write never fails the search
    let recorder = RunRecorder::new(&settings.recorder);
    recorder.append_log(&query, &result).await;
    if let Some(path) = recorder.write_report(&query, count, &result).await {
        info!("report written to {}", path.display());
    }

    Ok(())
}

/// Parse and validate `<query> <count>` from the command line.
///
/// Count must lie in [1, 200] and the query must be non-empty; anything
/// else is rejected here, before the engine is involved.
fn parse_args() -> Option<(String, usize)> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        return None;
    }

    let count: usize = args.last()?.parse().ok()?;
    if count < 1 || count > MAX_RESULTS {
        eprintln!("count must be between 1 and {}", MAX_RESULTS);
        return None;
    }

    let query = args[..args.len() - 1].join(" ");
    if query.trim().is_empty() {
        return None;
    }

    Some((query, count))
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("nexus-search/settings.yml"))
            .unwrap_or_default(),
    ];

    // Check environment variable first
    if let Ok(path) = std::env::var("NEXUS_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    for path in paths.iter() {
        if path.exists() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Nexus-Search v{}
A multi-source dork search aggregation engine

USAGE:
    nexus-search <QUERY>... <COUNT>

ARGS:
    <QUERY>    Search query (operators passed through verbatim)
    <COUNT>    Number of results to fetch (1-200)

EXAMPLES:
    nexus-search inurl:admin 25
    nexus-search "site:example.com filetype:pdf" 50

ENVIRONMENT VARIABLES:
    NEXUS_SETTINGS_PATH     Path to settings.yml
    NEXUS_PRIMARY_API_KEY   API key for the primary backend
    SERPAPI_KEY             Legacy alias for the primary API key
    NEXUS_DEBUG             Enable debug logging (true/false)
    NEXUS_LOG_PATH          Path of the append-only run log
    NEXUS_REPORT_DIR        Directory for generated report files
"#,
        nexus_search::VERSION
    );
}
