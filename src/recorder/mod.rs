//! Run recorder collaborator
//!
//! Persists aggregation outcomes: a machine-readable JSON line appended to
//! the run log, and a human-readable report file per run. I/O failures are
//! logged and swallowed; a successful search never fails on account of its
//! artifacts.

use crate::config::RecorderSettings;
use crate::search::AggregationResult;
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// One line of the append-only run log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: String,
    pub dork: String,
    pub results_count: usize,
    pub search_time: f64,
    pub sources: Vec<String>,
    pub results: Vec<String>,
}

/// Records aggregation outcomes to disk
pub struct RunRecorder {
    log_path: PathBuf,
    report_dir: PathBuf,
    // Serializes appends so concurrent searches interleave whole lines
    append_lock: Mutex<()>,
}

impl RunRecorder {
    pub fn new(settings: &RecorderSettings) -> Self {
        Self {
            log_path: settings.log_path.clone(),
            report_dir: settings.report_dir.clone(),
            append_lock: Mutex::new(()),
        }
    }

    /// Append one JSON line for this run; failures are logged and swallowed
    pub async fn append_log(&self, query: &str, result: &AggregationResult) {
        if let Err(e) = self.try_append_log(query, result).await {
            warn!("failed to append run log: {}", e);
        }
    }

    async fn try_append_log(&self, query: &str, result: &AggregationResult) -> Result<()> {
        let entry = RunLogEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            dork: query.to_string(),
            results_count: result.urls.len(),
            search_time: result.search_time,
            sources: result.sources_used.clone(),
            results: result.urls.clone(),
        };
        let line = serde_json::to_string(&entry)?;

        let _guard = self.append_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    /// Write a human-readable report file for this run.
    ///
    /// Returns the report path, or None when writing failed (logged, never
    /// propagated).
    pub async fn write_report(
        &self,
        query: &str,
        requested: usize,
        result: &AggregationResult,
    ) -> Option<PathBuf> {
        match self.try_write_report(query, requested, result).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("failed to write report file: {}", e);
                None
            }
        }
    }

    async fn try_write_report(
        &self,
        query: &str,
        requested: usize,
        result: &AggregationResult,
    ) -> Result<PathBuf> {
        let timestamp = Local::now();
        let path = self
            .report_dir
            .join(format!("nexus_results_{}.txt", timestamp.timestamp()));

        let mut report = String::new();
        report.push_str("NEXUS SEARCH RESULTS\n");
        report.push_str("====================\n\n");
        report.push_str(&format!("Query:          {}\n", query));
        report.push_str(&format!("Requested:      {}\n", requested));
        report.push_str(&format!("Results found:  {}\n", result.urls.len()));
        report.push_str(&format!("Search time:    {:.2}s\n", result.search_time));
        report.push_str(&format!("Sources:        {}\n", result.sources_used.join(", ")));
        report.push_str(&format!(
            "Timestamp:      {}\n\n",
            timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        report.push_str("Results:\n");
        report.push_str("--------\n");
        for url in &result.urls {
            report.push_str(url);
            report.push('\n');
        }

        tokio::fs::write(&path, report).await?;
        Ok(path)
    }
}
