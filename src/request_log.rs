// src/request_log.rs
//! Append-only request log, one file per calendar day, one JSON object per line.
//!
//! Writes happen on a detached task so the HTTP response never waits for disk.
//! A failed write is reported through `tracing` and dropped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

/// `option` value used when the request failed.
pub const ERROR_LABEL: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    /// Which extractor produced the answer, or [`ERROR_LABEL`].
    pub option: String,
    /// The response (or error message) serialized as a JSON string.
    pub data: String,
}

impl LogEntry {
    pub fn new<T: Serialize + ?Sized>(payload: &T, url: &str, option: &str) -> Result<Self> {
        Ok(Self {
            timestamp: Utc::now(),
            url: url.to_string(),
            option: option.to_string(),
            data: serde_json::to_string(payload).context("serializing log payload")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RequestLog {
    dir: PathBuf,
}

impl RequestLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding entries for `date`.
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("logHelper-{}.txt", date.format("%d-%m-%Y")))
    }

    /// Today's file, by local calendar date.
    pub fn current_file(&self) -> PathBuf {
        self.file_for(Local::now().date_naive())
    }

    /// File for the local day the entry was stamped on.
    pub fn file_for_entry(&self, entry: &LogEntry) -> PathBuf {
        self.file_for(entry.timestamp.with_timezone(&Local).date_naive())
    }

    /// Append one entry to its day's file, creating the directory on demand.
    /// The line goes out in a single write on an `O_APPEND` handle.
    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating log dir {}", self.dir.display()))?;

        let mut line = serde_json::to_string(entry).context("serializing log entry")?;
        line.push('\n');

        let path = self.file_for_entry(entry);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("appending to {}", path.display()))?;
        file.flush().await.context("flushing log file")?;
        Ok(())
    }

    /// Fire-and-forget variant of [`append`](Self::append). The returned handle
    /// exists for tests; request handlers drop it.
    pub fn spawn_record<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        url: &str,
        option: &str,
    ) -> JoinHandle<()> {
        let entry = LogEntry::new(payload, url, option);
        let log = self.clone();
        tokio::spawn(async move {
            let res = match entry {
                Ok(entry) => log.append(&entry).await,
                Err(e) => Err(e),
            };
            if let Err(e) = res {
                counter!("request_log_write_errors_total").increment(1);
                tracing::error!(error = ?e, dir = %log.dir.display(), "request log write failed");
            }
        })
    }
}
