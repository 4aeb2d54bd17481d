//! Export of replay commands to per-record files

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::DateTime;
use tracing::info;

use crate::constants::EXPORT_STAMP_FORMAT;
use crate::curl::render_curl;
use crate::models::RecordSummary;
use crate::storage::RecordStore;

/// Result of a single export attempt. An unknown token is a normal,
/// reportable outcome, not a failure.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    /// Command written to this filename
    Written(String),
    NotFound,
}

/// Writes one `curl_<stamp>-<token>.txt` file per exported record.
pub struct Exporter<'a> {
    store: &'a RecordStore,
    out_dir: PathBuf,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a RecordStore, out_dir: impl Into<PathBuf>) -> Self {
        Exporter {
            store,
            out_dir: out_dir.into(),
        }
    }

    /// Export the replay command for one token. Overwrites any previous
    /// export of the same record, last write wins.
    pub fn export_one(&self, token: &str) -> Result<ExportOutcome> {
        let Some(detail) = self.store.load(token)? else {
            return Ok(ExportOutcome::NotFound);
        };

        let command = render_curl(
            &detail.method,
            &detail.full_url,
            &detail.headers,
            detail.body.as_deref(),
        );

        let stamp = DateTime::from_timestamp_millis(detail.captured_at_millis)
            .unwrap_or_default()
            .format(EXPORT_STAMP_FORMAT);
        let filename = format!("curl_{}-{}.txt", stamp, token);

        let path = self.out_dir.join(&filename);
        fs::write(&path, &command)
            .with_context(|| format!("failed to write export file {}", path.display()))?;

        info!(token, filename, "exported curl command");
        Ok(ExportOutcome::Written(filename))
    }

    /// Export every record of the active set, in list order. A NotFound
    /// for one record does not abort the rest.
    pub fn export_all(&self, records: &[RecordSummary]) -> Result<Vec<(String, ExportOutcome)>> {
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let outcome = self.export_one(&record.token)?;
            outcomes.push((record.token.clone(), outcome));
        }
        Ok(outcomes)
    }
}
