//! Profile storage
//!
//! The store is a directory of `<token>.json` files, one per captured
//! request, queried through the [`ProfileStore`] trait. [`RecordStore`]
//! wraps a store and normalizes raw profiles into display-ready records.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{FilterCriteria, RecordDetail, RecordSummary};

/// A captured header value: either a single string or repeated values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// Collapse repeated values into one comma-joined string.
    pub fn joined(&self) -> String {
        match self {
            HeaderValue::Single(value) => value.clone(),
            HeaderValue::Multi(values) => values.join(", "),
        }
    }
}

/// One request header as captured, order preserved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredHeader {
    pub name: String,
    pub value: HeaderValue,
}

/// A profile exactly as captured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredProfile {
    pub token: String,
    pub ip: String,
    pub method: String,
    /// URL as originally requested, shown in the listing
    pub url: String,
    /// Capture time, epoch milliseconds
    pub time: i64,
    /// Server variables recorded at capture time (REQUEST_SCHEME, HTTP_HOST, ...)
    #[serde(default)]
    pub server: HashMap<String, String>,
    /// Request path component
    pub path: String,
    #[serde(default)]
    pub headers: Vec<StoredHeader>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Listing fields of a stored profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileEntry {
    pub token: String,
    pub ip: String,
    pub method: String,
    pub url: String,
    pub time: i64,
}

impl From<&StoredProfile> for ProfileEntry {
    fn from(profile: &StoredProfile) -> Self {
        ProfileEntry {
            token: profile.token.clone(),
            ip: profile.ip.clone(),
            method: profile.method.clone(),
            url: profile.url.clone(),
            time: profile.time,
        }
    }
}

/// Raw query passed to a profile store. Empty strings mean "no filter",
/// time bounds are inclusive epoch milliseconds.
#[derive(Clone, Debug, Default)]
pub struct ProfileQuery {
    pub ip: String,
    pub url: String,
    pub method: String,
    pub limit: usize,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Query surface of the profile store.
pub trait ProfileStore {
    /// Matching profiles, most recent first, capped at `query.limit`.
    fn find(&self, query: &ProfileQuery) -> Result<Vec<ProfileEntry>>;

    /// The full profile for a token, or `None` when the token is unknown.
    fn load_profile(&self, token: &str) -> Result<Option<StoredProfile>>;
}

/// File-backed profile store: one JSON file per token under a root directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    fn read_profile(&self, path: &PathBuf) -> Result<StoredProfile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse profile {}", path.display()))
    }
}

impl ProfileStore for FileStore {
    fn find(&self, query: &ProfileQuery) -> Result<Vec<ProfileEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.root)
            .with_context(|| format!("failed to list profiles in {}", self.root.display()))?
        {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let profile = match self.read_profile(&path) {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("skipping unreadable profile {}: {err:#}", path.display());
                    continue;
                }
            };
            if matches(&profile, query) {
                entries.push(ProfileEntry::from(&profile));
            }
        }

        entries.sort_by(|a, b| b.time.cmp(&a.time));
        entries.truncate(query.limit);
        debug!(count = entries.len(), "profile query");
        Ok(entries)
    }

    fn load_profile(&self, token: &str) -> Result<Option<StoredProfile>> {
        let path = self.root.join(format!("{token}.json"));
        if !path.exists() {
            return Ok(None);
        }
        self.read_profile(&path).map(Some)
    }
}

fn matches(profile: &StoredProfile, query: &ProfileQuery) -> bool {
    if !query.ip.is_empty() && !profile.ip.contains(&query.ip) {
        return false;
    }
    if !query.url.is_empty() && !profile.url.contains(&query.url) {
        return false;
    }
    if !query.method.is_empty() && !profile.method.eq_ignore_ascii_case(&query.method) {
        return false;
    }
    if let Some(start) = query.start {
        if profile.time < start {
            return false;
        }
    }
    if let Some(end) = query.end {
        if profile.time > end {
            return false;
        }
    }
    true
}

/// Adapter over a [`ProfileStore`]: translates filter criteria into store
/// queries and raw profiles into normalized records.
pub struct RecordStore {
    store: Box<dyn ProfileStore>,
}

impl RecordStore {
    pub fn new(store: Box<dyn ProfileStore>) -> Self {
        RecordStore { store }
    }

    /// The filtered record listing, in store order (most recent first).
    pub fn list(&self, criteria: &FilterCriteria) -> Result<Vec<RecordSummary>> {
        let query = ProfileQuery {
            ip: criteria.ip.clone().unwrap_or_default(),
            url: criteria.url.clone().unwrap_or_default(),
            method: criteria.method.clone().unwrap_or_default(),
            limit: criteria.limit,
            start: criteria.start.map(|t| t.timestamp_millis()),
            end: criteria.end.map(|t| t.timestamp_millis()),
        };

        let entries = self.store.find(&query)?;
        Ok(entries
            .into_iter()
            .map(|entry| RecordSummary {
                captured_at: DateTime::from_timestamp_millis(entry.time).unwrap_or_default(),
                token: entry.token,
                ip: entry.ip,
                method: entry.method,
                url: entry.url,
            })
            .collect())
    }

    /// The full detail for a token, or `None` when the token is unknown.
    ///
    /// Normalization happens here: repeated header values are joined,
    /// the full URL is reconstructed from the captured server variables
    /// (scheme defaults to http), and an empty body folds to `None`.
    pub fn load(&self, token: &str) -> Result<Option<RecordDetail>> {
        let Some(profile) = self.store.load_profile(token)? else {
            debug!(token, "profile not found");
            return Ok(None);
        };

        let scheme = profile
            .server
            .get("REQUEST_SCHEME")
            .map(String::as_str)
            .unwrap_or("http");
        let host = profile
            .server
            .get("HTTP_HOST")
            .map(String::as_str)
            .unwrap_or("localhost");
        let full_url = format!("{}://{}{}", scheme, host, profile.path);

        Ok(Some(RecordDetail {
            method: profile.method,
            full_url,
            headers: profile
                .headers
                .iter()
                .map(|h| (h.name.clone(), h.value.joined()))
                .collect(),
            body: profile.content.filter(|c| !c.is_empty()),
            captured_at_millis: profile.time,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn profile(token: &str, ip: &str, method: &str, url: &str, time: i64) -> StoredProfile {
        StoredProfile {
            token: token.to_string(),
            ip: ip.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            time,
            server: HashMap::from([
                ("REQUEST_SCHEME".to_string(), "https".to_string()),
                ("HTTP_HOST".to_string(), "api.example.com".to_string()),
            ]),
            path: "/users".to_string(),
            headers: vec![StoredHeader {
                name: "Accept".to_string(),
                value: HeaderValue::Single("application/json".to_string()),
            }],
            content: None,
        }
    }

    fn write_profile(dir: &TempDir, profile: &StoredProfile) {
        let path = dir.path().join(format!("{}.json", profile.token));
        fs::write(path, serde_json::to_string(profile).unwrap()).unwrap();
    }

    fn store(dir: &TempDir) -> RecordStore {
        RecordStore::new(Box::new(FileStore::new(dir.path())))
    }

    #[test]
    fn test_find_sorts_most_recent_first() {
        let dir = TempDir::new().unwrap();
        write_profile(&dir, &profile("aaa", "10.0.0.1", "GET", "/a", 1_000));
        write_profile(&dir, &profile("bbb", "10.0.0.1", "GET", "/b", 3_000));
        write_profile(&dir, &profile("ccc", "10.0.0.1", "GET", "/c", 2_000));

        let records = store(&dir).list(&FilterCriteria::default()).unwrap();
        let tokens: Vec<&str> = records.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["bbb", "ccc", "aaa"]);
    }

    #[test]
    fn test_find_applies_limit() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            write_profile(&dir, &profile(&format!("tok{i}"), "10.0.0.1", "GET", "/", i));
        }

        let criteria = FilterCriteria {
            limit: 2,
            ..Default::default()
        };
        let records = store(&dir).list(&criteria).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].token, "tok4");
    }

    #[test]
    fn test_find_filters_by_ip_substring_and_method() {
        let dir = TempDir::new().unwrap();
        write_profile(&dir, &profile("aaa", "192.168.1.20", "GET", "/a", 1));
        write_profile(&dir, &profile("bbb", "10.0.0.7", "POST", "/b", 2));
        write_profile(&dir, &profile("ccc", "192.168.1.21", "POST", "/c", 3));

        let criteria = FilterCriteria {
            ip: Some("192.168.1".to_string()),
            method: Some("post".to_string()),
            ..Default::default()
        };
        let records = store(&dir).list(&criteria).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, "ccc");
    }

    #[test]
    fn test_find_time_bounds_inclusive() {
        let dir = TempDir::new().unwrap();
        write_profile(&dir, &profile("lo", "1.1.1.1", "GET", "/", 1_000));
        write_profile(&dir, &profile("mid", "1.1.1.1", "GET", "/", 2_000));
        write_profile(&dir, &profile("hi", "1.1.1.1", "GET", "/", 3_000));

        let criteria = FilterCriteria {
            start: DateTime::from_timestamp_millis(1_000),
            end: DateTime::from_timestamp_millis(2_000),
            ..Default::default()
        };
        let records = store(&dir).list(&criteria).unwrap();
        let tokens: Vec<&str> = records.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["mid", "lo"]);
    }

    #[test]
    fn test_find_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        write_profile(&dir, &profile("good", "1.1.1.1", "GET", "/", 1));
        fs::write(dir.path().join("broken.json"), "not json").unwrap();

        let records = store(&dir).list(&FilterCriteria::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, "good");
    }

    #[test]
    fn test_find_on_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nowhere");
        let store = RecordStore::new(Box::new(FileStore::new(path)));
        assert!(store.list(&FilterCriteria::default()).unwrap().is_empty());
    }

    #[test]
    fn test_load_unknown_token_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load("missing").unwrap().is_none());
    }

    #[test]
    fn test_load_reconstructs_full_url() {
        let dir = TempDir::new().unwrap();
        write_profile(&dir, &profile("tok1", "1.1.1.1", "GET", "/users", 1_000));

        let detail = store(&dir).load("tok1").unwrap().unwrap();
        assert_eq!(detail.full_url, "https://api.example.com/users");
        assert_eq!(detail.captured_at_millis, 1_000);
    }

    #[test]
    fn test_load_defaults_scheme_and_host() {
        let dir = TempDir::new().unwrap();
        let mut p = profile("tok1", "1.1.1.1", "GET", "/users", 1_000);
        p.server.clear();
        write_profile(&dir, &p);

        let detail = store(&dir).load("tok1").unwrap().unwrap();
        assert_eq!(detail.full_url, "http://localhost/users");
    }

    #[test]
    fn test_load_joins_repeated_header_values() {
        let dir = TempDir::new().unwrap();
        let mut p = profile("tok1", "1.1.1.1", "GET", "/users", 1_000);
        p.headers = vec![
            StoredHeader {
                name: "Accept".to_string(),
                value: HeaderValue::Multi(vec!["text/html".to_string(), "text/plain".to_string()]),
            },
            StoredHeader {
                name: "Host".to_string(),
                value: HeaderValue::Single("api.example.com".to_string()),
            },
        ];
        write_profile(&dir, &p);

        let detail = store(&dir).load("tok1").unwrap().unwrap();
        assert_eq!(
            detail.headers,
            vec![
                ("Accept".to_string(), "text/html, text/plain".to_string()),
                ("Host".to_string(), "api.example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_folds_empty_body_to_none() {
        let dir = TempDir::new().unwrap();
        let mut p = profile("tok1", "1.1.1.1", "POST", "/users", 1_000);
        p.content = Some(String::new());
        write_profile(&dir, &p);

        let detail = store(&dir).load("tok1").unwrap().unwrap();
        assert_eq!(detail.body, None);
    }
}
