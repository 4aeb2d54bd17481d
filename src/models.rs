use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_LIMIT;

/// One row of the record listing, as returned by a filter query
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSummary {
    /// Opaque unique id of the captured request
    pub token: String,
    pub ip: String,
    pub method: String,
    pub url: String,
    pub captured_at: DateTime<Utc>,
}

/// Full request detail loaded on demand by token
///
/// Header values are already normalized to single joined strings; repeated
/// values never reach this type.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDetail {
    pub method: String,
    /// Reconstructed scheme://host/path
    pub full_url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub captured_at_millis: i64,
}

/// Filters applied to the record listing, fixed for the whole session
#[derive(Clone, Debug)]
pub struct FilterCriteria {
    pub ip: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    /// Inclusive lower bound on capture time
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on capture time
    pub end: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            ip: None,
            url: None,
            method: None,
            start: None,
            end: None,
            limit: DEFAULT_LIMIT,
        }
    }
}
