//! Command line surface

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Parser;

use crate::constants::{DATE_TIME_FORMAT, DEFAULT_LIMIT, PROFILE_DIR};
use crate::models::FilterCriteria;

#[derive(Parser, Debug)]
#[command(
    name = "curlback",
    version,
    about = "Browse captured HTTP request profiles and export curl replay commands"
)]
pub struct Args {
    /// Filter by IP address (substring match)
    #[arg(long)]
    pub ip: Option<String>,

    /// Filter by URL (substring match)
    #[arg(long)]
    pub url: Option<String>,

    /// Maximum number of records to list
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
    pub limit: usize,

    /// Filter by HTTP method
    #[arg(long)]
    pub method: Option<String>,

    /// Inclusive lower bound on capture time, format "YYYY-MM-DD HH:MM:SS"
    #[arg(long, value_parser = parse_date_time)]
    pub start: Option<DateTime<Utc>>,

    /// Inclusive upper bound on capture time, same format as --start
    #[arg(long, value_parser = parse_date_time)]
    pub end: Option<DateTime<Utc>>,

    /// Operate on one specific record token directly
    #[arg(long)]
    pub token: Option<String>,

    /// Export curl command files instead of displaying
    #[arg(long)]
    pub export: bool,

    /// Directory holding captured profiles (default: ~/.curlback/profiles)
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Directory export files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl Args {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            ip: self.ip.clone(),
            url: self.url.clone(),
            method: self.method.clone(),
            start: self.start,
            end: self.end,
            limit: self.limit,
        }
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(PROFILE_DIR)
        })
    }
}

fn parse_date_time(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| format!("invalid date '{value}', expected format \"YYYY-MM-DD HH:MM:SS\""))
}

fn parse_limit(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or_else(|| "limit must be a positive integer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["curlback"]);
        assert_eq!(args.limit, DEFAULT_LIMIT);
        assert!(!args.export);
        assert!(args.token.is_none());
        assert_eq!(args.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_filters_map_to_criteria() {
        let args = Args::parse_from([
            "curlback",
            "--ip",
            "192.168.1",
            "--method",
            "POST",
            "--limit",
            "25",
            "--start",
            "2024-03-05 06:07:08",
        ]);
        let criteria = args.criteria();
        assert_eq!(criteria.ip.as_deref(), Some("192.168.1"));
        assert_eq!(criteria.method.as_deref(), Some("POST"));
        assert_eq!(criteria.limit, 25);
        assert_eq!(
            criteria.start,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 6, 7, 8).unwrap())
        );
    }

    #[test]
    fn test_token_with_export() {
        let args = Args::parse_from(["curlback", "--token", "abc123", "--export"]);
        assert_eq!(args.token.as_deref(), Some("abc123"));
        assert!(args.export);
    }

    #[test]
    fn test_malformed_date_is_a_usage_error() {
        let result = Args::try_parse_from(["curlback", "--start", "05/03/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = Args::try_parse_from(["curlback", "--limit", "0"]);
        assert!(result.is_err());
    }
}
