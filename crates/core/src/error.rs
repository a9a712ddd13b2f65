use reqwest::StatusCode;
use thiserror::Error;

use crate::types::RunningCount;

#[derive(Error, Debug)]
pub enum BoshStatsError {
    #[error("Invalid calendar month {input:?}: {reason}")]
    InvalidWindow { input: String, reason: String },

    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid CA certificate: {reason}")]
    InvalidCaCert { reason: String },

    #[error("Missing {setting}: pass the flag or set {env_var}")]
    MissingSetting {
        setting: &'static str,
        env_var: &'static str,
    },

    #[error("UAA token request failed ({status}): {body}")]
    Uaa { status: StatusCode, body: String },

    #[error("Director request failed ({status}): {body}")]
    Director { status: StatusCode, body: String },

    #[error("no events found for {release} version {version}")]
    ReleaseNotFound { release: String, version: String },

    #[error("Event {id} matched but carries no timestamp")]
    MissingTimestamp { id: String },

    /// A source failure in the middle of an aggregation. `partial` holds the
    /// counts merged from every page fetched before the failure.
    #[error("{source}")]
    Incomplete {
        partial: RunningCount,
        source: Box<BoshStatsError>,
    },

    /// Only reachable when an escaped release name exceeds the regex size limit.
    #[error("Invalid release pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl BoshStatsError {
    /// Counts gathered before an aggregation was aborted, if any.
    pub fn partial_counts(&self) -> Option<&RunningCount> {
        match self {
            BoshStatsError::Incomplete { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoshStatsError>;
