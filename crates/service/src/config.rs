use std::time::Duration;

use common::sufficiency::SufficiencyParams;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // marketplace configuration
    /// base URL of the marketplace HTTP API,
    ///  required when wiring the HTTP storage client
    pub api_url: Option<Url>,

    // sufficiency configuration
    /// capacity the allowances should cover, in bytes.
    ///  if not set then 10 GiB is assumed
    pub storage_capacity_bytes: u64,
    /// desired persistence period, in days
    pub persistence_period_days: u64,
    /// minimum acceptable days of lockup runway
    pub min_days_threshold: u64,

    // cache configuration
    /// how long an enriched snapshot stays fresh before
    ///  the next read refetches it
    pub snapshot_ttl: Duration,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            storage_capacity_bytes: 10 * 1024 * 1024 * 1024,
            persistence_period_days: 30,
            min_days_threshold: 10,
            snapshot_ttl: Duration::from_secs(30),
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    pub fn sufficiency_params(&self) -> SufficiencyParams {
        SufficiencyParams {
            capacity_bytes: self.storage_capacity_bytes,
            period_days: self.persistence_period_days,
            min_days_threshold: self.min_days_threshold,
        }
    }
}
