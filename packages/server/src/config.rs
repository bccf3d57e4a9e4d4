//! Relay configuration.

use std::time::Duration;

/// Default HuggingFace emotion model endpoint
pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-emotion";

/// Messages sent in the private history frame after a join
pub const HISTORY_LIMIT: usize = 50;

/// Period of the liveness sweep
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Stored messages returned by the moderation listing
pub const FLAGGED_LIMIT: usize = 100;

/// Relay tunables. Production uses [`RelayConfig::default`]; tests shorten the
/// heartbeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub history_limit: usize,
    pub heartbeat_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }
}

/// Remote emotion inference settings. Absent token means keyword-only mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub api_token: String,
    pub timeout: Duration,
}
