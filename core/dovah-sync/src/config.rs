//! Engine configuration.

use crate::error::SyncResult;
use dovah_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// What to do with a collection load whose response arrives after a newer
/// load of the same collection was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Drop responses that are not from the latest issued request.
    #[default]
    DiscardStale,
    /// Apply every response in arrival order; the last one received wins.
    LastResponseWins,
}

/// Configuration for a [`Library`](crate::Library).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Connection settings for the network client.
    pub client: ClientConfig,
    pub stale_responses: StaleResponsePolicy,
    /// Maximum queued notifications; the oldest is evicted beyond it.
    /// `None` keeps every notification until dismissed.
    pub notification_limit: Option<usize>,
}

impl LibraryConfig {
    /// Defaults with the client section read from the environment.
    pub fn from_env() -> SyncResult<Self> {
        Ok(Self {
            client: ClientConfig::from_env()?,
            ..Default::default()
        })
    }

    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
