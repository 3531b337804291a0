// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::Config;
use crate::api::oembed::{FetchError, OEmbedFetch, OEmbedClient};

/// Application state
pub struct AppState {
    pub config: Config,

    /// Upstream oEmbed lookup used by the `oembedProxy` action
    pub oembed: Arc<dyn OEmbedFetch>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Build state with the HTTPS oEmbed client described by `config.oembed`
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = OEmbedClient::new(&config.oembed)?;
        Ok(Self::with_fetcher(config, Arc::new(client)))
    }

    /// Build state around any oEmbed fetcher
    pub fn with_fetcher(config: &Config, oembed: Arc<dyn OEmbedFetch>) -> Self {
        Self {
            config: config.clone(),
            oembed,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
