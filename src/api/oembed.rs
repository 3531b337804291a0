// oEmbed lookup
// The only outbound call the gateway makes; failures are never retried

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::config::OEmbedConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid oEmbed endpoint: {0}")]
    Endpoint(#[source] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("oEmbed request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("oEmbed response was not JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, FetchError>> + Send + 'a>>;

/// Resolves a page URL to its oEmbed JSON document
pub trait OEmbedFetch: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// HTTPS client for a noembed-style lookup service
pub struct OEmbedClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OEmbedClient {
    pub fn new(config: &OEmbedConfig) -> Result<Self, FetchError> {
        url::Url::parse(&config.endpoint).map_err(FetchError::Endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Full lookup URL; the target is percent-encoded as a single component
    pub fn lookup_url(&self, target: &str) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}url={}",
            self.endpoint,
            urlencoding::encode(target)
        )
    }
}

impl OEmbedFetch for OEmbedClient {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.lookup_url(url))
                .send()
                .await
                .map_err(FetchError::Transport)?;
            response
                .json::<serde_json::Value>()
                .await
                .map_err(FetchError::Decode)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> OEmbedConfig {
        OEmbedConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_lookup_url_encodes_target() {
        let client = OEmbedClient::new(&config("https://noembed.com/embed")).unwrap();
        assert_eq!(
            client.lookup_url("https://www.youtube.com/watch?v=abc&t=1"),
            "https://noembed.com/embed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc%26t%3D1"
        );
    }

    #[test]
    fn test_lookup_url_appends_to_existing_query() {
        let client = OEmbedClient::new(&config("https://oembed.example/lookup?format=json")).unwrap();
        assert_eq!(
            client.lookup_url("a b"),
            "https://oembed.example/lookup?format=json&url=a%20b"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = OEmbedClient::new(&config("noembed.com/embed")).err().unwrap();
        assert!(matches!(err, FetchError::Endpoint(_)));
    }
}
