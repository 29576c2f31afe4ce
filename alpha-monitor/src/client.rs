use crate::{
    config::MonitorConfig,
    error::MonitorError,
    token::{ApiEnvelope, RawTokenRecord},
};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Source of raw token list snapshots.
///
/// Implemented over HTTP by [`AlphaClient`]; tests substitute scripted sources.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_tokens(&self) -> Result<Vec<RawTokenRecord>, MonitorError>;
}

/// HTTP [`TokenSource`] for the Binance Alpha token list endpoint.
#[derive(Debug, Clone)]
pub struct AlphaClient {
    http: Client,
    endpoint: Url,
}

impl AlphaClient {
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|error| {
            MonitorError::Config(format!("failed to build http client: {error}"))
        })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TokenSource for AlphaClient {
    async fn fetch_tokens(&self) -> Result<Vec<RawTokenRecord>, MonitorError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), endpoint = %self.endpoint, "received token list");

        parse_envelope(serde_json::from_str::<ApiEnvelope>(&body)?)
    }
}

/// Extract the token list from a decoded envelope. Missing `data` is an error.
pub fn parse_envelope(envelope: ApiEnvelope) -> Result<Vec<RawTokenRecord>, MonitorError> {
    match envelope.data {
        Some(tokens) => Ok(tokens),
        None => Err(MonitorError::MissingData {
            code: envelope.code,
            message: envelope.message,
        }),
    }
}
