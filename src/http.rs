//! Ethereum JSON RPC HTTP client.

use crate::{
    config::Configuration,
    jsonrpc::{self, Id, Response},
    method::Method,
    normalize::{self, EtherFormat, Normalizer},
    types::Empty,
};
use reqwest::{header, StatusCode, Url};
use serde::Serialize;
use std::env;
use thiserror::Error;
use tracing::{debug, trace};

pub use reqwest;

/// An Ethereum JSON RPC HTTP client.
pub struct Client {
    client: reqwest::Client,
    url: Url,
    normalizer: Normalizer,
}

impl Client {
    /// Creates a new JSON RPC HTTP client for the specified URL with the
    /// default configuration.
    pub fn new(url: Url) -> Result<Self, Error> {
        Self::with_config(url, Configuration::default())
    }

    /// Creates a new JSON RPC HTTP client for the specified URL with custom
    /// timeouts and ether formatting.
    pub fn with_config(url: Url, config: Configuration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(client, url).with_ether_format(config.ether))
    }

    /// Creates a new JSON RPC HTTP client for the specified client instance and
    /// URL. Timeouts are whatever the client instance is configured with.
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            normalizer: Normalizer::default(),
        }
    }

    /// Sets how wei amounts are rendered.
    pub fn with_ether_format(mut self, ether: EtherFormat) -> Self {
        self.normalizer = Normalizer::new(ether);
        self
    }

    /// Creates a new JSON RPC HTTP client from the environment. This method
    /// uses the `ETHRPC` environment variable. This is useful for testing.
    ///
    /// # Panics
    ///
    /// This method panics if the environment variable is not present, or if it
    /// is not a valid HTTP url.
    pub fn from_env() -> Self {
        Self::new(
            env::var("ETHRPC")
                .expect("missing ETHRPC environment variable")
                .parse()
                .unwrap(),
        )
        .unwrap()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn roundtrip(&self, request: String) -> Result<String, Error> {
        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, body_len = body.len(), "HTTP response");
        trace!(%body, "HTTP response body");

        if !status.is_success() {
            return Err(Error::Status(status, body));
        }
        Ok(body)
    }

    /// Executes a JSON RPC call.
    pub async fn call<M>(&self, method: M, params: M::Params) -> Result<Response, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call_async(method, params, &self.normalizer, |request| {
            self.roundtrip(request)
        })
        .await
    }

    /// Executes a JSON RPC call with no parameters.
    pub async fn call_np<M>(&self, method: M) -> Result<Response, Error>
    where
        M: Method<Params = Empty> + Serialize,
    {
        self.call(method, Empty).await
    }

    /// Executes a JSON RPC call with a fixed request ID.
    pub async fn call_with_id<M>(
        &self,
        method: M,
        params: M::Params,
        id: Id,
    ) -> Result<Response, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call_async_with_id(method, params, id, &self.normalizer, |request| {
            self.roundtrip(request)
        })
        .await
    }
}

/// An error code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0} error: {1}")]
    Status(StatusCode, String),
    #[error(transparent)]
    Normalize(#[from] normalize::Error),
}

impl Error {
    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_timeout())
    }
}
