//! HTTP JSON RPC client implemented with curl.

use crate::{
    config::Configuration,
    jsonrpc::{self, Id, Response},
    method::Method,
    normalize::{self, EtherFormat, Normalizer},
    types::Empty,
};
pub use curl;
use curl::easy::{Easy, List};
use serde::Serialize;
use std::{cell::RefCell, env, string::FromUtf8Error};
use thiserror::Error;
use tracing::{debug, trace};

/// An Ethereum RPC HTTP client.
pub struct Client {
    handle: RefCell<Easy>,
    normalizer: Normalizer,
}

impl Client {
    /// Creates a new JSON RPC HTTP client for the specified URL with the
    /// default configuration.
    pub fn new(url: impl AsRef<str>) -> Result<Self, Error> {
        Self::with_config(url, Configuration::default())
    }

    /// Creates a new JSON RPC HTTP client for the specified URL with custom
    /// timeouts and ether formatting.
    pub fn with_config(url: impl AsRef<str>, config: Configuration) -> Result<Self, Error> {
        let mut handle = Easy::new();
        handle.url(url.as_ref())?;
        handle.post(true)?;
        handle.timeout(config.timeout)?;
        handle.connect_timeout(config.connect_timeout)?;
        handle.http_headers({
            let mut list = List::new();
            list.append("Content-Type: application/json")?;
            list
        })?;
        Ok(Self::with_handle(handle).with_ether_format(config.ether))
    }

    /// Creates a new JSON RPC HTTP client for the specified curl [`curl::easy::Easy`]
    /// handle instance.
    ///
    /// This method assumes that the `url` has been set.
    pub fn with_handle(handle: Easy) -> Self {
        Self {
            handle: RefCell::new(handle),
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
        Self::new(env::var("ETHRPC").expect("missing ETHRPC environment variable")).unwrap()
    }

    fn roundtrip(&self, request: String) -> Result<String, Error> {
        let mut handle = self
            .handle
            .try_borrow_mut()
            .expect("unexpected sharing of curl handle");

        handle.post_fields_copy(request.as_bytes())?;
        let mut response = Vec::new();
        {
            let mut transfer = handle.transfer();
            transfer.write_function(|chunk| {
                response.extend_from_slice(chunk);
                Ok(chunk.len())
            })?;
            transfer.perform()?;
        }

        let status = handle.response_code()?;
        let response = String::from_utf8(response)?;
        debug!(status, body_len = response.len(), "HTTP response");
        trace!(body = %response, "HTTP response body");

        if !(200..300).contains(&status) {
            return Err(Error::Status(status, response));
        }
        Ok(response)
    }

    /// Executes a JSON RPC call.
    pub fn call<M>(&self, method: M, params: M::Params) -> Result<Response, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call(method, params, &self.normalizer, |request| {
            self.roundtrip(request)
        })
    }

    /// Executes a JSON RPC call with empty parameters.
    pub fn exec<M>(&self, method: M) -> Result<Response, Error>
    where
        M: Method<Params = Empty> + Serialize,
    {
        self.call(method, Empty)
    }

    /// Executes a JSON RPC call with a fixed request ID.
    pub fn call_with_id<M>(&self, method: M, params: M::Params, id: Id) -> Result<Response, Error>
    where
        M: Method + Serialize,
    {
        jsonrpc::call_with_id(method, params, id, &self.normalizer, |request| {
            self.roundtrip(request)
        })
    }
}

/// An error code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] curl::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("HTTP {0} error: {1}")]
    Status(u32, String),
    #[error(transparent)]
    Normalize(#[from] normalize::Error),
}

impl Error {
    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_operation_timedout())
    }
}
