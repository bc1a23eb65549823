//! Module containing JSON RPC data types and call dispatch.

use crate::{
    method::Method,
    normalize::{self, Normalizer},
    shape::Verdict,
};
use serde::{Deserialize, Serialize};
use std::{
    future::Future,
    sync::atomic::{self, AtomicU32},
};
use thiserror::Error;
use tracing::debug;

pub use serde_json::{Map, Value};

/// Executes a JSON RPC call with the provided roundtrip implementation.
///
/// Transport failures are returned as errors. Error responses from the node
/// are not: they produce a [`Response`] with an error [`Status`].
pub fn call<M, F, E>(
    method: M,
    params: M::Params,
    normalizer: &Normalizer,
    roundtrip: F,
) -> Result<Response, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Result<String, E>,
    E: From<serde_json::Error> + From<normalize::Error>,
{
    call_with_id(method, params, Id::next(), normalizer, roundtrip)
}

/// Executes a JSON RPC call with a fixed request ID.
pub fn call_with_id<M, F, E>(
    method: M,
    params: M::Params,
    id: Id,
    normalizer: &Normalizer,
    roundtrip: F,
) -> Result<Response, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Result<String, E>,
    E: From<serde_json::Error> + From<normalize::Error>,
{
    let request = Request::new(method, params, id);
    let body = roundtrip(encode(&request)?)?;
    decode(&request, normalizer, &body)
}

/// Executes a JSON RPC call with the provided `async` roundtrip implementation.
pub async fn call_async<M, F, Fut, E>(
    method: M,
    params: M::Params,
    normalizer: &Normalizer,
    roundtrip: F,
) -> Result<Response, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: From<serde_json::Error> + From<normalize::Error>,
{
    call_async_with_id(method, params, Id::next(), normalizer, roundtrip).await
}

/// Executes an `async` JSON RPC call with a fixed request ID.
pub async fn call_async_with_id<M, F, Fut, E>(
    method: M,
    params: M::Params,
    id: Id,
    normalizer: &Normalizer,
    roundtrip: F,
) -> Result<Response, E>
where
    M: Method + Serialize,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: From<serde_json::Error> + From<normalize::Error>,
{
    let request = Request::new(method, params, id);
    let body = roundtrip(encode(&request)?).await?;
    decode(&request, normalizer, &body)
}

fn encode<M>(request: &Request<M>) -> Result<String, serde_json::Error>
where
    M: Method + Serialize,
{
    debug!(rpc.id = request.id.0, rpc.method = %request.method.name(), "sending request");
    serde_json::to_string(request)
}

fn decode<M, E>(request: &Request<M>, normalizer: &Normalizer, body: &str) -> Result<Response, E>
where
    M: Method,
    E: From<serde_json::Error> + From<normalize::Error>,
{
    let object = serde_json::from_str::<Map<String, Value>>(body)?;
    let response = Response::normalize::<M>(object, &request.params, normalizer)?;
    debug!(
        rpc.id = request.id.0,
        rpc.method = %request.method.name(),
        status = ?response.status(),
        "received response"
    );
    Ok(response)
}

/// JSON RPC supported version.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Version {
    /// Version 2.0 of the JSON RPC specification.
    #[serde(rename = "2.0")]
    V2,
}

/// Request and response ID.
///
/// Note that `u32` is used. This is so it always fits in a `f64` and obeys the
/// "SHOULD NOT have fractional parts" rule from the specification.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct Id(pub u32);

impl Id {
    /// Returns the next ID from a process-wide counter.
    pub fn next() -> Self {
        static ID: AtomicU32 = AtomicU32::new(0);
        Self(ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// A request object.
#[derive(Debug, Serialize)]
pub struct Request<M>
where
    M: Method,
{
    pub jsonrpc: Version,
    pub method: M,
    #[serde(serialize_with = "M::serialize_params")]
    pub params: M::Params,
    pub id: Id,
}

impl<M> Request<M>
where
    M: Method,
{
    pub fn new(method: M, params: M::Params, id: Id) -> Self {
        Self {
            jsonrpc: Version::V2,
            method,
            params,
            id,
        }
    }
}

/// Outcome tag added to every response.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl From<Status> for Value {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => "success".into(),
            Status::Error => "error".into(),
        }
    }
}

/// A normalized response.
///
/// This is the node's response object with numeric fields of the result
/// rewritten to decimal, and a `status` key added. Fields that this crate
/// doesn't know about are preserved as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Response(pub Map<String, Value>);

impl Response {
    /// Shapes a raw response object for the method it answers.
    pub fn normalize<M>(
        mut object: Map<String, Value>,
        params: &M::Params,
        normalizer: &Normalizer,
    ) -> Result<Self, normalize::Error>
    where
        M: Method,
    {
        if let Some(error) = object.get("error").filter(|error| !error.is_null()) {
            debug!(%error, "node returned an error");
            object.insert("status".to_owned(), Status::Error.into());
            return Ok(Self(object));
        }

        let verdict = match object.get_mut("result") {
            Some(result) => M::shape(params, normalizer, result)?,
            None => M::shape(params, normalizer, &mut Value::Null)?,
        };
        match verdict {
            Verdict::Success => {
                object.insert("status".to_owned(), Status::Success.into());
            }
            Verdict::Rejected(message) => {
                object.insert("status".to_owned(), Status::Error.into());
                object.insert("message".to_owned(), message.into());
            }
        }
        Ok(Self(object))
    }

    pub fn status(&self) -> Option<Status> {
        Status::deserialize(self.0.get("status")?).ok()
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(Status::Success)
    }

    pub fn result(&self) -> Option<&Value> {
        self.0.get("result")
    }

    /// The raw error payload of the node, if any.
    pub fn error(&self) -> Option<&Value> {
        self.0.get("error").filter(|error| !error.is_null())
    }

    /// The node error, if the payload has the standard JSON RPC shape.
    pub fn rpc_error(&self) -> Option<Error> {
        Error::deserialize(self.error()?).ok()
    }

    /// The message explaining why a call without a node error failed.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message")?.as_str()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// An RPC error that may be produced on a response.
#[derive(Clone, Debug, Deserialize, Error, Serialize)]
#[error("{code}: {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// An error code.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
#[serde(from = "i32", into = "i32")]
pub enum ErrorCode {
    #[error("parse error")]
    ParseError,
    #[error("invalid request")]
    InvalidRequest,
    #[error("method not found")]
    MethodNotFound,
    #[error("invalid params")]
    InvalidParams,
    #[error("internal error")]
    InternalError,
    #[error("server error ({0})")]
    ServerError(i32),
    #[error("reserved ({0})")]
    Reserved(i32),
    #[error("{0}")]
    Other(i32),
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        #[allow(clippy::match_overlapping_arm)]
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            -32099..=-32000 => Self::ServerError(code),
            -32768..=-32000 => Self::Reserved(code),
            _ => Self::Other(code),
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) => code,
            ErrorCode::Reserved(code) => code,
            ErrorCode::Other(code) => code,
        }
    }
}
