//! Decoding of successful responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{request_error, Error, RequestErrorKind};

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared a JSON content type.
    Json(Value),
    /// Anything else, including an empty JSON response.
    Empty,
}

impl ResponseBody {
    pub fn from_bytes(is_json: bool, bytes: &[u8]) -> Result<Self, Error> {
        if !is_json || bytes.is_empty() {
            return Ok(ResponseBody::Empty);
        }

        serde_json::from_slice(bytes)
            .map(ResponseBody::Json)
            .map_err(|e| {
                request_error(
                    RequestErrorKind::InvalidResponse,
                    &format!("Invalid JSON response: {e}"),
                )
            })
    }

    /// Decode into `T`. An empty body decodes as JSON `null`, which fits `()`
    /// and `Option<T>`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let value = match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Empty => Value::Null,
        };

        serde_json::from_value(value).map_err(|e| {
            request_error(
                RequestErrorKind::InvalidResponse,
                &format!("Unexpected response shape: {e}"),
            )
        })
    }
}
