//! Wire envelope shared by both directions of the channel.
//!
//! ```text
//! request  := { "rpc": string, "id": integer, "args"?: any }
//! success  := { "id": integer, "result": any }
//! failure  := { "id": integer, "error": string }
//! ```
//!
//! Messages are classified once at the boundary by [`Envelope::decode`];
//! anything that fits none of the three shapes is rejected there.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type RequestId = u64;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub rpc: String,
    pub id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Response to a [`Request`], matched by id only.
///
/// `Failure` is listed first so a message carrying `error` never decodes as
/// a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Failure { id: RequestId, error: String },
    Success { id: RequestId, result: Value },
}

impl Response {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Success { id, result }
    }

    pub fn failure(id: RequestId, error: impl Into<String>) -> Self {
        Self::Failure { id, error: error.into() }
    }

    pub fn unknown_method(id: RequestId, method: &str) -> Self {
        Self::failure(id, format!("unknown rpc method: {}", method))
    }

    pub fn id(&self) -> RequestId {
        match self {
            Self::Failure { id, .. } | Self::Success { id, .. } => *id,
        }
    }

    pub fn into_result(self) -> Result<Value, String> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Request(Request),
    Response(Response),
}

impl Envelope {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn id(&self) -> RequestId {
        match self {
            Self::Request(request) => request.id,
            Self::Response(response) => response.id(),
        }
    }
}

impl From<Request> for Envelope {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Response> for Envelope {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
