//! Request/response correlation over an asynchronous duplex message link.
//!
//! - [`protocol`] - the wire envelope, validated once at the boundary
//! - [`port`] - in-process duplex link
//! - [`client`] - requester: id allocation, pending registry, replies
//! - [`server`] - responder: method routing and concurrent handlers
//! - [`stdio`] - newline-delimited JSON transport bridged to a [`Port`]
//!
//! Correlation is by id only. Responses may come back in any order and the
//! layer never retries.

pub mod client;
pub mod port;
pub mod protocol;
pub mod server;
pub mod stdio;

pub use client::{CorrelationChannel, PendingRegistry, PendingRequest, Reply, RpcError};
pub use port::Port;
pub use protocol::{Envelope, ProtocolError, Request, RequestId, Response};
pub use server::{Responder, Router};
