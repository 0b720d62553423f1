//! Requester side of the correlation channel.
//!
//! Every [`CorrelationChannel::send`] allocates a fresh id, parks a
//! [`PendingRequest`] in the [`PendingRegistry`] and posts the request. A pump
//! task reads inbound responses and settles the matching entry, whatever order
//! they arrive in.
//!
//! # Teardown
//!
//! When the inbound side closes (or [`CorrelationChannel::close`] is called)
//! every pending entry is abandoned: its [`Reply`] never resolves. Requests
//! sent after teardown are abandoned immediately. Callers that need a bound
//! on waiting wrap the reply in their own timeout.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, ready};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use super::port::Port;
use super::protocol::{Envelope, Request, RequestId, Response};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc {id} failed: {message}")]
    Remote { id: RequestId, message: String },
    #[error("rpc {id} returned an unexpected result: {source}")]
    Decode {
        id: RequestId,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode rpc arguments: {0}")]
    Encode(#[source] serde_json::Error),
}

type Outcome = Result<Value, String>;

/// A request awaiting its response
#[derive(Debug)]
pub struct PendingRequest {
    id: RequestId,
    reply: oneshot::Sender<Outcome>,
}

impl PendingRequest {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

/// Requests in flight, keyed by id.
///
/// Once abandoned the registry stays closed and refuses new entries.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    entries: HashMap<RequestId, PendingRequest>,
    closed: bool,
}

impl PendingRegistry {
    /// Park a request. Returns false (dropping it) when the registry is closed.
    pub fn register(&mut self, request: PendingRequest) -> bool {
        if self.closed {
            return false;
        }
        self.entries.insert(request.id, request);
        true
    }

    /// Settle the entry matching `response`.
    ///
    /// Returns false when no entry exists: unknown id, already settled, or
    /// raced by teardown.
    pub fn settle(&mut self, response: Response) -> bool {
        let Some(pending) = self.entries.remove(&response.id()) else {
            return false;
        };
        // The caller may have dropped its reply; that is not our concern.
        let _ = pending.reply.send(response.into_result());
        true
    }

    pub fn remove(&mut self, id: RequestId) -> Option<PendingRequest> {
        self.entries.remove(&id)
    }

    /// Close the registry and drop every pending entry unsettled.
    ///
    /// Returns the number of requests abandoned.
    pub fn abandon_all(&mut self) -> usize {
        self.closed = true;
        let abandoned = self.entries.len();
        self.entries.clear();
        abandoned
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Future for one response.
///
/// Resolves with the remote result or error. If the request is abandoned by
/// teardown it stays pending forever.
#[derive(Debug)]
pub struct Reply {
    id: RequestId,
    rx: Option<oneshot::Receiver<Outcome>>,
}

impl Reply {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl Future for Reply {
    type Output = Result<Value, RpcError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        match ready!(Pin::new(rx).poll(cx)) {
            Ok(Ok(result)) => Poll::Ready(Ok(result)),
            Ok(Err(message)) => Poll::Ready(Err(RpcError::Remote { id, message })),
            Err(_) => {
                // Sender dropped without settling: abandoned
                self.rx = None;
                Poll::Pending
            }
        }
    }
}

struct Shared {
    next_id: AtomicU64,
    pending: Mutex<PendingRegistry>,
}

/// Requester end of a duplex port.
///
/// Must be opened inside a tokio runtime. Dropping the channel closes the
/// port and abandons whatever is still pending.
pub struct CorrelationChannel {
    shared: Arc<Shared>,
    outbound: mpsc::UnboundedSender<Envelope>,
    pump: JoinHandle<()>,
}

impl CorrelationChannel {
    pub fn open(port: Port) -> Self {
        let (outbound, inbound) = port.split();
        let shared = Arc::new(Shared {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(PendingRegistry::default()),
        });
        let pump = tokio::spawn(pump(Arc::clone(&shared), inbound));
        Self { shared, outbound, pump }
    }

    /// Post a request and return the future for its response
    pub fn send(&self, method: &str, args: Option<Value>) -> Reply {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        if !self.shared.pending.lock().register(PendingRequest { id, reply: tx }) {
            debug!(rpc = method, id, "channel closed, request abandoned");
            return Reply { id, rx: None };
        }

        let request = Request { rpc: method.to_string(), id, args };
        if self.outbound.send(Envelope::Request(request)).is_err() {
            debug!(rpc = method, id, "peer gone, request abandoned");
            self.shared.pending.lock().remove(id);
        }
        Reply { id, rx: Some(rx) }
    }

    /// Send a request and decode its result as `T`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Option<Value>,
    ) -> Result<T, RpcError> {
        let reply = self.send(method, args);
        let id = reply.id();
        let value = reply.await?;
        serde_json::from_value(value).map_err(|source| RpcError::Decode { id, source })
    }

    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.pending.lock().is_closed()
    }

    /// Tear the channel down, abandoning every pending request
    pub fn close(&self) {
        self.pump.abort();
        let abandoned = self.shared.pending.lock().abandon_all();
        debug!(abandoned, "channel closed by requester");
    }
}

impl std::fmt::Debug for CorrelationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationChannel")
            .field("pending", &self.pending_len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for CorrelationChannel {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump(shared: Arc<Shared>, mut inbound: mpsc::UnboundedReceiver<Envelope>) {
    while let Some(envelope) = inbound.recv().await {
        match envelope {
            Envelope::Response(response) => {
                let id = response.id();
                if !shared.pending.lock().settle(response) {
                    debug!(id, "dropping response without a pending request");
                }
            }
            Envelope::Request(request) => {
                debug!(rpc = %request.rpc, id = request.id, "requester ignores inbound request");
            }
        }
    }

    let abandoned = shared.pending.lock().abandon_all();
    debug!(abandoned, "channel closed by peer");
}
