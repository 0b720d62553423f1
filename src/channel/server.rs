//! Responder side of the correlation channel.
//!
//! A [`Router`] maps rpc method names to async handlers. The [`Responder`]
//! reads requests from a port, runs each handler as its own task and posts
//! responses as handlers finish, so a slow request never holds up a fast one.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, error};

use super::port::Port;
use super::protocol::{Envelope, Request, Response};

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, String>> + Send>>;
type Handler = Arc<dyn Fn(Option<Value>) -> HandlerFuture + Send + Sync>;

/// Method table for a [`Responder`]
#[derive(Clone, Default)]
pub struct Router {
    handlers: HashMap<String, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method`, replacing any previous handler
    pub fn route<F, Fut>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args| Box::pin(handler(args)));
        self.handlers.insert(method.into(), handler);
        self
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Run the handler for `request` and build its response
    pub fn dispatch(&self, request: Request) -> impl Future<Output = Response> + Send + 'static {
        let Request { rpc, id, args } = request;
        let handler = self.handlers.get(&rpc).cloned();

        async move {
            let Some(handler) = handler else {
                debug!(rpc = %rpc, id, "unknown rpc method");
                return Response::unknown_method(id, &rpc);
            };

            let started = Instant::now();
            let outcome = handler(args).await;
            debug!(
                rpc = %rpc,
                id,
                ok = outcome.is_ok(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "rpc handled"
            );

            match outcome {
                Ok(result) => Response::success(id, result),
                Err(error) => Response::failure(id, error),
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("methods", &self.methods()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Responder {
    router: Router,
}

impl Responder {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Serve requests from `port` until the peer stops sending.
    ///
    /// Requests already received are still answered while the peer can read.
    /// Once the peer is gone entirely, running handlers are cancelled.
    pub async fn serve(self, port: Port) {
        let (outbound, mut inbound) = port.split();
        let mut in_flight: JoinSet<Response> = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                joined = in_flight.join_next(), if !in_flight.is_empty() => match joined {
                    Some(Ok(response)) => {
                        if outbound.send(Envelope::Response(response)).is_err() {
                            break;
                        }
                    }
                    Some(Err(err)) => error!(error = %err, "rpc handler panicked or was cancelled"),
                    None => {}
                },

                message = inbound.recv() => match message {
                    Some(Envelope::Request(request)) => {
                        in_flight.spawn(self.router.dispatch(request));
                    }
                    Some(Envelope::Response(response)) => {
                        debug!(id = response.id(), "responder ignores inbound response");
                    }
                    None => break,
                },
            }
        }

        if !outbound.is_closed() {
            while let Some(joined) = in_flight.join_next().await {
                match joined {
                    Ok(response) => {
                        if outbound.send(Envelope::Response(response)).is_err() {
                            break;
                        }
                    }
                    Err(err) => error!(error = %err, "rpc handler panicked or was cancelled"),
                }
            }
        }

        debug!(cancelled = in_flight.len(), "responder stopped");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn echo_router() -> Router {
        Router::new()
            .route("echo", |args| async move { Ok(args.unwrap_or(Value::Null)) })
            .route("fail", |_| async { Err("handler failed".to_string()) })
    }

    fn request(rpc: &str, id: u64, args: Option<Value>) -> Request {
        Request { rpc: rpc.to_string(), id, args }
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let response = echo_router().dispatch(request("echo", 4, Some(json!({"a": 1})))).await;
        assert_eq!(response, Response::success(4, json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_dispatch_handler_error() {
        let response = echo_router().dispatch(request("fail", 2, None)).await;
        assert_eq!(response, Response::failure(2, "handler failed"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_method() {
        let response = echo_router().dispatch(request("nope", 9, None)).await;
        assert_eq!(response, Response::failure(9, "unknown rpc method: nope"));
    }

    #[test]
    fn test_methods_sorted() {
        let router = echo_router();
        assert_eq!(router.methods(), vec!["echo", "fail"]);
        assert!(router.has_method("echo"));
        assert!(!router.has_method("Echo"));
    }

    #[tokio::test]
    async fn test_serve_answers_until_peer_closes() {
        let (server_end, mut client_end) = Port::pair();
        let task = tokio::spawn(Responder::new(echo_router()).serve(server_end));

        client_end.post(request("echo", 1, Some(json!(5))));
        assert_eq!(
            client_end.recv().await,
            Some(Envelope::Response(Response::success(1, json!(5))))
        );

        drop(client_end);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_drains_after_inbound_closes() {
        let slow = Router::new().route("slow", |_| async {
            tokio::task::yield_now().await;
            Ok(Value::from("done"))
        });
        let (server_end, client_end) = Port::pair();
        let task = tokio::spawn(Responder::new(slow).serve(server_end));

        let (tx, mut rx) = client_end.split();
        tx.send(Envelope::Request(request("slow", 7, None))).unwrap();
        drop(tx);

        assert_eq!(rx.recv().await, Some(Envelope::Response(Response::success(7, json!("done")))));
        task.await.unwrap();
    }
}
