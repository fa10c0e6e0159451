//! Process-level wrapper that owns the HTTP listeners and the shutdown
//! sequence.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::closer::Closer;

/// One HTTP listener managed by a [`Node`].
pub struct HttpService {
    pub name: String,
    pub addr: SocketAddr,
    pub router: Router,
}

/// A node that has not been started yet. [`Node::run`] turns it into a
/// [`RunningNode`].
pub struct Node {
    id: Uuid,
    services: Vec<HttpService>,
    closer: Closer,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("services", &self.services.len())
            .finish_non_exhaustive()
    }
}

pub struct RunningNode {
    id: Uuid,
    closer: Closer,
    shutdown_tx: watch::Sender<bool>,
    server_handles: Vec<JoinHandle<()>>,
    observer_handle: JoinHandle<()>,
}

impl std::fmt::Debug for RunningNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningNode")
            .field("id", &self.id)
            .field("servers", &self.server_handles.len())
            .finish_non_exhaustive()
    }
}

impl Node {
    pub fn new(services: Vec<HttpService>) -> anyhow::Result<Self> {
        anyhow::ensure!(!services.is_empty(), "a node needs at least one service");

        Ok(Self {
            id: Uuid::new_v4(),
            services,
            closer: Closer::new(),
        })
    }

    /// Register a shutdown callback with the node's closer. Callbacks run in
    /// registration order when the node stops.
    pub fn add_close_callback<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closer.add(name, f);
    }

    /// Bind every listener and start serving.
    ///
    /// Binding happens before anything serves, so one bad address means the
    /// node does not start at all.
    pub async fn run(self) -> anyhow::Result<RunningNode> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let mut bound = Vec::with_capacity(self.services.len());
        for service in self.services {
            let listener = TcpListener::bind(service.addr).await.with_context(|| {
                format!("failed to bind {} on {}", service.name, service.addr)
            })?;
            bound.push((service, listener));
        }

        let mut server_handles = Vec::with_capacity(bound.len());
        for (service, listener) in bound {
            let error_tx = error_tx.clone();
            let mut shutdown_rx = shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                tracing::info!(service = %service.name, addr = %service.addr, "listening");

                let shutdown = async move {
                    let _ = shutdown_rx.changed().await;
                };
                let serve = axum::serve(
                    listener,
                    service
                        .router
                        .into_make_service_with_connect_info::<SocketAddr>(),
                )
                .with_graceful_shutdown(shutdown);

                if let Err(err) = serve.await {
                    let _ = error_tx.send(
                        anyhow::Error::from(err)
                            .context(format!("service {} failed", service.name)),
                    );
                }
            });
            server_handles.push(handle);
        }
        drop(error_tx);

        let observer_handle = spawn_error_observer(error_rx);

        tracing::info!(node_id = %self.id, services = server_handles.len(), "node started");

        Ok(RunningNode {
            id: self.id,
            closer: self.closer,
            shutdown_tx,
            server_handles,
            observer_handle,
        })
    }
}

impl RunningNode {
    /// Stop accepting new connections, drain in-flight requests and run the
    /// shutdown callbacks, all within `deadline`.
    pub async fn stop(self, deadline: Duration) -> anyhow::Result<()> {
        tracing::info!(node_id = %self.id, "node shutting down");
        let started = tokio::time::Instant::now();

        let _ = self.shutdown_tx.send(true);

        let drain = async {
            for handle in self.server_handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(deadline, drain).await.is_err() {
            tracing::warn!("listener drain exceeded the shutdown deadline");
        }

        let remaining = deadline.saturating_sub(started.elapsed());
        let result = self.closer.close(remaining).await;

        self.observer_handle.abort();

        result
    }
}

/// Drain serve errors into the log. The task ends when the last sender goes
/// away.
fn spawn_error_observer(mut error_rx: mpsc::UnboundedReceiver<anyhow::Error>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(err) = error_rx.recv().await {
            tracing::error!("service error: {err:#}");
        }
    })
}
