use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use crate::component::error::AdapterError;

/// Pause after a failed `accept()` so a persistent error (e.g. EMFILE)
/// does not busy-loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A listener bound to `host:port` that accepts and immediately drops
/// connections on a background task until shut down. Port `0` binds an
/// ephemeral port; [`local_addr`](EmbeddedServer::local_addr) reports the
/// real one.
#[derive(Debug)]
pub struct EmbeddedServer {
    name: String,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl EmbeddedServer {
    pub async fn bind(name: &str, host: &str, port: u16) -> Result<Self, AdapterError> {
        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|source| AdapterError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| AdapterError::Bind { addr, source })?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let task_name = name.to_string();
        let task = tokio::spawn(async move {
            let listener = &listener;
            let accept = move || async move { listener.accept().await.map(|(_stream, peer)| peer) };
            accept_loop(&task_name, accept, signal).await;
        });

        log::debug!("{} listening on {}", name, local_addr);
        Ok(Self {
            name: name.to_string(),
            local_addr,
            shutdown: Some(shutdown),
            task,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Close the listener and wait for the accept task to finish.
    pub async fn shutdown(mut self) -> Result<(), AdapterError> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone; nothing to signal then
            let _ = shutdown.send(());
        }
        (&mut self.task)
            .await
            .map_err(|e| AdapterError::Other(format!("{} listener task failed: {}", self.name, e)))
    }
}

impl Drop for EmbeddedServer {
    fn drop(&mut self) {
        // Dropped without shutdown(): stop accepting anyway
        if self.shutdown.is_some() {
            self.task.abort();
        }
    }
}

/// Drive `accept` until `signal` fires, dropping every accepted connection.
pub(crate) async fn accept_loop<F, Fut>(name: &str, mut accept: F, mut signal: oneshot::Receiver<()>)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<SocketAddr>>,
{
    loop {
        tokio::select! {
            _ = &mut signal => break,
            accepted = accept() => match accepted {
                Ok(peer) => log::trace!("{} accepted connection from {}", name, peer),
                Err(e) => {
                    log::warn!("{} failed to accept a connection: {}", name, e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }
    log::trace!("{} listener closed", name);
}

/// Start-once holder for an [`EmbeddedServer`], usable from `&self`.
#[derive(Debug, Default)]
pub struct ServerSlot {
    server: Mutex<Option<EmbeddedServer>>,
    bound: StdMutex<Option<SocketAddr>>,
}

impl ServerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind and hold a server. Fails with `AlreadyRunning` if one is held.
    pub async fn start(&self, name: &str, host: &str, port: u16) -> Result<SocketAddr, AdapterError> {
        let mut server = self.server.lock().await;
        if server.is_some() {
            return Err(AdapterError::AlreadyRunning);
        }
        let bound = EmbeddedServer::bind(name, host, port).await?;
        let addr = bound.local_addr();
        *server = Some(bound);
        self.set_bound(Some(addr));
        Ok(addr)
    }

    /// Release the held server. Fails with `NotRunning` if none is held.
    pub async fn stop(&self) -> Result<(), AdapterError> {
        let server = self.server.lock().await.take().ok_or(AdapterError::NotRunning)?;
        self.set_bound(None);
        server.shutdown().await
    }

    /// Address of the held server, if any
    pub fn bound_addr(&self) -> Option<SocketAddr> {
        self.bound.lock().ok().and_then(|bound| *bound)
    }

    pub fn is_running(&self) -> bool {
        self.bound_addr().is_some()
    }

    fn set_bound(&self, addr: Option<SocketAddr>) {
        if let Ok(mut bound) = self.bound.lock() {
            *bound = addr;
        }
    }
}
