//! gRPC server for the agent.
//!
//! Binds the listening socket, registers the ping service with tonic and
//! drives the serve loop on the tokio runtime. The returned
//! [`RunningServer`] owns the socket: stopping or dropping it shuts the
//! loop down and releases the port.

use crate::protocols::ping::{PingHandler, PingServiceServer};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{debug, info};

/// Pending-connection queue length for the listening socket
const LISTEN_BACKLOG: i32 = 1024;

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("Serve task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Server instance, not yet listening
#[derive(Debug, Clone)]
pub struct AgentServer {
    addr: SocketAddr,
}

impl AgentServer {
    /// Create a new server instance for `addr`
    pub fn new(addr: SocketAddr) -> Self {
        AgentServer { addr }
    }

    /// Bind the listening socket and start serving in the background.
    ///
    /// The socket is bound before this returns, so bind failures surface
    /// here and port 0 resolves to a real port via
    /// [`RunningServer::local_addr`]. Must be called from within a tokio
    /// runtime.
    pub fn start(self) -> Result<RunningServer, ServerError> {
        let listener = bind_listener(self.addr).map_err(|source| ServerError::Bind {
            addr: self.addr,
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: self.addr,
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = Server::builder().add_service(PingServiceServer::new(PingHandler));
        let incoming = TcpListenerStream::new(listener);

        let task = tokio::spawn(async move {
            router
                .serve_with_incoming_shutdown(incoming, async {
                    // A dropped sender counts as a shutdown request too
                    let _ = shutdown_rx.await;
                    debug!("Shutdown signal received");
                })
                .await
        });

        debug!(address = %local_addr, "Server listening");

        Ok(RunningServer {
            local_addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

/// Handle to a serving [`AgentServer`].
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), tonic::transport::Error>>>,
}

impl RunningServer {
    /// Address the listening socket is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait until the serve loop exits.
    ///
    /// Cancel-safe: dropping the future leaves the handle usable, so it can
    /// race against a signal and be followed by [`RunningServer::stop`].
    pub async fn wait(&mut self) -> Result<(), ServerError> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        result??;
        Ok(())
    }

    /// Stop accepting connections, drain in-flight calls and release the
    /// listening socket.
    pub async fn stop(mut self) -> Result<(), ServerError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.wait().await?;
        info!(address = %self.local_addr, "Server stopped");
        Ok(())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Create a nonblocking TCP listener with SO_REUSEADDR so a restarted agent
/// can rebind while old connections sit in TIME_WAIT.
fn bind_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(
        match addr {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        },
        Type::STREAM,
        Some(Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    TcpListener::from_std(socket.into())
}
