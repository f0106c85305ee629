//! Broker lifecycle
//!
//! Owns the listening socket and the running slot. Start binds and returns
//! immediately; the accept loop runs on its own task. Stop is idempotent.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use broker_printer::Spooler;

use crate::api;
use crate::core::{Config, ServiceError, ServiceState};

struct Listening {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

/// HTTP print broker
///
/// An explicit service object: multiple instances can coexist (tests start
/// several on ephemeral ports) and there are no ambient globals.
pub struct PrintBroker {
    config: Config,
    state: ServiceState,
    running: Mutex<Option<Listening>>,
}

impl PrintBroker {
    pub fn new(config: Config, spooler: Arc<dyn Spooler>) -> Self {
        Self {
            config,
            state: ServiceState::new(spooler),
            running: Mutex::new(None),
        }
    }

    /// Bind the loopback listener and start serving.
    ///
    /// Non-blocking: the accept loop runs on its own task and this returns
    /// the bound address (with port 0 the OS picks an ephemeral port).
    /// Starting an already-running broker is a reported no-op that keeps
    /// the existing listener.
    pub async fn start(&self) -> Result<SocketAddr, ServiceError> {
        let mut running = self.running.lock().await;

        if let Some(listening) = running.as_ref() {
            warn!(addr = %listening.addr, "start requested but broker is already running");
            return Ok(listening.addr);
        }

        let bind_error = |source| ServiceError::Bind {
            port: self.config.port,
            source,
        };
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, self.config.port))
            .await
            .map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        let app = api::build_router(self.state.clone());
        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "http server terminated");
            }
        });

        info!(addr = %addr, "print broker listening");
        *running = Some(Listening {
            addr,
            shutdown,
            task,
        });

        Ok(addr)
    }

    /// Stop accepting connections and release the socket.
    ///
    /// Idempotent; stopping a broker that is not running just logs.
    /// Requests already in flight are allowed to finish.
    pub async fn stop(&self) {
        let taken = self.running.lock().await.take();
        match taken {
            Some(listening) => {
                listening.shutdown.cancel();
                if let Err(e) = listening.task.await {
                    error!(error = %e, "server task ended abnormally");
                }
                info!(addr = %listening.addr, "print broker stopped");
            }
            None => debug!("stop requested but broker is not running"),
        }
    }

    /// Whether the broker currently holds a listener.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Address of the active listener, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|l| l.addr)
    }
}
