//! # HTTP SERVER
//!
//! **MODEL**: One background thread owning a tokio runtime; each connection is served by
//! hyper's auto builder and drained on shutdown.

use crate::app::{App, InjectRequest};
use crate::error::EngineError;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio::task::JoinSet;

/// HTTP/1 front end for an [`App`], running on its own thread and runtime.
pub struct HttpServer {
    app: Arc<App>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HttpServer {
    /// Server for `app`; nothing is bound until [`HttpServer::serve`].
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Start serving on the given address, e.g. "127.0.0.1:8080". Port 0 picks a free port.
    ///
    /// Returns the bound address.
    pub fn serve(&mut self, addr: impl ToSocketAddrs) -> Result<SocketAddr, EngineError> {
        if self.handle.is_some() {
            return Err(EngineError::AlreadyRunning);
        }
        let std_listener = std::net::TcpListener::bind(addr)?;
        std_listener.set_nonblocking(true)?;
        let local_addr = std_listener.local_addr()?;
        let runtime = Runtime::new()?;

        let app = self.app.clone();
        let keep_alive = app.config().keep_alive_timeout();
        let (tx, mut rx) = oneshot::channel::<()>();
        let thread = std::thread::spawn(move || {
            runtime.block_on(async move {
                let listener = match TcpListener::from_std(std_listener) {
                    Ok(l) => l,
                    Err(e) => {
                        log::error!("bind error: {e}");
                        return;
                    }
                };
                log::info!("listening on {local_addr}");
                let mut builder = Builder::new(TokioExecutor::new());
                match keep_alive {
                    Some(timeout) => {
                        builder
                            .http1()
                            .keep_alive(true)
                            .timer(TokioTimer::new())
                            .header_read_timeout(timeout);
                    }
                    None => {
                        builder.http1().keep_alive(false);
                    }
                }
                let graceful = GracefulShutdown::new();
                let mut join_set: JoinSet<()> = JoinSet::new();

                loop {
                    tokio::select! {
                        _ = &mut rx => break,
                        accept = listener.accept() => {
                            let (stream, peer) = match accept {
                                Ok(s) => s,
                                Err(e) => {
                                    log::error!("accept error: {e}");
                                    continue;
                                }
                            };
                            log::debug!("connection from {peer}");
                            let app = app.clone();
                            let http_builder = builder.clone();
                            let watcher = graceful.watcher();
                            join_set.spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| handle_request(req, app.clone()));
                                let connection = http_builder.serve_connection(io, service).into_owned();
                                if let Err(err) = watcher.watch(connection).await {
                                    log::error!("server error: {err}");
                                }
                            });
                        }
                        Some(res) = join_set.join_next(), if !join_set.is_empty() => {
                            log_join_error(res);
                        }
                    }
                }

                drop(listener);
                graceful.shutdown().await;
                while let Some(res) = join_set.join_next().await {
                    log_join_error(res);
                }
                log::info!("server on {local_addr} stopped");
            });
        });
        self.shutdown_tx = Some(tx);
        self.handle = Some(thread);
        Ok(local_addr)
    }

    /// `true` between [`HttpServer::serve`] and [`HttpServer::shutdown`].
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop accepting, drain open connections and wait for the server thread.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("server thread panicked");
            }
        }
    }
}

impl Drop for HttpServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_join_error(res: Result<(), tokio::task::JoinError>) {
    if let Err(join_err) = res {
        if join_err.is_panic() {
            log::error!("connection task panicked: {join_err}");
        } else {
            log::error!("connection task error: {join_err}");
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    app: Arc<App>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let (parts, body_stream) = req.into_parts();
    let body = body_stream.collect().await?.to_bytes();

    let url = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let request = InjectRequest {
        method: parts.method.as_str().to_string(),
        url,
        headers,
        query: Vec::new(),
        body: body.to_vec(),
    };
    Ok(app.inject(request).await.into_hyper())
}
