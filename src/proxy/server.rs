use crate::error::{AppError, AppResult};
use crate::proxy::handlers::ContentHandler;
use crate::proxy::upstream::UpstreamClient;
use crate::proxy::ProxyConfig;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    /// Reserved prefix routed to the backend
    pub api_prefix: Arc<str>,
    pub upstream: Arc<UpstreamClient>,
    pub content: ContentHandler,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> AppResult<Self> {
        Ok(Self {
            api_prefix: Arc::from(config.api_prefix.as_str()),
            upstream: Arc::new(UpstreamClient::new(
                &config.upstream_url,
                config.request_timeout,
            )?),
            content: ContentHandler::new(&config.static_dir, &config.fallback_document),
        })
    }
}

/// Build the gateway router. Every request lands in the dispatcher.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(crate::proxy::router::dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::request_log_middleware,
        ))
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(config: &ProxyConfig) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let state = AppState::from_config(config)?;
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", config.get_bind_address(), config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "Gateway started at http://{} ({}/* -> {}, static files from {})",
            local_addr,
            config.api_prefix.trim_end_matches('/'),
            config.upstream_url,
            config.static_dir
        );

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!(
                                            "Connection handling finished or errored: {:?}",
                                            err
                                        );
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Gateway stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
