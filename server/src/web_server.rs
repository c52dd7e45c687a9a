use std::future::Future;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use common::log;

use crate::connection_tracker::ConnectionTracker;
use crate::dispatcher::EventSender;
use crate::server_config::ServerConfig;
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub events: EventSender,
    pub tracker: ConnectionTracker,
    pub message_budget: u64,
    pub outbound_queue: usize,
}

impl WebServerState {
    pub fn new(events: EventSender, config: &ServerConfig) -> Self {
        Self {
            events,
            tracker: ConnectionTracker::new(),
            message_budget: config.message_budget,
            outbound_queue: config.outbound_queue,
        }
    }
}

pub fn router(state: WebServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_upgrade_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn bind(address: &str) -> std::io::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(address).await?;
    let local_addr = listener.local_addr()?;
    Ok((listener, local_addr))
}

pub async fn run_web_server(
    listener: TcpListener,
    state: WebServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log!("Web server listening on ws://{}/ws", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}
