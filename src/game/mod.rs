mod events;
mod registry;
mod transport;
mod ws;

pub use events::{ClientEvent, ServerEvent};
pub use registry::{ChatMessage, Registry, Room};
pub use transport::{Transport, WsTransport};

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::AppState;

/// Opaque identifier for one active socket connection.
pub type ConnId = uuid::Uuid;

/// The one process-wide registry, behind a single lock so every event
/// handler observes a consistent snapshot of rooms and memberships.
pub type SharedRegistry = Arc<Mutex<Registry<WsTransport>>>;

pub fn shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(Registry::new(WsTransport::default())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::game_ws))
        .layer(CorsLayer::permissive())
}
