pub mod appresult;
pub mod auth;
pub mod db;
pub mod game;
pub mod index;
pub mod res;
pub mod scores;
pub mod session;

use axum::extract::FromRef;
use sqlx::SqlitePool;

pub use appresult::{AppError, AppResult};
pub use game::SharedRegistry;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub registry: SharedRegistry,
}
