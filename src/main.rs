use stardash::{auth, db, game, index, scores, AppState};
use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(2)));

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(dotenv::var("DATABASE_URL")?.as_str())
        .await?;
    db::init(&db_pool).await?;

    let app_state = AppState {
        db_pool,
        registry: game::shared_registry(),
    };

    let app = Router::new()
        .route("/", get(index::index))

        .merge(auth::router())
        .merge(scores::router())
        .nest("/game", game::router())

        .with_state(app_state)
        .layer(session_layer);

    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_owned());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "stardash listening");
    axum::serve(listener, app).await?;

    Ok(())
}
