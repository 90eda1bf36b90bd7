use axum::{
    debug_handler,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{session::USER_ID, AppResult};

use super::flag_error;

#[derive(Debug, Deserialize)]
pub(crate) struct SaveScoreBody {
    score: Option<i64>,
    player_name: Option<String>,
}

#[debug_handler]
pub(crate) async fn save_score(
    State(db_pool): State<SqlitePool>,
    session: Session,

    body: Result<Json<SaveScoreBody>, JsonRejection>,
) -> AppResult<Response> {
    let Ok(Json(SaveScoreBody { score, player_name })) = body else {
        return Ok(flag_error(StatusCode::BAD_REQUEST, "No data provided"));
    };
    let Some(score) = score else {
        return Ok(flag_error(StatusCode::BAD_REQUEST, "No score provided"));
    };

    // A logged-in user's score is pinned to their account and username.
    let user: Option<(i64, String)> = match session.get::<i64>(USER_ID).await? {
        Some(user_id) => sqlx::query_as("SELECT id,username FROM users WHERE id=?")
            .bind(user_id)
            .fetch_optional(&db_pool)
            .await?,
        None => None,
    };
    let (user_id, player_name) = match user {
        Some((id, username)) => (Some(id), username),
        None => (None, player_name.unwrap_or_else(|| "Anonymous".to_owned())),
    };

    let inserted = sqlx::query("INSERT INTO scores (score,player_name,user_id) VALUES (?,?,?)")
        .bind(score)
        .bind(&player_name)
        .bind(user_id)
        .execute(&db_pool)
        .await;

    match inserted {
        Ok(result) => Ok(Json(
            json!({ "success": true, "score_id": result.last_insert_rowid() }),
        )
        .into_response()),
        Err(err) => {
            tracing::error!(%err, "failed to save score");
            Ok(flag_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()))
        }
    }
}
