mod leaderboard;
mod profile;
mod save;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save_score", post(save::save_score))
        .route("/leaderboard", get(leaderboard::leaderboard))
        .route("/profile", get(profile::profile))
}

/// Error shape the score API speaks: a status code plus
/// `{"success": false, "error": ...}`.
pub(crate) fn flag_error(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}
