use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db::Score, include_res, session::USER_ID, AppResult};

#[debug_handler]
pub(crate) async fn profile(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(user_id) = session.get::<i64>(USER_ID).await? else {
        return Ok(Redirect::to("/login?next=/profile").into_response());
    };

    let (username,): (String,) = sqlx::query_as("SELECT username FROM users WHERE id=?")
        .bind(user_id)
        .fetch_one(&db_pool)
        .await?;

    let scores: Vec<Score> =
        sqlx::query_as("SELECT * FROM scores WHERE user_id=? ORDER BY score DESC LIMIT 10")
            .bind(user_id)
            .fetch_all(&db_pool)
            .await?;

    let mut score_rows = String::new();
    for (i, entry) in scores.iter().enumerate() {
        score_rows += &include_res!(str, "/pages/score_row.html")
            .replace("{rank}", &(i + 1).to_string())
            .replace("{player_name}", &entry.player_name)
            .replace("{score}", &entry.score.to_string());
    }

    Ok(Html(
        include_res!(str, "/pages/profile.html")
            .replace("{username}", &username)
            .replace("{score_rows}", &score_rows),
    )
    .into_response())
}
