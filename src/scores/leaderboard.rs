use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db::Score, include_res, session::USER_ID, AppResult};

#[debug_handler]
pub(crate) async fn leaderboard(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let top_scores: Vec<Score> =
        sqlx::query_as("SELECT * FROM scores ORDER BY score DESC LIMIT 20")
            .fetch_all(&db_pool)
            .await?;

    let mut score_rows = String::new();
    for (i, entry) in top_scores.iter().enumerate() {
        score_rows += &include_res!(str, "/pages/score_row.html")
            .replace("{rank}", &(i + 1).to_string())
            .replace("{player_name}", &entry.player_name)
            .replace("{score}", &entry.score.to_string());
    }

    let mut user_summary = String::new();
    if let Some(user_id) = session.get::<i64>(USER_ID).await? {
        let best: Option<(i64,)> =
            sqlx::query_as("SELECT score FROM scores WHERE user_id=? ORDER BY score DESC LIMIT 1")
                .bind(user_id)
                .fetch_optional(&db_pool)
                .await?;

        if let Some((best_score,)) = best {
            let (higher,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scores WHERE score > ?")
                .bind(best_score)
                .fetch_one(&db_pool)
                .await?;

            user_summary = include_res!(str, "/pages/user_summary.html")
                .replace("{rank}", &(higher + 1).to_string())
                .replace("{best_score}", &best_score.to_string());
        }
    }

    Ok(Html(
        include_res!(str, "/pages/leaderboard.html")
            .replace("{score_rows}", &score_rows)
            .replace("{user_summary}", &user_summary),
    )
    .into_response())
}
