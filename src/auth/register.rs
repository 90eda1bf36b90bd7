use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{include_res, session::USER_ID, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterForm {
    username: String,
    email: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn register_page(session: Session) -> AppResult<Response> {
    if session.get::<i64>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(include_res!(str, "/pages/register.html").replace("{error}", "")).into_response())
}

#[debug_handler]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(RegisterForm { username, email, password }): Form<RegisterForm>,
) -> AppResult<Response> {
    if session.get::<i64>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;

    let inserted = sqlx::query("INSERT INTO users (username,email,password_hash) VALUES (?,?,?)")
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .execute(&db_pool)
        .await;

    match inserted {
        Ok(_) => {
            tracing::info!(%username, "registered new user");
            Ok(Redirect::to("/login").into_response())
        }
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(Html(
            include_res!(str, "/pages/register.html")
                .replace("{error}", "That username or email is already taken."),
        )
        .into_response()),
        Err(err) => Err(err.into()),
    }
}
