use axum::{
    debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db::User, include_res, session::USER_ID, AppResult};

use super::safe_return_url;

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    next: Option<String>,
}

fn login_html(error: &str, next: &str) -> Response {
    Html(
        include_res!(str, "/pages/login.html")
            .replace("{error}", error)
            .replace("{next}", next),
    )
    .into_response()
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { next }): Query<LoginQuery>,
    session: Session,
) -> AppResult<Response> {
    if session.get::<i64>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(login_html("", next.as_deref().unwrap_or("")))
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(LoginForm { email, password, next }): Form<LoginForm>,
) -> AppResult<Response> {
    if session.get::<i64>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email=?")
        .bind(&email)
        .fetch_optional(&db_pool)
        .await?;

    let Some(user) = user else {
        return Ok(login_html("Invalid email or password", next.as_deref().unwrap_or("")));
    };

    if !bcrypt::verify(&password, &user.password_hash)? {
        return Ok(login_html("Invalid email or password", next.as_deref().unwrap_or("")));
    }

    session.insert(USER_ID, user.id).await?;
    tracing::info!(username = %user.username, "user logged in");

    Ok(Redirect::to(&safe_return_url(next)).into_response())
}
