use axum::{
    debug_handler,
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{include_res, session::USER_ID, AppResult};

#[debug_handler]
pub async fn index(session: Session) -> AppResult<Response> {
    let nav = if session.get::<i64>(USER_ID).await?.is_some() {
        include_res!(str, "/pages/nav_user.html")
    } else {
        include_res!(str, "/pages/nav_guest.html")
    };

    Ok(Html(include_res!(str, "/pages/index.html").replace("{nav}", nav)).into_response())
}
