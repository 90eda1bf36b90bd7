mod login;
mod logout;
mod register;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register::register_page).post(register::register))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
}

/// `next` targets must stay on this site. Anything that is not a plain
/// absolute path falls back to the index.
pub(crate) fn safe_return_url(next: Option<String>) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => "/".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::safe_return_url;

    #[test]
    fn return_url_stays_on_site() {
        assert_eq!(safe_return_url(Some("/leaderboard".to_owned())), "/leaderboard");
        assert_eq!(safe_return_url(Some("https://evil.example".to_owned())), "/");
        assert_eq!(safe_return_url(Some("//evil.example".to_owned())), "/");
        assert_eq!(safe_return_url(None), "/");
    }
}
