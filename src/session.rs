//! Session keys shared across handlers.

pub const USER_ID: &str = "user_id";
