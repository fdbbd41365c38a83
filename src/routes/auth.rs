use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/successLogin", get(handlers::success_login))
        .route("/failureLogin", get(handlers::failure_login))
        .route("/logout", get(handlers::logout))
        .route("/currentUserId", get(handlers::current_user_id))
}
