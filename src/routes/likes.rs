use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::likes;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, PathParam};
use crate::state::AppState;

/// Like and unlike share one path; the verb picks the direction.
pub fn router() -> Router<AppState> {
    Router::new().route("/toggleLike/{post_id}", post(like_post).delete(unlike_post))
}

async fn like_post(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(post_id): PathParam<i64>,
) -> AppResult<Json<Value>> {
    // Liking twice is reported as a failure, not absorbed
    likes::like(&state.db, post_id, current.user.id)
        .map_err(|e| AppError::Internal(format!("Error liking post {}: {}", post_id, e)))?;

    Ok(Json(json!({ "success": true, "action": "liked" })))
}

async fn unlike_post(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(post_id): PathParam<i64>,
) -> AppResult<Json<Value>> {
    likes::unlike(&state.db, post_id, current.user.id)?;
    Ok(Json(json!({ "success": true, "action": "unliked" })))
}
