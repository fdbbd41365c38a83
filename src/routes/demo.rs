//! Unauthenticated fixture routes for seeding demo data. Only mounted when
//! demo mode is switched on.

use axum::extract::State;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{likes, posts, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{required, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DemoColorBody {
    pub username: Option<String>,
    pub profile_color: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPostBody {
    pub user_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoLikeBody {
    pub user_id: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/demo/updateProfileColor", put(update_profile_color))
        .route("/demo/posts", post(create_post))
        .route("/demo/toggleLike/{post_id}", post(like_post))
}

async fn update_profile_color(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DemoColorBody>,
) -> AppResult<Json<Value>> {
    let (Some(username), Some(color)) = (body.username.as_deref(), body.profile_color.as_deref())
    else {
        return Err(AppError::BadRequest(
            "Username and profile color are required.".into(),
        ));
    };

    if users::update_profile_color_by_username(&state.db, username, color)? == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(Json(json!({ "success": true, "message": "Profile color updated successfully" })))
}

async fn create_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DemoPostBody>,
) -> AppResult<Json<Value>> {
    let user_id = body
        .user_id
        .ok_or_else(|| AppError::BadRequest("userId and content are required.".into()))?;
    let content = required(&body.content, "content")?;

    let post_id = posts::create(&state.db, user_id, content)?;
    Ok(Json(json!({ "message": "Post created successfully", "postId": post_id })))
}

async fn like_post(
    State(state): State<AppState>,
    PathParam(post_id): PathParam<i64>,
    JsonBody(body): JsonBody<DemoLikeBody>,
) -> AppResult<Json<Value>> {
    let user_id = body
        .user_id
        .ok_or_else(|| AppError::BadRequest("userId is required.".into()))?;

    likes::like(&state.db, post_id, user_id)
        .map_err(|e| AppError::Internal(format!("Error liking post {}: {}", post_id, e)))?;
    Ok(Json(json!({ "success": true, "action": "liked" })))
}
