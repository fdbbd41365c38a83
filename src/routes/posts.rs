use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::PostView;
use crate::db::{posts, StoreError};
use crate::error::{AppError, AppResult};
use crate::extractors::{required, CurrentUser, JsonBody, PathParam, QueryParams};
use crate::state::AppState;

// --- Request types ---

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "excludeUserId")]
    pub exclude_user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct PostBody {
    pub content: Option<String>,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(list_author_posts).put(edit_post).delete(delete_post),
        )
}

// --- Handlers ---

async fn list_posts(
    State(state): State<AppState>,
    current: CurrentUser,
    QueryParams(query): QueryParams<ListQuery>,
) -> AppResult<Json<Vec<PostView>>> {
    // an empty excludeUserId means "exclude nobody"
    let exclude = match query.exclude_user_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest("excludeUserId must be a user id".into()))?,
        ),
    };

    let posts = posts::list(&state.db, current.user.id, exclude)?;
    Ok(Json(posts))
}

async fn list_author_posts(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(author_id): PathParam<i64>,
) -> AppResult<Json<Vec<PostView>>> {
    let posts = posts::list_by_author(&state.db, author_id, current.user.id)?;
    Ok(Json(posts))
}

async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(body): JsonBody<PostBody>,
) -> AppResult<Json<Value>> {
    let content = required(&body.content, "content")?;
    let post_id = posts::create(&state.db, current.user.id, content)?;

    Ok(Json(json!({
        "success": true,
        "message": "Post created successfully",
        "postId": post_id,
    })))
}

async fn edit_post(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(post_id): PathParam<i64>,
    JsonBody(body): JsonBody<PostBody>,
) -> AppResult<Json<Value>> {
    let content = required(&body.content, "content")?;
    posts::edit(&state.db, post_id, current.user.id, content)
        .map_err(|e| hide_ownership(e, "Post not found or not authorized to edit"))?;

    Ok(Json(json!({ "success": true, "message": "Post updated successfully" })))
}

async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(post_id): PathParam<i64>,
) -> AppResult<Json<Value>> {
    posts::delete(&state.db, post_id, current.user.id)
        .map_err(|e| hide_ownership(e, "Post not found or not authorized to delete"))?;

    Ok(Json(json!({ "success": true, "message": "Post deleted successfully" })))
}

/// Missing posts and other users' posts look the same from outside.
fn hide_ownership(err: StoreError, message: &str) -> AppError {
    match err {
        StoreError::PostMissing(_) | StoreError::PostNotOwned { .. } => {
            tracing::debug!("Post write refused: {}", err);
            AppError::NotFound(message.to_string())
        }
        other => other.into(),
    }
}
