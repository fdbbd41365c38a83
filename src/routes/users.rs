use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::session;
use crate::db::models::UserProfile;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::extractors::{required, CurrentUser, JsonBody, PathParam};
use crate::state::AppState;

// --- Request types ---

#[derive(Deserialize)]
pub struct ProfileColorBody {
    pub profile_color: Option<String>,
}

#[derive(Deserialize)]
pub struct InitialsBody {
    pub initials: Option<String>,
}

#[derive(Deserialize)]
pub struct UsernameBody {
    pub username: Option<String>,
}

// --- Router ---

/// Profile mutators always act on the session's own user; ids in the
/// request are never trusted.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/currentUser", get(current_user))
        .route("/updateProfileColor", put(update_profile_color))
        .route("/updateInitials", put(update_initials))
        .route("/updateUsername", put(update_username))
        .route("/users/{user_id}", delete(delete_account))
}

// --- Handlers ---

async fn current_user(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let user = users::find_by_id(&state.db, current.user.id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

async fn update_profile_color(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(body): JsonBody<ProfileColorBody>,
) -> AppResult<Json<Value>> {
    let color = required(&body.profile_color, "profile_color")?;
    users::update_profile_color(&state.db, current.user.id, color)?;
    Ok(Json(json!({ "success": true, "message": "Profile color updated successfully" })))
}

async fn update_initials(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(body): JsonBody<InitialsBody>,
) -> AppResult<Json<Value>> {
    let initials = required(&body.initials, "initials")?;
    users::update_initials(&state.db, current.user.id, initials)?;
    Ok(Json(json!({ "success": true, "message": "Initials updated successfully" })))
}

async fn update_username(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(body): JsonBody<UsernameBody>,
) -> AppResult<Json<Value>> {
    let username = required(&body.username, "username")?;
    users::update_username(&state.db, current.user.id, username)?;
    tracing::info!(
        "User {} renamed {} -> {}",
        current.user.id,
        current.user.username,
        username
    );
    Ok(Json(json!({ "success": true, "message": "Username updated successfully" })))
}

/// DELETE /users/{user_id} — deletes the caller's own account whatever the path says
async fn delete_account(
    State(state): State<AppState>,
    current: CurrentUser,
    PathParam(requested): PathParam<String>,
) -> AppResult<Response> {
    if requested != current.user.id.to_string() {
        tracing::debug!(
            "Account deletion for {} requested by {}; deleting caller",
            requested,
            current.user.id
        );
    }

    users::delete(&state.db, current.user.id)?;
    session::delete_session(&state.db, &current.token)?;
    tracing::info!("Deleted account {}", current.user.id);

    Ok((
        [(
            header::SET_COOKIE,
            session::clear_session_cookie(&state.config.auth),
        )],
        Json(json!({ "success": true, "message": "Account deleted successfully" })),
    )
        .into_response())
}
