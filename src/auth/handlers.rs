use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{password, session};
use crate::db::models::User;
use crate::db::users::{self, NewUser};
use crate::error::{AppError, AppResult};
use crate::extractors::{cookie_value, required, Credentials, CurrentUser, JsonBody, MaybeUser};
use crate::profile::{derive_initials, random_profile_color};
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub fname: Option<String>,
    pub mname: Option<String>,
    pub lname: Option<String>,
    pub password: Option<String>,
}

// -- Credential checks --

/// Look the user up by name and check the password against the stored hash.
/// Unknown user and wrong password are both `Unauthorized`.
pub async fn authenticate(state: &AppState, username: &str, password: &str) -> AppResult<User> {
    let user = users::find_by_username(&state.db, username)?.ok_or(AppError::Unauthorized)?;

    let matches =
        password::verify_password(password.to_string(), user.password_hash.clone()).await?;
    if !matches {
        return Err(AppError::Unauthorized);
    }
    Ok(user)
}

// -- Registration --

/// POST /register — create an account with a random avatar color
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<Response> {
    let username = required(&req.username, "username")?;
    let f_name = required(&req.fname, "fname")?;
    let l_name = required(&req.lname, "lname")?;
    let m_name = req.mname.as_deref().filter(|m| !m.trim().is_empty());
    let password = req
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".into()))?;

    let password_hash = password::hash_password(password, state.config.auth.password_cost).await?;
    let initials = derive_initials(f_name, m_name, l_name);

    let id = users::insert(
        &state.db,
        &NewUser {
            username,
            f_name,
            m_name,
            l_name,
            initials: &initials,
            profile_color: random_profile_color(),
            password_hash: &password_hash,
        },
    )?;
    tracing::info!("Registered user {} ({})", username, id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "User registered" })),
    )
        .into_response())
}

// -- Login / logout --

/// POST /login — on success set the session cookie, then redirect either way
pub async fn login(State(state): State<AppState>, creds: Credentials) -> AppResult<Response> {
    let (Some(username), Some(password)) = (creds.username, creds.password) else {
        return Ok(Redirect::to("/failureLogin").into_response());
    };

    let user = match authenticate(&state, &username, &password).await {
        Ok(user) => user,
        Err(AppError::Unauthorized) => {
            tracing::info!("Login failed for {}", username);
            return Ok(Redirect::to("/failureLogin").into_response());
        }
        Err(e) => return Err(e),
    };

    session::purge_expired(&state.db)?;
    let token = session::create_session(&state.db, user.id, state.config.auth.session_hours)?;
    tracing::info!("Login successful for {} ({})", user.username, user.id);

    Ok((
        [(
            header::SET_COOKIE,
            session::session_cookie(&state.config.auth, &token),
        )],
        Redirect::to("/successLogin"),
    )
        .into_response())
}

/// GET /successLogin
pub async fn success_login(MaybeUser(user): MaybeUser) -> AppResult<Json<serde_json::Value>> {
    let current = user.ok_or(AppError::Unauthorized)?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "userId": current.user.id,
    })))
}

/// GET /failureLogin
pub async fn failure_login() -> Json<serde_json::Value> {
    Json(json!({ "success": false, "message": "Login failed" }))
}

/// GET /logout — drop the session if there is one; always succeeds otherwise
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = cookie_value(&headers, &state.config.auth.cookie_name) {
        session::delete_session(&state.db, token)?;
        tracing::info!("Session closed");
    }

    Ok((
        [(
            header::SET_COOKIE,
            session::clear_session_cookie(&state.config.auth),
        )],
        "Logged out",
    )
        .into_response())
}

/// GET /currentUserId
pub async fn current_user_id(current: CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "userId": current.user.id }))
}
