use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::session;
use crate::db::models::User;
use crate::db::users;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, re-read from the database on every request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extractor that requires authentication.
/// Returns 401 if there is no live session or its user no longer exists.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let user_id = session::resolve_session(&state.db, token)?.ok_or(AppError::Unauthorized)?;

        let user = users::find_by_id(&state.db, user_id)?.ok_or_else(|| {
            tracing::warn!("Session bound to missing user {}", user_id);
            AppError::Unauthorized
        })?;

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Optional user extractor — `None` instead of 401 when not authenticated.
/// Store failures still surface as errors.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Unauthorized) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

/// Login credentials, accepted as either a JSON or a URL-encoded form body.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Never rejects: a missing or unreadable body yields empty credentials,
    /// which the login handler treats as a failed login.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let parsed = if is_json {
            Json::<Credentials>::from_request(req, state)
                .await
                .map(|Json(creds)| creds)
                .map_err(|e| e.body_text())
        } else {
            Form::<Credentials>::from_request(req, state)
                .await
                .map(|Form(creds)| creds)
                .map_err(|e| e.body_text())
        };

        Ok(parsed.unwrap_or_else(|reason| {
            tracing::debug!("Unreadable login body: {}", reason);
            Credentials::default()
        }))
    }
}

/// `Json` whose rejections come back in the same JSON error shape as every other failure.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// `Path` with JSON-shaped rejections.
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(PathParam(value))
    }
}

/// `Query` with JSON-shaped rejections.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// Value of a required body field, exactly as sent. Whitespace-only counts as missing.
pub fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn unreadable_login_body_yields_empty_credentials() {
        let bodyless = Request::builder()
            .method("POST")
            .uri("/login")
            .body(Body::empty())
            .unwrap();
        let creds = Credentials::from_request(bodyless, &()).await.unwrap();
        assert!(creds.username.is_none() && creds.password.is_none());

        let broken_json = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let creds = Credentials::from_request(broken_json, &()).await.unwrap();
        assert!(creds.username.is_none());
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; murmur_session=abc123; other=1"),
        );
        assert_eq!(cookie_value(&headers, "murmur_session"), Some("abc123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_searches_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("murmur_session=xyz"));
        assert_eq!(cookie_value(&headers, "murmur_session"), Some("xyz"));
    }

    #[test]
    fn required_keeps_value_and_rejects_blank() {
        assert_eq!(required(&Some("  hi \n".into()), "content").unwrap(), "  hi \n");
        assert!(matches!(
            required(&Some("   ".into()), "content"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(required(&None, "content"), Err(AppError::BadRequest(_))));
    }
}
