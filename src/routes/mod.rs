pub mod auth;
pub mod demo;
pub mod home;
pub mod likes;
pub mod posts;
pub mod users;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Assemble every route, the JSON fallbacks and the middleware stack.
pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(home::index))
        .merge(auth::router())
        .merge(posts::router())
        .merge(likes::router())
        .merge(users::router());

    if state.config.demo.enabled {
        tracing::warn!("Demo routes enabled: /demo/* accepts unauthenticated writes");
        app = app.merge(demo::router());
    }

    let mut app = app
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.server) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    let origin = server.cors_origin.as_deref()?;
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        Err(_) => {
            tracing::warn!("Ignoring invalid cors_origin {:?}", origin);
            None
        }
    }
}
