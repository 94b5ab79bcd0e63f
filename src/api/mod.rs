//! API Routes for the marketplace
//!
//! This module combines all API routes into a single router and applies
//! the middleware stack shared by every route.

mod categories;
mod images;
mod items;
pub mod status;

use std::any::Any;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{AppState, Error, Result};

/// Build the API router.
///
/// Route structure:
/// - / and /health - Greeting and health check
/// - /items, /items/:id - Item upload and retrieval
/// - /categories - Category creation and listing
/// - /image/:image_filename - Content-addressed image download
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .merge(items::routes())
        .merge(categories::routes())
        .merge(images::routes())
}

/// Build the complete application: routes, state and middleware.
pub fn app(state: AppState, front_url: &str) -> Result<Router> {
    let upload_limit = state.upload_limit;
    let router = routes().with_state(state);
    with_middleware(router, front_url, upload_limit)
}

/// Apply the shared middleware stack to a router.
///
/// Layers, outermost first: CORS, request tracing, panic recovery,
/// body size limit.
pub fn with_middleware(router: Router, front_url: &str, upload_limit: usize) -> Result<Router> {
    Ok(router
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(front_url)?))
}

/// CORS policy allowing a single front-end origin.
///
/// The allow-origin header is only echoed back to requests from that origin.
fn cors_layer(front_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(front_url)
        .map_err(|e| Error::Internal(format!("Invalid FRONT_URL {:?}: {}", front_url, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE]))
}

/// Convert a handler panic into a 500 JSON response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    Error::Internal(format!("Handler panicked: {}", detail)).into_response()
}

/// Map a multipart read failure to an API error.
pub(crate) fn multipart_error(err: MultipartError, upload_limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::FileTooLarge {
            max_size: upload_limit,
        }
    } else {
        Error::InvalidInput(format!("Failed to read multipart form: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::Value;

    fn panicking_app() -> Router {
        let router = Router::new()
            .route("/boom", get(|| async { panic!("boom") as () }))
            .route("/ok", get(|| async { "ok" }));
        with_middleware(router, "http://localhost:3000", 1024).unwrap()
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let server = TestServer::new(panicking_app()).unwrap();

        let response = server.get("/boom").await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body["message"].as_str().unwrap().contains("boom"));

        // The server keeps serving after a panic
        server.get("/ok").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_cors_allows_front_url() {
        let server = TestServer::new(panicking_app()).unwrap();

        let response = server
            .get("/ok")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await;

        assert_eq!(
            response
                .headers()
                .get(axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let server = TestServer::new(panicking_app()).unwrap();

        let response = server
            .get("/ok")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://evil.example.com"),
            )
            .await;

        assert!(response
            .headers()
            .get(axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight_lists_allowed_methods() {
        let server = TestServer::new(panicking_app()).unwrap();

        let response = server
            .method(Method::OPTIONS, "/ok")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .add_header(
                axum::http::header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("PUT"),
            )
            .await;

        response.assert_status_ok();
        let allowed = response
            .headers()
            .get(axum::http::header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "PUT", "POST", "DELETE"] {
            assert!(allowed.contains(method), "{} missing from {}", method, allowed);
        }
        assert!(!allowed.contains("PATCH"));
    }

    #[test]
    fn test_invalid_front_url_is_rejected() {
        assert!(cors_layer("http://bad\nurl").is_err());
    }
}
