//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{generate, health};
use crate::config::Settings;
use crate::middleware::logging::log_request;
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    Router::new()
        .route("/generate", post(generate::generate))
        .merge(health_routes)
        // Apply middleware layers (order matters: first added = outermost = runs first)
        .layer(create_cors_layer(&state.settings))
        // Custom request logging with trace IDs
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create CORS layer restricted to the single configured origin
fn create_cors_layer(settings: &Settings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match settings.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                origin = %settings.allowed_origin,
                "Invalid allowed origin; cross-origin requests will be rejected"
            );
            layer
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::generate::{ALL_KEYS_FAILED, MISSING_PROMPT, NO_KEYS_CONFIGURED};
    use crate::services::dispatcher::{BackendFault, Dispatcher, GenerateBackend};
    use crate::services::key_pool::{ApiKey, KeyPool};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use std::time::Instant;
    use tower::ServiceExt;

    /// Backend double that answers every attempt with a fixed outcome
    struct FixedBackend(Result<String, String>);

    #[async_trait]
    impl GenerateBackend for FixedBackend {
        async fn generate(&self, _key: &ApiKey, _prompt: &str) -> Result<String, BackendFault> {
            self.0.clone().map_err(BackendFault)
        }
    }

    fn test_router(backend: FixedBackend, keys: &[&str]) -> Router {
        let pool = KeyPool::from_raw(keys.iter().map(|k| k.to_string()));
        let state = AppState {
            settings: Arc::new(Settings::default()),
            dispatcher: Arc::new(Dispatcher::new(Arc::new(backend), pool)),
            start_time: Instant::now(),
        };
        create_router(state)
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let router = test_router(FixedBackend(Ok("A telescope kit".to_string())), &["key-1"]);

        let response = router
            .oneshot(post_generate(r#"{"prompt": "Suggest a gift"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"result": "A telescope kit"}));
    }

    #[tokio::test]
    async fn test_generate_missing_prompt_is_http_200() {
        let router = test_router(FixedBackend(Ok("unused".to_string())), &["key-1"]);

        let response = router.oneshot(post_generate("{}")).await.unwrap();

        // Logical errors keep status 200; the body carries the error
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], MISSING_PROMPT);
    }

    #[tokio::test]
    async fn test_generate_blank_prompt_is_rejected() {
        let router = test_router(FixedBackend(Ok("unused".to_string())), &["key-1"]);

        let response = router
            .oneshot(post_generate(r#"{"prompt": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], MISSING_PROMPT);
    }

    #[tokio::test]
    async fn test_generate_without_keys() {
        let router = test_router(FixedBackend(Ok("unused".to_string())), &[]);

        let response = router
            .oneshot(post_generate(r#"{"prompt": "Suggest a gift"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], NO_KEYS_CONFIGURED);
    }

    #[tokio::test]
    async fn test_generate_all_keys_failed() {
        let router = test_router(
            FixedBackend(Err("API key not valid".to_string())),
            &["key-1", "key-2"],
        );

        let response = router
            .oneshot(post_generate(r#"{"prompt": "Suggest a gift"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], ALL_KEYS_FAILED);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = test_router(FixedBackend(Ok("unused".to_string())), &["key-1"]);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_key_state() {
        let router = test_router(FixedBackend(Ok("unused".to_string())), &[]);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ready"], true);
        assert_eq!(json["checks"]["api_keys_configured"], false);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let router = test_router(FixedBackend(Ok("ok".to_string())), &["key-1"]);

        let mut request = post_generate(r#"{"prompt": "hi"}"#);
        request
            .headers_mut()
            .insert(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"));

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("http://localhost:3000")
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_other_origins() {
        let router = test_router(FixedBackend(Ok("ok".to_string())), &["key-1"]);

        let mut request = post_generate(r#"{"prompt": "hi"}"#);
        request
            .headers_mut()
            .insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));

        let response = router.oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
