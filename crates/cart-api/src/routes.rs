//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /api/create_preference - Create a Mercado Pago preference
/// - everything else - static storefront files from `STATIC_DIR`
pub fn create_router(state: AppState) -> Router {
    // The storefront may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route("/create_preference", post(handlers::create_preference));

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .fallback_service(static_files)
        // Middleware
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cart_core::{CheckoutResult, PaymentStrategy, PreferenceCreated, PreferenceRequest};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedPayments;

    #[async_trait]
    impl PaymentStrategy for FixedPayments {
        async fn create_preference(
            &self,
            _request: &PreferenceRequest,
        ) -> CheckoutResult<PreferenceCreated> {
            Ok(PreferenceCreated {
                id: "pref-1".into(),
                init_point: "https://mp.example/init".into(),
                sandbox_init_point: None,
            })
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn router() -> Router {
        let mut config = AppConfig::new("http://localhost:3001");
        config.static_dir = "does-not-exist".into();
        create_router(AppState::with_strategies(config, Arc::new(FixedPayments), None))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_preference_requires_post() {
        let response = router()
            .oneshot(
                Request::get("/api/create_preference")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_static_file() {
        let response = router()
            .oneshot(Request::get("/nope.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/create_preference")
                    .header("origin", "https://shop.example.mx")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
