mod admin;
pub mod error;
mod questionnaire;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/therapists", get(admin::list_therapists))
        .route("/stats", get(admin::get_stats));

    let questionnaire_routes = Router::new()
        .route("/questions", get(questionnaire::list_questions))
        .route("/health", get(questionnaire::health));

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/admin", admin_routes)
        .nest("/api/questionnaire", questionnaire_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "API is running",
    })
}


#[cfg(test)]
mod tests {
    use super::testing::{get_json, state_with};
    use crate::store::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(state_with(MemoryStore::new()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "message": "API is running"}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = super::create_router(state_with(MemoryStore::new()))
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_is_allowed() {
        let response = super::create_router(state_with(MemoryStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/admin/therapists")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
