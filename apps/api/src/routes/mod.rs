pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers::handle_list_diets;
use crate::export::handlers::handle_export_menu;
use crate::pipeline::handlers::handle_create_menus;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/diets", get(handle_list_diets))
        // Menu API
        .route("/api/v1/menus", post(handle_create_menus))
        .route("/api/v1/menus/export", post(handle_export_menu))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::structured::{parse_completion, Schema};
    use crate::models::menu::MenuList;
    use crate::state::test_state;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_diets_in_ukrainian() {
        let response = build_router(test_state())
            .oneshot(
                Request::get("/api/v1/diets?lang=uk")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let diets = body.as_array().unwrap();
        assert_eq!(diets.len(), 16);
        assert_eq!(diets[0]["index"], 0);
        assert_eq!(diets[0]["diet_name"], "Дієта № 1");
    }

    #[tokio::test]
    async fn test_create_menus_rejects_empty_text() {
        let response = build_router(test_state())
            .oneshot(post_json(
                "/api/v1/menus",
                json!({"request_text": "  ", "api_key": "sk-test"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "VALIDATION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_create_menus_requires_well_formed_key() {
        let response = build_router(test_state())
            .oneshot(post_json(
                "/api/v1/menus",
                json!({"request_text": "I have gastritis", "api_key": "not-a-key"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_menus_rejects_unknown_language() {
        let response = build_router(test_state())
            .oneshot(post_json(
                "/api/v1/menus",
                json!({"request_text": "I have gastritis", "language": "fr", "api_key": "sk-test"}),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let menu = parse_completion::<MenuList>(MenuList::SHAPE)
            .unwrap()
            .menus
            .remove(0);
        let response = build_router(test_state())
            .oneshot(post_json(
                "/api/v1/menus/export",
                json!({"menu": menu, "diet_name": "Diet No. 1", "filename": "../week 1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"week_1.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_rejects_menu_without_meals() {
        let response = build_router(test_state())
            .oneshot(post_json(
                "/api/v1/menus/export",
                json!({"menu": {"meals": [], "total_price": 0, "currency": "UAH"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
