pub mod health;
pub mod relay;
pub mod send;

use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(health::health_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(relay::relay_routes())
        .merge(send::send_routes())
}

/// Render a handler panic as a 500 with the panic message
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unexpected error".to_string()
    };

    AppError::Internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::mail::testing::FakeRelay;

    fn app(relay: Arc<FakeRelay>) -> Router {
        create_router(AppState::with_relay(relay))
    }

    async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn configure(app: &Router) {
        let (status, _) = post(
            app,
            "/api/config",
            &json!({
                "email_host": "smtp.example.com",
                "email_port": "465",
                "email_user": "news@example.com",
                "email_password": "secret",
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    fn send_payload(recipients: &[&str]) -> Value {
        json!({
            "recipient_emails": recipients,
            "sender_name": "Newsletter",
            "email_topic": "Monthly update",
            "email_body": "Hello from the newsletter.",
        })
    }

    #[tokio::test]
    async fn test_config_success() {
        let app = app(Arc::new(FakeRelay::default()));

        let (status, body) = post(
            &app,
            "/api/config",
            &json!({
                "email_host": "smtp.example.com",
                "email_port": 465,
                "email_user": "news@example.com",
                "email_password": "secret",
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Email configuration set successfully" })
        );
    }

    #[tokio::test]
    async fn test_config_missing_fields() {
        let app = app(Arc::new(FakeRelay::default()));

        let (status, body) = post(&app, "/api/config", r#"{"email_host": "smtp.example.com"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": r#"Missing required fields. Required: ['email_host', 'email_port', 'email_user', 'email_password']"#,
            })
        );
    }

    #[tokio::test]
    async fn test_config_rejects_malformed_json() {
        let app = app(Arc::new(FakeRelay::default()));

        let (status, body) = post(&app, "/api/config", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_send_without_config() {
        let relay = Arc::new(FakeRelay::default());
        let app = app(relay.clone());

        let (status, body) = post(
            &app,
            "/api/send",
            &send_payload(&["a@example.com"]).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!("Email configuration not set. Please configure email settings first.")
        );
        assert!(relay.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_send_missing_fields() {
        let relay = Arc::new(FakeRelay::default());
        let app = app(relay.clone());
        configure(&app).await;

        let (status, body) = post(
            &app,
            "/api/send",
            r#"{"recipient_emails": ["a@example.com"], "email_body": "Hi"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!(r#"Missing required fields. Required: ['recipient_emails', 'sender_name', 'email_topic', 'email_body']"#)
        );
        assert!(relay.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_send_reports_each_recipient() {
        let relay = Arc::new(FakeRelay::rejecting(["a@example.com"]));
        let app = app(relay.clone());
        configure(&app).await;

        let (status, body) = post(
            &app,
            "/api/send",
            &send_payload(&["a@example.com", "b@example.com"]).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["results"]["a@example.com"]["success"], json!(false));
        assert!(body["results"]["a@example.com"]["error"].is_string());
        assert_eq!(
            body["results"]["b@example.com"],
            json!({ "success": true, "error": null })
        );
        assert_eq!(
            body["summary"],
            json!({ "total": 2, "successful": 1, "failed": 1 })
        );
        assert_eq!(relay.sessions(), vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_send_summary_counts_duplicate_recipients() {
        let relay = Arc::new(FakeRelay::default());
        let app = app(relay.clone());
        configure(&app).await;

        let (status, body) = post(
            &app,
            "/api/send",
            &send_payload(&["a@example.com", "a@example.com"]).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["summary"],
            json!({ "total": 2, "successful": 2, "failed": 0 })
        );
        assert_eq!(body["results"].as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_config_accepts_whole_float_port() {
        let app = app(Arc::new(FakeRelay::default()));

        let (status, _) = post(
            &app,
            "/api/config",
            r#"{"email_host": "smtp.example.com", "email_port": 465.0, "email_user": "news@example.com", "email_password": "secret"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_send_with_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("agenda.txt");
        std::fs::File::create(&present)
            .unwrap()
            .write_all(b"1. Budget")
            .unwrap();
        let missing = dir.path().join("minutes.txt");

        let relay = Arc::new(FakeRelay::default());
        let app = app(relay.clone());
        configure(&app).await;

        let mut payload = send_payload(&["a@example.com"]);
        payload["attachment_files"] = json!([present.display().to_string()]);
        let (status, body) = post(&app, "/api/send", &payload.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"]["a@example.com"]["success"], json!(true));
        let formatted = String::from_utf8(relay.messages()[0].formatted()).unwrap();
        assert!(formatted.contains("filename=\"agenda.txt\""));

        payload["attachment_files"] = json!([
            present.display().to_string(),
            missing.display().to_string(),
        ]);
        let (status, body) = post(&app, "/api/send", &payload.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let outcome = &body["results"]["a@example.com"];
        assert_eq!(outcome["success"], json!(false));
        assert!(outcome["error"].as_str().unwrap().contains("minutes.txt"));
        assert_eq!(relay.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let app = app(Arc::new(FakeRelay::default()));
        configure(&app).await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["relay_configured"], json!(true));
    }

    #[test]
    fn test_panic_message_becomes_500() {
        let response = handle_panic(Box::new("relay exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
