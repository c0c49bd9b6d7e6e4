pub mod health;
pub mod webhook;
pub mod summary;
pub mod dashboard;

pub use health::health_handler;
pub use webhook::{receive_message_handler, verify_webhook_handler};
pub use summary::{daily_summary_get_handler, daily_summary_post_handler};
pub use dashboard::{category_limit_handler, expenses_handler, general_limit_handler, summary_handler};

/// Trimmed value, or `None` when missing or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::service::FinanceService;
    use crate::state::AppState;
    use crate::store::JsonStore;
    use axum::{
        body::Body,
        http::{Request, Response},
        Router,
    };
    use serde::de::DeserializeOwned;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    pub const DEFAULT_PHONE: &str = "5511999999999";
    pub const VERIFY_TOKEN: &str = "test-verify-token";

    pub fn test_config(data_file: PathBuf) -> Config {
        Config {
            data_file,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            verify_token: VERIFY_TOKEN.to_string(),
            default_phone: DEFAULT_PHONE.to_string(),
        }
    }

    /// Full router backed by a data file inside a fresh temp dir
    pub async fn setup_test_app() -> (TempDir, AppState, Router) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = test_config(dir.path().join("finapp-data.json"));
        let store = JsonStore::from_config(&config)
            .await
            .expect("Failed to open store");

        let state = AppState {
            service: FinanceService::new(store),
            config: Arc::new(config),
        };
        let app = crate::routes::router(state.clone());
        (dir, state, app)
    }

    pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
        app.clone().oneshot(request).await.unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    pub async fn text_body(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}
