// Route path constants - single source of truth for all API paths

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const WHATSAPP_WEBHOOK: &str = "/api/whatsapp/webhook";
pub const DAILY_SUMMARY: &str = "/api/whatsapp/enviar-resumo-diario";
pub const DASHBOARD_EXPENSES: &str = "/api/dashboard/gastos";
pub const DASHBOARD_SUMMARY: &str = "/api/dashboard/resumo";
pub const DASHBOARD_GENERAL_LIMIT: &str = "/api/dashboard/limite-geral";
pub const DASHBOARD_CATEGORY_LIMIT: &str = "/api/dashboard/limite-categoria";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            WHATSAPP_WEBHOOK,
            post(handlers::receive_message_handler).get(handlers::verify_webhook_handler),
        )
        .route(
            DAILY_SUMMARY,
            post(handlers::daily_summary_post_handler).get(handlers::daily_summary_get_handler),
        )
        .route(DASHBOARD_EXPENSES, get(handlers::expenses_handler))
        .route(DASHBOARD_SUMMARY, get(handlers::summary_handler))
        .route(DASHBOARD_GENERAL_LIMIT, post(handlers::general_limit_handler))
        .route(DASHBOARD_CATEGORY_LIMIT, post(handlers::category_limit_handler))
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
