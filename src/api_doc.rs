use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    AllSummariesResponse, Category, CategoryLimit, CategoryLimitRequest, CategoryLimitResponse,
    DailySummary, DailySummaryRequest, DailySummaryResponse, DashboardSummary,
    DashboardSummaryResponse, Expense, ExpensesResponse, GeneralLimitData, GeneralLimitRequest,
    GeneralLimitResponse, MonthTotals, PaymentMethod, UserSummary, WebhookData, WebhookResponse,
    WhatsAppMessage,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "finapp API",
        version = "1.0.0",
        description = "Personal finance assistant driven by WhatsApp messages, with a JSON dashboard API"
    ),
    paths(
        handlers::health::health_handler,
        handlers::webhook::receive_message_handler,
        handlers::webhook::verify_webhook_handler,
        handlers::summary::daily_summary_post_handler,
        handlers::summary::daily_summary_get_handler,
        handlers::dashboard::expenses_handler,
        handlers::dashboard::summary_handler,
        handlers::dashboard::general_limit_handler,
        handlers::dashboard::category_limit_handler
    ),
    components(
        schemas(
            Category,
            PaymentMethod,
            Expense,
            CategoryLimit,
            WhatsAppMessage,
            WebhookResponse,
            WebhookData,
            DailySummaryRequest,
            DailySummary,
            DailySummaryResponse,
            AllSummariesResponse,
            ExpensesResponse,
            UserSummary,
            MonthTotals,
            DashboardSummary,
            DashboardSummaryResponse,
            GeneralLimitRequest,
            GeneralLimitData,
            GeneralLimitResponse,
            CategoryLimitRequest,
            CategoryLimitResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "whatsapp", description = "Chat webhook and daily summaries"),
        (name = "dashboard", description = "Dashboard data and limit editing")
    )
)]
pub struct ApiDoc;
