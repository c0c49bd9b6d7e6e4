use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    Category, CategoryLimitRequest, CategoryLimitResponse, DashboardSummary,
    DashboardSummaryResponse, ExpensesQuery, ExpensesResponse, GeneralLimitData,
    GeneralLimitRequest, GeneralLimitResponse, MonthTotals, PhoneQuery, UserSummary,
};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

const DEFAULT_EXPENSES_LIMIT: usize = 50;

/// GET /api/dashboard/gastos handler - Current-month expenses
///
/// Newest first, at most `limit` rows (50 by default).
#[utoipa::path(
    get,
    path = routes::DASHBOARD_EXPENSES,
    params(ExpensesQuery),
    responses(
        (status = 200, description = "Expenses of the current month", body = ExpensesResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn expenses_handler(
    State(state): State<AppState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<(StatusCode, Json<ExpensesResponse>), ApiError> {
    let phone = state.phone_or_default(query.telefone);
    let limit = query.limit.unwrap_or(DEFAULT_EXPENSES_LIMIT);

    let data = state.service.recent_expenses(&phone, limit).await?;
    tracing::debug!("Listed {} expenses for {}", data.len(), phone);
    Ok((StatusCode::OK, Json(ExpensesResponse { success: true, data })))
}

/// GET /api/dashboard/resumo handler - Month totals and limits
#[utoipa::path(
    get,
    path = routes::DASHBOARD_SUMMARY,
    params(PhoneQuery),
    responses(
        (status = 200, description = "Summary of the current month", body = DashboardSummaryResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> Result<(StatusCode, Json<DashboardSummaryResponse>), ApiError> {
    let phone = state.phone_or_default(query.telefone);
    let report = state.service.monthly_report(&phone).await?;

    let data = DashboardSummary {
        usuario: UserSummary {
            id: report.user.id,
            telefone: report.user.phone,
            limite_mensal_geral: report.general_limit,
        },
        resumo: MonthTotals {
            total_mes: report.total,
            por_categoria: report.by_category,
            por_forma_pagamento: report.by_payment_method,
        },
        limites_categoria: report.category_limits,
    };
    Ok((
        StatusCode::OK,
        Json(DashboardSummaryResponse {
            success: true,
            data,
        }),
    ))
}

/// POST /api/dashboard/limite-geral handler - Set the general monthly limit
#[utoipa::path(
    post,
    path = routes::DASHBOARD_GENERAL_LIMIT,
    request_body = GeneralLimitRequest,
    responses(
        (status = 200, description = "Limit updated", body = GeneralLimitResponse),
        (status = 400, description = "Missing or negative limit", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn general_limit_handler(
    State(state): State<AppState>,
    Json(body): Json<GeneralLimitRequest>,
) -> Result<(StatusCode, Json<GeneralLimitResponse>), ApiError> {
    let Some(amount) = body.limite_mensal_geral.filter(|v| v.is_finite() && *v >= 0.0) else {
        return Err(ApiError::InvalidRequest(
            "Limite mensal inválido".to_string(),
        ));
    };

    let phone = state.phone_or_default(body.telefone);
    let user = state.service.set_general_limit(&phone, amount).await?;

    Ok((
        StatusCode::OK,
        Json(GeneralLimitResponse {
            success: true,
            message: "Limite mensal atualizado com sucesso".to_string(),
            data: GeneralLimitData {
                usuario_id: user.id,
                limite_mensal_geral: user.monthly_limit,
            },
        }),
    ))
}

/// POST /api/dashboard/limite-categoria handler - Set one category's limit
///
/// Accepts the stored category names and their accented labels.
#[utoipa::path(
    post,
    path = routes::DASHBOARD_CATEGORY_LIMIT,
    request_body = CategoryLimitRequest,
    responses(
        (status = 200, description = "Limit created or updated", body = CategoryLimitResponse),
        (status = 400, description = "Unknown category or invalid amount", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn category_limit_handler(
    State(state): State<AppState>,
    Json(body): Json<CategoryLimitRequest>,
) -> Result<(StatusCode, Json<CategoryLimitResponse>), ApiError> {
    let category = body
        .categoria
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok());
    let amount = body.valor_limite.filter(|v| v.is_finite() && *v >= 0.0);
    let (Some(category), Some(amount)) = (category, amount) else {
        return Err(ApiError::InvalidRequest(
            "Categoria ou valor inválido".to_string(),
        ));
    };

    let phone = state.phone_or_default(body.telefone);
    let limit = state
        .service
        .set_category_limit(&phone, category, amount)
        .await?;

    Ok((
        StatusCode::OK,
        Json(CategoryLimitResponse {
            success: true,
            message: format!("Limite da categoria {} atualizado com sucesso", category),
            data: limit,
        }),
    ))
}
