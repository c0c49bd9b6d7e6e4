use crate::error::{ApiError, ErrorResponse};
use crate::handlers::non_blank;
use crate::models::{
    AllSummariesResponse, DailySummary, DailySummaryRequest, DailySummaryResponse, PhoneQuery,
};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

async fn summary_for(state: &AppState, phone: String) -> Result<DailySummary, ApiError> {
    let resumo = state.service.daily_summary(&phone).await?;
    Ok(DailySummary {
        telefone: phone,
        resumo,
    })
}

/// POST /api/whatsapp/enviar-resumo-diario handler - Daily summaries
///
/// `{"telefone": "..."}` builds the summary of one user, `{"todos": true}`
/// builds one per known user. Meant to be triggered by an external scheduler.
#[utoipa::path(
    post,
    path = routes::DAILY_SUMMARY,
    request_body = DailySummaryRequest,
    responses(
        (status = 200, description = "Summary for one user, or an AllSummariesResponse when \"todos\" is set", body = DailySummaryResponse),
        (status = 400, description = "Neither \"telefone\" nor \"todos\" given", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "whatsapp"
)]
pub async fn daily_summary_post_handler(
    State(state): State<AppState>,
    Json(body): Json<DailySummaryRequest>,
) -> Result<Response, ApiError> {
    if body.todos == Some(true) {
        let users = state.service.list_users().await;
        let mut data = Vec::with_capacity(users.len());
        for user in users {
            data.push(summary_for(&state, user.phone).await?);
        }

        tracing::info!("Generated daily summaries for {} users", data.len());
        let response = AllSummariesResponse {
            success: true,
            message: format!("{} resumos gerados com sucesso", data.len()),
            data,
        };
        return Ok((StatusCode::OK, Json(response)).into_response());
    }

    let Some(phone) = non_blank(body.telefone) else {
        return Err(ApiError::InvalidRequest(
            "Parâmetro \"telefone\" ou \"todos\" é obrigatório".to_string(),
        ));
    };

    let data = summary_for(&state, phone).await?;
    tracing::info!("Generated daily summary for {}", data.telefone);
    let response = DailySummaryResponse {
        success: true,
        message: "Resumo gerado com sucesso".to_string(),
        data,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// GET /api/whatsapp/enviar-resumo-diario handler - Daily summary of one user
#[utoipa::path(
    get,
    path = routes::DAILY_SUMMARY,
    params(PhoneQuery),
    responses(
        (status = 200, description = "Summary generated", body = DailySummaryResponse),
        (status = 400, description = "Missing \"telefone\"", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "whatsapp"
)]
pub async fn daily_summary_get_handler(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> Result<(StatusCode, Json<DailySummaryResponse>), ApiError> {
    let Some(phone) = non_blank(query.telefone) else {
        return Err(ApiError::InvalidRequest(
            "Parâmetro \"telefone\" é obrigatório na query string".to_string(),
        ));
    };

    let data = summary_for(&state, phone).await?;
    tracing::info!("Generated daily summary for {}", data.telefone);
    Ok((
        StatusCode::OK,
        Json(DailySummaryResponse {
            success: true,
            message: "Resumo gerado com sucesso".to_string(),
            data,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{get, json_body, post_json, send, setup_test_app};
    use crate::models::{Category, PaymentMethod};
    use serde_json::json;

    const SUMMARY: &str = "/api/whatsapp/enviar-resumo-diario";

    #[tokio::test]
    async fn test_summary_for_one_phone() {
        let (_dir, state, app) = setup_test_app().await;
        state
            .service
            .add_expense("5511", 120.0, Category::Transporte, PaymentMethod::Pix, "uber")
            .await
            .unwrap();

        let response = send(&app, post_json(SUMMARY, json!({"telefone": "5511"}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: DailySummaryResponse = json_body(response).await;
        assert!(body.success);
        assert_eq!(body.data.telefone, "5511");
        assert!(body.data.resumo.contains("💰 Total gasto: R$ 120,00"));
        assert!(body.data.resumo.contains("🥇 Transporte"));
        assert!(body.data.resumo.contains("💡 DICA DE ECONOMIA"));
    }

    #[tokio::test]
    async fn test_summary_for_all_users() {
        let (_dir, state, app) = setup_test_app().await;
        state.service.get_or_create_user("1").await.unwrap();
        state.service.get_or_create_user("2").await.unwrap();

        let response = send(&app, post_json(SUMMARY, json!({"todos": true}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: AllSummariesResponse = json_body(response).await;
        let phones: Vec<&str> = body.data.iter().map(|s| s.telefone.as_str()).collect();
        assert_eq!(phones, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_summary_requires_phone_or_all() {
        let (_dir, _state, app) = setup_test_app().await;

        let response = send(&app, post_json(SUMMARY, json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, post_json(SUMMARY, json!({"todos": false}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = json_body(response).await;
        assert!(body.message.contains("telefone"));
    }

    #[tokio::test]
    async fn test_summary_get() {
        let (_dir, _state, app) = setup_test_app().await;

        let response = send(&app, get(&format!("{SUMMARY}?telefone=5599"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: DailySummaryResponse = json_body(response).await;
        assert!(body.data.resumo.contains("Você ainda não definiu um limite mensal"));

        let response = send(&app, get(SUMMARY)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
