use crate::chat;
use crate::error::{ApiError, ErrorResponse};
use crate::handlers::non_blank;
use crate::models::{VerifyQuery, WebhookData, WebhookResponse, WhatsAppMessage};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

/// POST /api/whatsapp/webhook handler - Process a chat command
///
/// Parses the message text, applies the command for the sender's phone
/// number and returns the reply to send back.
#[utoipa::path(
    post,
    path = routes::WHATSAPP_WEBHOOK,
    request_body = WhatsAppMessage,
    responses(
        (status = 200, description = "Message processed", body = WebhookResponse),
        (status = 400, description = "Missing \"from\" or \"text\"", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse)
    ),
    tag = "whatsapp"
)]
pub async fn receive_message_handler(
    State(state): State<AppState>,
    Json(body): Json<WhatsAppMessage>,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    let (Some(phone), Some(text)) = (non_blank(body.from), non_blank(body.text)) else {
        return Err(ApiError::InvalidRequest(
            "Requisição inválida. É necessário fornecer \"from\" e \"text\".".to_string(),
        ));
    };

    let reply = chat::handle_message(&state.service, &phone, &text)
        .await
        .map_err(ApiError::MessageProcessing)?;

    tracing::info!(
        "Handled '{}' command from {}",
        reply.command.as_str(),
        phone
    );
    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            success: true,
            message: reply.message,
            data: WebhookData {
                command: reply.command.as_str().to_string(),
                user_id: phone,
            },
        }),
    ))
}

/// GET /api/whatsapp/webhook handler - Subscription handshake
///
/// Echoes `hub.challenge` when `hub.mode` is `subscribe` and the token
/// matches the configured one.
#[utoipa::path(
    get,
    path = routes::WHATSAPP_WEBHOOK,
    params(VerifyQuery),
    responses(
        (status = 200, description = "Challenge echoed", body = String),
        (status = 403, description = "Invalid verify token", body = ErrorResponse)
    ),
    tag = "whatsapp"
)]
pub async fn verify_webhook_handler(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<(StatusCode, String), ApiError> {
    let subscribing = query.mode.as_deref() == Some("subscribe");
    let token_matches = query.verify_token.as_deref() == Some(state.config.verify_token.as_str());

    if subscribing && token_matches {
        tracing::info!("Webhook verified");
        Ok((StatusCode::OK, query.challenge.unwrap_or_default()))
    } else {
        tracing::warn!("Webhook verification rejected (mode: {:?})", query.mode);
        Err(ApiError::InvalidVerifyToken)
    }
}
