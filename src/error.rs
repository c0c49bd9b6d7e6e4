use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Maps each failure to an HTTP status code and a `{success: false,
/// message}` JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid request field
    InvalidRequest(String),
    /// Webhook subscription handshake with a wrong token or mode
    InvalidVerifyToken,
    /// Store read or write failure
    StorageError(anyhow::Error),
    /// Failure while handling a chat message
    MessageProcessing(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidVerifyToken => (
                StatusCode::FORBIDDEN,
                "Token de verificação inválido".to_string(),
            ),
            ApiError::StorageError(err) => {
                tracing::error!("Storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Erro ao acessar os dados: {}", err),
                )
            }
            ApiError::MessageProcessing(err) => {
                tracing::error!("Failed to process webhook message: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno ao processar mensagem.".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StorageError(err)
    }
}
