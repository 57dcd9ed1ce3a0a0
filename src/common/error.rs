// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Ação de ciclo de vida que não existe a partir do estado atual
    #[error("Transição inválida: '{action}' não é permitida a partir de '{from}'")]
    InvalidTransition { from: String, action: String },

    #[error("Um motivo é obrigatório para '{0}'")]
    MissingReason(String),

    #[error("Permissão negada")]
    PermissionDenied,

    #[error("Plano desconhecido: {0}")]
    UnknownPlan(String),

    #[error("Configuração de alertas inválida: {0}")]
    InvalidSettings(String),

    #[error("A atualização '{update}' não se aplica à categoria '{category}'")]
    ServiceShapeMismatch { category: String, update: String },

    #[error("Fornecedor não encontrado")]
    SupplierNotFound,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Falha no codec de campo: {0}")]
    Codec(String),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_transition(from: impl Into<String>, action: impl Into<String>) -> Self {
        AppError::InvalidTransition {
            from: from.into(),
            action: action.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidSettings(_)
            | AppError::MissingReason(_)
            | AppError::ServiceShapeMismatch { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::UnknownPlan(_) | AppError::SupplierNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Codec(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Retorna todos os detalhes da validação, campo a campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        // O `tracing` loga a mensagem detalhada; o cliente recebe uma genérica.
        let message = if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
