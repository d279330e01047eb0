// src/common/error.rs

use std::collections::HashMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erro estruturado do contrato HTTP: `{message, status, errors?}`.
///
/// É o que a implementação "http" dos serviços devolve quando o backend responde
/// com um status fora da faixa 2xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status)
    }
}

// Corpo de erro que o servidor de referência envia (o status vai na linha HTTP).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Aluno não encontrado: {0}")]
    StudentNotFound(String),

    #[error("Já existe pagamento de {month} para o aluno {student_id}")]
    PaymentAlreadyExists { student_id: String, month: String },

    #[error("Mês inválido (esperado AAAA-MM): {0}")]
    InvalidMonth(String),

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Resposta não-2xx do backend remoto
    #[error("Erro da API: {0}")]
    Api(ApiError),

    #[error("Falha de comunicação com a API: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

pub type AppResult<T = ()> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::StudentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PaymentAlreadyExists { .. } => StatusCode::CONFLICT,
            AppError::Api(api) => {
                StatusCode::from_u16(api.status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::TransportError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
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
                ErrorBody {
                    message: "Um ou mais campos são inválidos.".to_string(),
                    errors: Some(details),
                }
            }
            AppError::InvalidCredentials => ErrorBody {
                message: "E-mail ou senha inválidos.".to_string(),
                errors: None,
            },
            AppError::InvalidToken => ErrorBody {
                message: "Token de autenticação inválido ou ausente.".to_string(),
                errors: None,
            },
            AppError::Api(api) => ErrorBody {
                message: api.message,
                errors: api.errors,
            },
            ref e if status.is_server_error() => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ErrorBody {
                    message: "Ocorreu um erro inesperado.".to_string(),
                    errors: None,
                }
            }
            e => ErrorBody {
                message: e.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
