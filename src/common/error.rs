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

    // CPF mal formatado é rejeitado antes de qualquer consulta
    #[error("{0}")]
    InvalidCpf(&'static str),

    #[error("{0}")]
    BadRequest(String),

    // Mensagem genérica: não distingue "usuário inexistente" de "senha errada"
    #[error("CPF ou senha incorretos.")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} não encontrado(a).")]
    ResourceNotFound(String),

    #[error("Encomenda já retirada.")]
    PickupAlreadyConfirmed,

    #[error("Encomenda cancelada.")]
    DeliveryCancelled,

    #[error("{0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidCpf(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PickupAlreadyConfirmed
            | AppError::DeliveryCancelled
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converte violação de chave única em um erro mais amigável; o resto vira DatabaseError.
pub fn map_unique_violation(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message.into());
        }
    }
    AppError::DatabaseError(e)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),

            // Erros 500 (DatabaseError, InternalServerError, ...) não vazam detalhes.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            e => e.to_string(),
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::InvalidCpf("CPF inválido."), StatusCode::BAD_REQUEST)]
    #[case(AppError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(AppError::PickupAlreadyConfirmed, StatusCode::CONFLICT)]
    #[case(AppError::ResourceNotFound("Entrega".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Forbidden("Sem acesso".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::InternalServerError(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_errors_to_http_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn credentials_error_is_generic() {
        assert_eq!(AppError::InvalidCredentials.to_string(), "CPF ou senha incorretos.");
    }
}
