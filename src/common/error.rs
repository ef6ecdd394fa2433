use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Estoque insuficiente para '{product}': disponível {available}, solicitado {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Totais divergentes: {0}")]
    TotalsMismatch(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Falta de chave ou cliente de IA: o resto do sistema continua funcionando
    #[error("Serviço de IA indisponível: {0}")]
    AiUnavailable(String),

    #[error("Resposta inválida do serviço de IA: {0}")]
    AiResponse(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de comunicação HTTP: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let details = validation_details(&errors);
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InsufficientStock { ref product, available, requested } => {
                let body = Json(json!({
                    "error": self.to_string(),
                    "details": {
                        "product": product,
                        "available": available,
                        "requested": requested,
                    },
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ResourceNotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::TotalsMismatch(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::AiUnavailable(msg) => {
                tracing::warn!("IA indisponível: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Insights de IA indisponíveis no momento.".to_string(),
                )
            }
            AppError::AiResponse(msg) => {
                tracing::error!("Falha na resposta da IA: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Não foi possível gerar a análise com IA. Tente novamente.".to_string(),
                )
            }

            // Todo o resto vira 500; o detalhe só vai para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Achata os erros do validator em `campo -> mensagens`, descendo em listas e
/// structs aninhadas (`items[0].quantity`).
pub(crate) fn validation_details(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut details = BTreeMap::new();
    collect_details("", errors, &mut details);
    details
}

fn collect_details(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_is_a_conflict() {
        let response = AppError::InsufficientStock {
            product: "Tênis Runner".into(),
            available: 0,
            requested: 1,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_ai_key_degrades_to_service_unavailable() {
        let response = AppError::AiUnavailable("GEMINI_API_KEY ausente".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn non_admin_gets_forbidden() {
        let response = AppError::Forbidden("Somente administradores.".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn nested_item_errors_are_reported_by_path() {
        use crate::models::sale::NewSale;
        use validator::Validate;

        let sale: NewSale = serde_json::from_value(json!({
            "client": "Maria",
            "paymentMethod": "pix",
            "items": [{ "productId": uuid::Uuid::nil(), "quantity": 0 }]
        }))
        .unwrap();
        let errors = sale.validate().unwrap_err();

        let details = validation_details(&errors);
        assert!(details.contains_key("items[0].quantity"), "{:?}", details);

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_are_hidden_behind_500() {
        let response = AppError::DatabaseError(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
