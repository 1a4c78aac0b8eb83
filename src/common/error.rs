use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Entidades escopadas por organização. O nome entra na mensagem de
/// "não encontrado" — a mesma mensagem para linha inexistente e linha de
/// outro tenant, para não vazar a existência de dados alheios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product,
    Client,
    Order,
}

impl Entity {
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Product => "Produto",
            Entity::Client => "Cliente",
            Entity::Order => "Pedido",
        }
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Argumento inválido: {0}")]
    InvalidArgument(&'static str),

    #[error("{} não encontrado", .0.label())]
    NotFound(Entity),

    #[error("Estoque insuficiente: disponível {available}, solicitado {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    // Variante para erros de banco de dados. Transação abortada, conflito,
    // timeout: tudo sobe como falha genérica re-tentável, nunca aplicada
    // pela metade.
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
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
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidArgument(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{} não encontrado.", entity.label()) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::InsufficientStock { available, requested } => {
                let body = Json(json!({
                    "error": "Estoque de cozinha insuficiente para a transferência.",
                    "available": available,
                    "requested": requested,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Converte o resultado de um lookup escopado em `NotFound` uniforme.
/// Todo acessor de entidade passa por aqui: ausência e posse por outro
/// tenant são indistinguíveis para o chamador.
pub fn require_found<T>(row: Option<T>, entity: Entity) -> Result<T, AppError> {
    row.ok_or(AppError::NotFound(entity))
}
