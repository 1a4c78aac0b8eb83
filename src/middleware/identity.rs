// src/middleware/identity.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::common::error::AppError;

// A autenticação acontece em um colaborador externo (gateway); aqui só
// recebemos o par já autenticado via cabeçalhos.
const USER_ID_HEADER: &str = "x-user-id";
const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

/// O contexto de identidade de toda operação do núcleo: quem pediu
/// (user_id) e de qual tenant (organization_id).
#[derive(Debug, Clone, Copy)]
pub struct IdentityContext {
    pub user_id: i64,
    pub organization_id: i64,
}

fn parse_id_header(parts: &Parts, name: &'static str) -> Result<i64, AppError> {
    let value = parts
        .headers
        .get(name)
        .ok_or(AppError::InvalidArgument("Cabeçalho de identidade ausente."))?;

    let value_str = value
        .to_str()
        .map_err(|_| AppError::InvalidArgument("Cabeçalho de identidade contém caracteres inválidos."))?;

    value_str
        .parse::<i64>()
        .map_err(|_| AppError::InvalidArgument("Cabeçalho de identidade não é um id numérico."))
}

impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parse_id_header(parts, USER_ID_HEADER)?;
        let organization_id = parse_id_header(parts, ORGANIZATION_ID_HEADER)?;

        Ok(IdentityContext {
            user_id,
            organization_id,
        })
    }
}
