// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::identity::IdentityContext};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub price: Decimal,

    // Estoque inicial entra direto na cozinha; ausente assume 0.
    #[serde(default)]
    pub initial_stock: i32,
}

pub async fn create_product(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.price.is_sign_negative() {
        return Err(AppError::InvalidArgument("O preço não pode ser negativo."));
    }

    let product = app_state
        .inventory_service
        .create_product(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            &payload.name,
            payload.price,
            payload.initial_stock,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(app_state): State<AppState>,
    identity: IdentityContext,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .inventory_service
        .list_products(identity.organization_id)
        .await?;
    Ok(Json(products))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventory_service
        .remove_product(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            product_id,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
