// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::identity::IdentityContext};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockAmountPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser um inteiro positivo."))]
    pub amount: i32,
}

/// Produção: entrada no estoque de cozinha.
pub async fn produce(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(product_id): Path<i64>,
    Json(payload): Json<StockAmountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .produce(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            product_id,
            payload.amount,
        )
        .await?;
    Ok(Json(product))
}

/// Transferência cozinha → entrega. Falha sem efeito parcial quando a
/// cozinha não cobre a quantidade.
pub async fn transfer(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(product_id): Path<i64>,
    Json(payload): Json<StockAmountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .transfer(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            product_id,
            payload.amount,
        )
        .await?;
    Ok(Json(product))
}

/// Entrada direta no estoque de entrega (compras externas, ex.: bebidas).
pub async fn add_delivery_stock(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(product_id): Path<i64>,
    Json(payload): Json<StockAmountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .add_delivery_stock(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            product_id,
            payload.amount,
        )
        .await?;
    Ok(Json(product))
}
