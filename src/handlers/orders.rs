// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::identity::IdentityContext,
    models::orders::{OrderStatus, PaymentMethod},
    services::order_service::{NewOrder, OrderPatch},
    services::pricing::ItemRequest,
};

// ---
// Payloads
// ---

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: i64,

    #[validate(range(min = 1, message = "A quantidade deve ser um inteiro positivo."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."), nested)]
    pub items: Vec<OrderItemPayload>,

    pub client_id: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub status: Option<OrderStatus>,
    pub client_id: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,

    // Itens presentes = substituição integral da lista.
    #[validate(nested)]
    pub items: Option<Vec<OrderItemPayload>>,
}

fn to_item_requests(items: &[OrderItemPayload]) -> Vec<ItemRequest> {
    items
        .iter()
        .map(|i| ItemRequest {
            product_id: i.product_id,
            quantity: i.quantity,
        })
        .collect()
}

// ---
// Handlers
// ---

pub async fn create_order(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_order = NewOrder {
        items: to_item_requests(&payload.items),
        client_id: payload.client_id,
        payment_method: payload.payment_method,
        delivery_date: payload.delivery_date,
        observations: payload.observations,
    };

    let detail = app_state
        .order_service
        .create(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            new_order,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn list_orders(
    State(app_state): State<AppState>,
    identity: IdentityContext,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .order_service
        .find_all(identity.organization_id)
        .await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .order_service
        .find_one(identity.organization_id, order_id)
        .await?;
    Ok(Json(detail))
}

pub async fn update_order(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(order_id): Path<i64>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = OrderPatch {
        status: payload.status,
        client_id: payload.client_id,
        payment_method: payload.payment_method,
        delivery_date: payload.delivery_date,
        observations: payload.observations,
        items: payload.items.as_deref().map(to_item_requests),
    };

    let detail = app_state
        .order_service
        .update(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            order_id,
            patch,
        )
        .await?;

    Ok(Json(detail))
}

pub async fn delete_order(
    State(app_state): State<AppState>,
    identity: IdentityContext,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .order_service
        .remove(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
            order_id,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all_orders(
    State(app_state): State<AppState>,
    identity: IdentityContext,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state
        .order_service
        .remove_all(
            &app_state.db_pool,
            identity.organization_id,
            identity.user_id,
        )
        .await?;
    Ok(Json(serde_json::json!({ "removidos": removed })))
}
