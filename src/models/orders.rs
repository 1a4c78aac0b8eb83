// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Enums ---
// Os literais do banco são sem acento de propósito: comparação de enum
// fechado, nunca de string acentuada.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pendente,
    EmPreparo,
    Pronto,
    Concluido,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    Cartao,
}

/// Política de remoção, explícita por operação: o `remove` de um pedido é
/// sempre soft (deleted_at), o `remove_all` administrativo apaga de verdade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    Soft,
    Hard,
}

// --- Structs de Operação ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub organization_id: i64,
    pub user_id: i64,
    pub client_id: Option<i64>,
    pub status: OrderStatus,
    // Sempre calculado pelo servidor: Σ(price * quantity) * sobretaxa.
    pub total: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    // Retrato do preço unitário na criação; imutável depois de gravado.
    pub price: Decimal,
}

// Pedido completo como sai para o chamador: cabeçalho + itens + cliente.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub client_name: Option<String>,
    pub items: Vec<OrderItem>,
}
