// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Produto ---
// O catálogo do tenant. O preço aqui é o preço "vivo": pedidos copiam
// o valor vigente para o item no momento da criação (retrato histórico).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub price: Decimal,

    // Estoque em dois estágios: produzido na cozinha vs. pronto para entrega.
    // Os dois contadores nunca ficam negativos (CHECK no banco + validação).
    pub stock_kitchen: i32,
    pub stock_delivery: i32,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
