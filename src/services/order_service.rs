// src/services/order_service.rs
//
// O processador transacional de pedidos: resolve o catálogo, calcula o
// total (com sobretaxa de pagamento) e persiste pedido + itens como uma
// unidade indivisível. Qualquer violação de posse aborta a transação
// inteira, sem escrita parcial.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::audit::{AuditAction, AuditEmitter},
    common::error::{AppError, Entity, require_found},
    db::{ClientRepository, OrderRepository, ProductRepository},
    models::orders::{DeletionPolicy, OrderDetail, OrderStatus, PaymentMethod},
    services::pricing::{self, ItemRequest, LineSnapshot},
};

/// Pedido novo, já tipado e validado na borda.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<ItemRequest>,
    pub client_id: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
}

/// Alteração de pedido. Campo ausente = inalterado. Itens presentes
/// disparam a substituição integral e o recálculo do total; ausentes,
/// total e itens ficam exatamente como estavam.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub client_id: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub observations: Option<String>,
    pub items: Option<Vec<ItemRequest>>,
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    product_repo: ProductRepository,
    client_repo: ClientRepository,
    audit: Arc<dyn AuditEmitter>,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        product_repo: ProductRepository,
        client_repo: ClientRepository,
        audit: Arc<dyn AuditEmitter>,
    ) -> Self {
        Self {
            repo,
            product_repo,
            client_repo,
            audit,
        }
    }

    /// Resolver de retratos do catálogo: busca os produtos referenciados
    /// (escopados à organização) numa leitura só e copia o preço vigente
    /// para cada linha. Id inexistente e id de outro tenant caem na mesma
    /// conferência de contagem — ambos viram NotFound.
    async fn resolve_items(
        &self,
        conn: &mut PgConnection,
        organization_id: i64,
        requests: &[ItemRequest],
    ) -> Result<(Vec<LineSnapshot>, Decimal), AppError> {
        pricing::validate_requests(requests)?;

        let distinct: HashSet<i64> = requests.iter().map(|r| r.product_id).collect();
        let ids: Vec<i64> = distinct.iter().copied().collect();

        let products = self
            .product_repo
            .find_for_order(&mut *conn, organization_id, &ids)
            .await?;

        if products.len() != distinct.len() {
            return Err(AppError::NotFound(Entity::Product));
        }

        let by_id = products.into_iter().map(|p| (p.id, p)).collect();
        Ok(pricing::build_snapshots(requests, &by_id))
    }

    // --- CREATE ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        new_order: NewOrder,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (lines, subtotal) = self
            .resolve_items(&mut tx, organization_id, &new_order.items)
            .await?;

        // Cliente é opcional, mas se veio precisa pertencer à organização.
        let client = match new_order.client_id {
            Some(client_id) => Some(require_found(
                self.client_repo
                    .find_scoped(&mut *tx, organization_id, client_id)
                    .await?,
                Entity::Client,
            )?),
            None => None,
        };

        let total = pricing::order_total(subtotal, new_order.payment_method);

        let order = self
            .repo
            .insert_order(
                &mut *tx,
                organization_id,
                user_id,
                new_order.client_id,
                total,
                new_order.payment_method,
                new_order.delivery_date,
                new_order.observations.as_deref(),
            )
            .await?;

        let items = self.repo.replace_items(&mut tx, order.id, &lines).await?;

        tx.commit().await?;

        // Pós-commit: auditoria é best-effort, nunca desfaz a escrita.
        self.audit
            .record_event(
                user_id,
                AuditAction::Create,
                "Order",
                Some(order.id),
                json!({ "total": order.total, "itens": items.len() }),
            )
            .await;

        Ok(OrderDetail {
            header: order,
            client_name: client.map(|c| c.name),
            items,
        })
    }

    // --- UPDATE ---

    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        order_id: i64,
        patch: OrderPatch,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = require_found(
            self.repo
                .find_scoped(&mut *tx, organization_id, order_id)
                .await?,
            Entity::Order,
        )?;

        // Mescla: campo ausente mantém o valor gravado. Última escrita vence.
        let status = patch.status.unwrap_or(existing.status);
        let client_id = patch.client_id.or(existing.client_id);
        let payment_method = patch.payment_method.or(existing.payment_method);
        let delivery_date = patch.delivery_date.or(existing.delivery_date);
        let observations = patch.observations.or(existing.observations);

        if let Some(new_client_id) = patch.client_id {
            require_found(
                self.client_repo
                    .find_scoped(&mut *tx, organization_id, new_client_id)
                    .await?,
                Entity::Client,
            )?;
        }

        // Itens presentes: substituição integral + recálculo do total com a
        // sobretaxa do meio de pagamento efetivo. Itens ausentes: total e
        // itens intocados (a sobretaxa NÃO é reaplicada).
        let (total, items) = match patch.items {
            Some(requests) => {
                let (lines, subtotal) = self
                    .resolve_items(&mut tx, organization_id, &requests)
                    .await?;
                let items = self.repo.replace_items(&mut tx, order_id, &lines).await?;
                (pricing::order_total(subtotal, payment_method), items)
            }
            None => (
                existing.total,
                self.repo.list_items(&mut *tx, order_id).await?,
            ),
        };

        let order = self
            .repo
            .update_order(
                &mut *tx,
                organization_id,
                order_id,
                status,
                client_id,
                total,
                payment_method,
                delivery_date,
                observations.as_deref(),
            )
            .await?;

        let client_name = match order.client_id {
            Some(cid) => self
                .client_repo
                .find_scoped(&mut *tx, organization_id, cid)
                .await?
                .map(|c| c.name),
            None => None,
        };

        tx.commit().await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::Update,
                "Order",
                Some(order.id),
                json!({ "total": order.total }),
            )
            .await;

        Ok(OrderDetail {
            header: order,
            client_name,
            items,
        })
    }

    // --- REMOVE (soft) ---

    pub async fn remove<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        order_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let removed = self
            .repo
            .delete(&mut tx, organization_id, order_id, DeletionPolicy::Soft)
            .await?;
        require_found(removed, Entity::Order)?;

        tx.commit().await?;

        self.audit
            .record_event(user_id, AuditAction::Delete, "Order", Some(order_id), json!({}))
            .await;

        Ok(())
    }

    // --- REMOVE ALL (reset administrativo, hard) ---

    pub async fn remove_all<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let removed = self.repo.delete_all_for_org(&mut tx, organization_id).await?;
        tx.commit().await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::DeleteAll,
                "Order",
                None,
                json!({ "removidos": removed }),
            )
            .await;

        Ok(removed)
    }

    // --- LEITURAS ---

    pub async fn find_all(&self, organization_id: i64) -> Result<Vec<OrderDetail>, AppError> {
        let orders = self.repo.find_all(organization_id).await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.repo.items_of(order.id).await?;
            let client_name = match order.client_id {
                Some(cid) => self
                    .client_repo
                    .find(organization_id, cid)
                    .await?
                    .map(|c| c.name),
                None => None,
            };
            details.push(OrderDetail {
                header: order,
                client_name,
                items,
            });
        }
        Ok(details)
    }

    pub async fn find_one(
        &self,
        organization_id: i64,
        order_id: i64,
    ) -> Result<OrderDetail, AppError> {
        let order = require_found(
            self.repo.find(organization_id, order_id).await?,
            Entity::Order,
        )?;
        let items = self.repo.items_of(order.id).await?;
        let client_name = match order.client_id {
            Some(cid) => self
                .client_repo
                .find(organization_id, cid)
                .await?
                .map(|c| c.name),
            None => None,
        };
        Ok(OrderDetail {
            header: order,
            client_name,
            items,
        })
    }
}
