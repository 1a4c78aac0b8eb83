// src/services/inventory_service.rs
//
// O livro-razão de estoque em dois estágios: cozinha (produzido) e
// entrega (alocado para venda). Cada mutação roda numa transação própria
// com a linha do produto travada (FOR UPDATE), então a pré-condição de
// estoque é sempre reavaliada junto com o débito.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::audit::{AuditAction, AuditEmitter},
    common::error::{AppError, Entity, require_found},
    db::ProductRepository,
    models::catalog::Product,
};

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    audit: Arc<dyn AuditEmitter>,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository, audit: Arc<dyn AuditEmitter>) -> Self {
        Self { product_repo, audit }
    }

    fn check_amount(amount: i32) -> Result<(), AppError> {
        if amount < 1 {
            return Err(AppError::InvalidArgument(
                "A quantidade deve ser um inteiro positivo.",
            ));
        }
        Ok(())
    }

    /// Trava e valida a posse do produto dentro da transação corrente.
    async fn lock_scoped(
        &self,
        conn: &mut PgConnection,
        organization_id: i64,
        product_id: i64,
    ) -> Result<Product, AppError> {
        require_found(
            self.product_repo
                .lock_for_stock_update(&mut *conn, organization_id, product_id)
                .await?,
            Entity::Product,
        )
    }

    // --- PRODUZIR (cozinha += n) ---

    pub async fn produce<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        product_id: i64,
        amount: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        Self::check_amount(amount)?;
        let mut tx = executor.begin().await?;

        self.lock_scoped(&mut tx, organization_id, product_id).await?;
        let product = self
            .product_repo
            .apply_stock_delta(&mut *tx, organization_id, product_id, amount, 0)
            .await?;

        tx.commit().await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::Produce,
                "Product",
                Some(product_id),
                json!({ "quantidade": amount, "estoqueCozinha": product.stock_kitchen }),
            )
            .await;

        Ok(product)
    }

    // --- TRANSFERIR (cozinha -= n; entrega += n) ---

    pub async fn transfer<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        product_id: i64,
        amount: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        Self::check_amount(amount)?;
        let mut tx = executor.begin().await?;

        let current = self.lock_scoped(&mut tx, organization_id, product_id).await?;

        // A origem barra a transferência que deixaria a cozinha negativa.
        // Com a linha travada, duas transferências concorrentes não passam
        // as duas pela mesma janela.
        if current.stock_kitchen < amount {
            return Err(AppError::InsufficientStock {
                available: current.stock_kitchen,
                requested: amount,
            });
        }

        let product = self
            .product_repo
            .apply_stock_delta(&mut *tx, organization_id, product_id, -amount, amount)
            .await?;

        tx.commit().await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::Transfer,
                "Product",
                Some(product_id),
                json!({
                    "quantidade": amount,
                    "estoqueCozinha": product.stock_kitchen,
                    "estoqueEntrega": product.stock_delivery,
                }),
            )
            .await;

        Ok(product)
    }

    // --- ENTRADA DIRETA NA ENTREGA (compras externas) ---

    pub async fn add_delivery_stock<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        product_id: i64,
        amount: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        Self::check_amount(amount)?;
        let mut tx = executor.begin().await?;

        self.lock_scoped(&mut tx, organization_id, product_id).await?;
        let product = self
            .product_repo
            .apply_stock_delta(&mut *tx, organization_id, product_id, 0, amount)
            .await?;

        tx.commit().await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::StockEntry,
                "Product",
                Some(product_id),
                json!({ "quantidade": amount, "estoqueEntrega": product.stock_delivery }),
            )
            .await;

        Ok(product)
    }

    // --- CATÁLOGO ---

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        name: &str,
        price: Decimal,
        initial_kitchen_stock: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if initial_kitchen_stock < 0 {
            return Err(AppError::InvalidArgument(
                "O estoque inicial não pode ser negativo.",
            ));
        }

        let product = self
            .product_repo
            .create(executor, organization_id, name, price, initial_kitchen_stock)
            .await?;

        self.audit
            .record_event(
                user_id,
                AuditAction::Create,
                "Product",
                Some(product.id),
                json!({ "nome": product.name }),
            )
            .await;

        Ok(product)
    }

    pub async fn list_products(&self, organization_id: i64) -> Result<Vec<Product>, AppError> {
        self.product_repo.find_all(organization_id).await
    }

    pub async fn remove_product<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        product_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = self
            .product_repo
            .soft_delete(executor, organization_id, product_id)
            .await?;
        require_found(removed, Entity::Product)?;

        self.audit
            .record_event(user_id, AuditAction::Delete, "Product", Some(product_id), json!({}))
            .await;

        Ok(())
    }
}
