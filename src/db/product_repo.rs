// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::catalog::Product};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras simples (usam a pool principal)
    // ---

    pub async fn find_all(&self, organization_id: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE organization_id = $1 AND deleted_at IS NULL
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // ---
    // Escritas e leituras transacionais (padrão genérico 'Executor')
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        name: &str,
        price: Decimal,
        initial_kitchen_stock: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (organization_id, name, price, stock_kitchen)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(price)
        .bind(initial_kitchen_stock)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    /// Soft-delete escopado. `None` cobre tanto produto inexistente quanto
    /// produto de outra organização.
    pub async fn soft_delete<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET deleted_at = now()
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Busca em lote para o resolver de pedidos: todos os produtos
    /// referenciados, filtrados pela organização e sem os soft-deletados.
    /// A conferência de contagem fica no serviço.
    pub async fn find_for_order<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        product_ids: &[i64],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE id = ANY($1) AND organization_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(product_ids)
        .bind(organization_id)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    /// Trava a linha do produto (FOR UPDATE) dentro da transação corrente.
    /// Duas transferências concorrentes sobre o mesmo produto serializam
    /// aqui: a pré-condição de estoque é reavaliada já com a trava.
    pub async fn lock_for_stock_update<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Aplica os deltas nos dois contadores de uma vez só. Chamado sempre
    /// depois de `lock_for_stock_update`, na mesma transação.
    pub async fn apply_stock_delta<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        product_id: i64,
        kitchen_delta: i32,
        delivery_delta: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock_kitchen = stock_kitchen + $3,
                stock_delivery = stock_delivery + $4
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(organization_id)
        .bind(kitchen_delta)
        .bind(delivery_delta)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }
}
