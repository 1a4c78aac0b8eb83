// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::orders::{DeletionPolicy, Order, OrderItem, OrderStatus, PaymentMethod},
    services::pricing::LineSnapshot,
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras simples (usam a pool principal)
    // ---

    /// Lista os pedidos da organização, mais recentes primeiro.
    /// Soft-deletados nunca aparecem.
    pub async fn find_all(&self, organization_id: i64) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE organization_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// Lookup escopado fora de transação.
    pub async fn find(
        &self,
        organization_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, AppError> {
        self.find_scoped(&self.pool, organization_id, order_id).await
    }

    pub async fn items_of(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError> {
        self.list_items(&self.pool, order_id).await
    }

    // ---
    // Leituras e escritas transacionais
    // ---

    /// Lookup escopado. Soft-deletado conta como ausente: a política da
    /// casa é esconder o pedido também do lookup direto por id.
    pub async fn find_scoped<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(order_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        order_id: i64,
    ) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        user_id: i64,
        client_id: Option<i64>,
        total: Decimal,
        payment_method: Option<PaymentMethod>,
        delivery_date: Option<DateTime<Utc>>,
        observations: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                organization_id, user_id, client_id, status, total,
                payment_method, delivery_date, observations
            )
            VALUES ($1, $2, $3, 'PENDENTE', $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(client_id)
        .bind(total)
        .bind(payment_method)
        .bind(delivery_date)
        .bind(observations)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    /// Substituição integral dos itens: apaga o conjunto anterior e grava
    /// o novo, na mesma transação do chamador. Itens nunca são remendados
    /// um a um.
    pub async fn replace_items(
        &self,
        conn: &mut PgConnection,
        order_id: i64,
        lines: &[LineSnapshot],
    ) -> Result<Vec<OrderItem>, AppError> {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *conn)
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .fetch_one(&mut *conn)
            .await?;
            items.push(item);
        }
        Ok(items)
    }

    /// Grava o estado final do cabeçalho já mesclado pelo serviço.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_order<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        order_id: i64,
        status: OrderStatus,
        client_id: Option<i64>,
        total: Decimal,
        payment_method: Option<PaymentMethod>,
        delivery_date: Option<DateTime<Utc>>,
        observations: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $3, client_id = $4, total = $5,
                payment_method = $6, delivery_date = $7, observations = $8
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(organization_id)
        .bind(status)
        .bind(client_id)
        .bind(total)
        .bind(payment_method)
        .bind(delivery_date)
        .bind(observations)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    /// Remoção com política explícita: Soft marca deleted_at e preserva a
    /// linha; Hard apaga itens e pedido de verdade. Retorna o id atingido,
    /// ou None se o pedido não pertence à organização.
    pub async fn delete(
        &self,
        conn: &mut PgConnection,
        organization_id: i64,
        order_id: i64,
        policy: DeletionPolicy,
    ) -> Result<Option<i64>, AppError> {
        match policy {
            DeletionPolicy::Soft => {
                let row: Option<(i64,)> = sqlx::query_as(
                    r#"
                    UPDATE orders SET deleted_at = now()
                    WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
                    RETURNING id
                    "#,
                )
                .bind(order_id)
                .bind(organization_id)
                .fetch_optional(&mut *conn)
                .await?;
                Ok(row.map(|(id,)| id))
            }
            DeletionPolicy::Hard => {
                let row: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM orders WHERE id = $1 AND organization_id = $2")
                        .bind(order_id)
                        .bind(organization_id)
                        .fetch_optional(&mut *conn)
                        .await?;
                let Some((id,)) = row else { return Ok(None) };

                sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("DELETE FROM orders WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                Ok(Some(id))
            }
        }
    }

    /// Reset administrativo: apaga itens e pedidos da organização inteira
    /// (inclusive os soft-deletados). Retorna quantos pedidos caíram.
    pub async fn delete_all_for_org(
        &self,
        conn: &mut PgConnection,
        organization_id: i64,
    ) -> Result<u64, AppError> {
        sqlx::query(
            r#"
            DELETE FROM order_items
            WHERE order_id IN (SELECT id FROM orders WHERE organization_id = $1)
            "#,
        )
        .bind(organization_id)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query("DELETE FROM orders WHERE organization_id = $1")
            .bind(organization_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
