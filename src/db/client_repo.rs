// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::clients::Client};

// O CRUD de clientes mora fora deste núcleo; aqui só existem os lookups
// escopados que o processador de pedidos usa para validar posse e montar
// o pedido completo.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lookup escopado fora de transação (montagem de leitura).
    pub async fn find(
        &self,
        organization_id: i64,
        client_id: i64,
    ) -> Result<Option<Client>, AppError> {
        self.find_scoped(&self.pool, organization_id, client_id).await
    }

    pub async fn find_scoped<'e, E>(
        &self,
        executor: E,
        organization_id: i64,
        client_id: i64,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(client_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }
}
