// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::audit::{AuditEmitter, TracingAuditEmitter},
    db::{ClientRepository, OrderRepository, ProductRepository},
    services::{inventory_service::InventoryService, order_service::OrderService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub order_service: OrderService,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Conexão com o banco de dados estabelecida.");

        // --- Monta o gráfico de dependências ---
        let audit: Arc<dyn AuditEmitter> = Arc::new(TracingAuditEmitter);

        let product_repo = ProductRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let order_service = OrderService::new(
            order_repo,
            product_repo.clone(),
            client_repo,
            audit.clone(),
        );
        let inventory_service = InventoryService::new(product_repo, audit);

        Ok(Self {
            db_pool,
            order_service,
            inventory_service,
        })
    }
}
