// src/main.rs

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;

use doceria_backend::{config::AppState, handlers};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("Migrações do banco de dados executadas.");

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order)
                .get(handlers::orders::list_orders)
                .delete(handlers::orders::delete_all_orders),
        )
        .route(
            "/{id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        );

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/{id}", delete(handlers::products::delete_product))
        .route("/{id}/produce", post(handlers::inventory::produce))
        .route("/{id}/transfer", post(handlers::inventory::transfer))
        .route(
            "/{id}/delivery-stock",
            post(handlers::inventory::add_delivery_stock),
        );

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/orders", order_routes)
        .nest("/api/products", product_routes)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
