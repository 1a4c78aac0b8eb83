//! Cenário: preço de pedido — retrato do catálogo + sobretaxa de cartão.
//!
//! Propriedades sob teste:
//! - total == sobretaxa(meio) × Σ(price × quantity) após todo create;
//! - o preço do item é um retrato histórico, imune a mudanças posteriores
//!   do catálogo;
//! - produto ou cliente de outra organização derruba a transação inteira
//!   como NotFound, sem nenhuma escrita parcial.
//!
//! Testes dependentes de banco; pulam sem DATABASE_URL.

mod common;

use doceria_backend::{
    common::error::{AppError, Entity},
    models::orders::PaymentMethod,
    services::order_service::NewOrder,
    services::pricing::ItemRequest,
};

fn new_order(items: Vec<ItemRequest>, payment_method: Option<PaymentMethod>) -> NewOrder {
    NewOrder {
        items,
        client_id: None,
        payment_method,
        delivery_date: None,
        observations: None,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn bolo_scenario_end_to_end() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user) = common::seed_org(&pool, "Doceria A").await;
    let bolo = common::seed_product(&pool, org, "Bolo", "50.00", 10, 0).await;

    let inventory = common::inventory_service(&pool);
    let orders = common::order_service(&pool);

    // produce(4): cozinha 10 → 14
    inventory.produce(&pool, org, user, bolo, 4).await?;
    assert_eq!(common::stock_of(&pool, bolo).await, (14, 0));

    // transfer(6): cozinha 8, entrega 6
    inventory.transfer(&pool, org, user, bolo, 6).await?;
    assert_eq!(common::stock_of(&pool, bolo).await, (8, 6));

    // 2 × Bolo no cartão: 2 × 50.00 × 1.06 = 106.00
    let detail = orders
        .create(
            &pool,
            org,
            user,
            new_order(
                vec![ItemRequest { product_id: bolo, quantity: 2 }],
                Some(PaymentMethod::Cartao),
            ),
        )
        .await?;

    assert_eq!(detail.header.total, common::dec("106.00"));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].price, common::dec("50.00"));
    assert_eq!(detail.items[0].quantity, 2);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn total_without_card_has_no_surcharge() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user) = common::seed_org(&pool, "Doceria sem cartão").await;
    let brigadeiro = common::seed_product(&pool, org, "Brigadeiro", "2.50", 0, 0).await;

    let orders = common::order_service(&pool);

    let detail = orders
        .create(
            &pool,
            org,
            user,
            new_order(
                vec![ItemRequest { product_id: brigadeiro, quantity: 10 }],
                Some(PaymentMethod::Pix),
            ),
        )
        .await?;

    assert_eq!(detail.header.total, common::dec("25.00"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn item_price_is_a_historical_snapshot() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user) = common::seed_org(&pool, "Doceria retrato").await;
    let torta = common::seed_product(&pool, org, "Torta", "30.00", 0, 0).await;

    let orders = common::order_service(&pool);
    let detail = orders
        .create(
            &pool,
            org,
            user,
            new_order(vec![ItemRequest { product_id: torta, quantity: 1 }], None),
        )
        .await?;

    // O catálogo muda depois da venda...
    sqlx::query("UPDATE products SET price = $1 WHERE id = $2")
        .bind(common::dec("45.00"))
        .bind(torta)
        .execute(&pool)
        .await?;

    // ...mas o pedido retém o preço vigente na criação.
    let reread = orders.find_one(org, detail.header.id).await?;
    assert_eq!(reread.items[0].price, common::dec("30.00"));
    assert_eq!(reread.header.total, common::dec("30.00"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn foreign_product_aborts_with_not_found_and_no_partial_writes() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org_a, user_a) = common::seed_org(&pool, "Doceria A").await;
    let (org_b, _) = common::seed_org(&pool, "Doceria B").await;
    let own = common::seed_product(&pool, org_a, "Bolo próprio", "10.00", 0, 0).await;
    let foreign = common::seed_product(&pool, org_b, "Bolo alheio", "10.00", 0, 0).await;

    let orders = common::order_service(&pool);
    let err = orders
        .create(
            &pool,
            org_a,
            user_a,
            new_order(
                vec![
                    ItemRequest { product_id: own, quantity: 1 },
                    ItemRequest { product_id: foreign, quantity: 1 },
                ],
                None,
            ),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(Entity::Product)));

    // Nada ficou para trás: nem pedido, nem itens.
    let (n_orders,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM orders WHERE organization_id = $1")
            .bind(org_a)
            .fetch_one(&pool)
            .await?;
    assert_eq!(n_orders, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn foreign_client_aborts_with_not_found() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org_a, user_a) = common::seed_org(&pool, "Doceria A").await;
    let (org_b, _) = common::seed_org(&pool, "Doceria B").await;
    let product = common::seed_product(&pool, org_a, "Pudim", "20.00", 0, 0).await;
    let foreign_client = common::seed_client(&pool, org_b, "Cliente de B").await;

    let orders = common::order_service(&pool);
    let err = orders
        .create(
            &pool,
            org_a,
            user_a,
            NewOrder {
                items: vec![ItemRequest { product_id: product, quantity: 1 }],
                client_id: Some(foreign_client),
                payment_method: None,
                delivery_date: None,
                observations: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(Entity::Client)));

    let (n_orders,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM orders WHERE organization_id = $1")
            .bind(org_a)
            .fetch_one(&pool)
            .await?;
    assert_eq!(n_orders, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn empty_and_non_positive_item_lists_are_rejected() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user) = common::seed_org(&pool, "Doceria validação").await;
    let product = common::seed_product(&pool, org, "Beijinho", "2.00", 0, 0).await;

    let orders = common::order_service(&pool);

    let err = orders
        .create(&pool, org, user, new_order(vec![], None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let err = orders
        .create(
            &pool,
            org,
            user,
            new_order(vec![ItemRequest { product_id: product, quantity: 0 }], None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
    Ok(())
}
