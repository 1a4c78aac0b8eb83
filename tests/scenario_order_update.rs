//! Cenário: edição de pedido — substituição integral de itens e recálculo
//! do total.
//!
//! A lista de itens nunca é remendada: patch com itens apaga o conjunto
//! anterior e grava o novo, recalculando o total com a sobretaxa do meio
//! de pagamento efetivo. Patch sem itens deixa itens e total intocados —
//! inclusive quando só o meio de pagamento muda.
//!
//! Testes dependentes de banco; pulam sem DATABASE_URL.

mod common;

use doceria_backend::{
    models::orders::{OrderStatus, PaymentMethod},
    services::order_service::{NewOrder, OrderPatch},
    services::pricing::ItemRequest,
};

async fn setup(pool: &sqlx::PgPool) -> (i64, i64, i64, i64) {
    let (org, user) = common::seed_org(pool, "Doceria edição").await;
    let bolo = common::seed_product(pool, org, "Bolo", "50.00", 0, 0).await;
    let pudim = common::seed_product(pool, org, "Pudim", "20.00", 0, 0).await;
    (org, user, bolo, pudim)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn patch_with_items_replaces_the_full_set() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user, bolo, pudim) = setup(&pool).await;
    let orders = common::order_service(&pool);

    let created = orders
        .create(
            &pool,
            org,
            user,
            NewOrder {
                items: vec![
                    ItemRequest { product_id: bolo, quantity: 1 },
                    ItemRequest { product_id: pudim, quantity: 2 },
                ],
                client_id: None,
                payment_method: Some(PaymentMethod::Dinheiro),
                delivery_date: None,
                observations: None,
            },
        )
        .await?;
    assert_eq!(created.header.total, common::dec("90.00"));

    let updated = orders
        .update(
            &pool,
            org,
            user,
            created.header.id,
            OrderPatch {
                items: Some(vec![ItemRequest { product_id: pudim, quantity: 1 }]),
                ..OrderPatch::default()
            },
        )
        .await?;

    // Pós-estado == lista nova, nunca união da antiga com a nova.
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].product_id, pudim);
    assert_eq!(common::count_items(&pool, created.header.id).await, 1);
    assert_eq!(updated.header.total, common::dec("20.00"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn patch_without_items_leaves_total_and_items_untouched() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user, bolo, _) = setup(&pool).await;
    let orders = common::order_service(&pool);

    let created = orders
        .create(
            &pool,
            org,
            user,
            NewOrder {
                items: vec![ItemRequest { product_id: bolo, quantity: 2 }],
                client_id: None,
                payment_method: Some(PaymentMethod::Dinheiro),
                delivery_date: None,
                observations: None,
            },
        )
        .await?;

    let updated = orders
        .update(
            &pool,
            org,
            user,
            created.header.id,
            OrderPatch {
                status: Some(OrderStatus::EmPreparo),
                observations: Some("Entregar às 15h".into()),
                ..OrderPatch::default()
            },
        )
        .await?;

    assert_eq!(updated.header.status, OrderStatus::EmPreparo);
    assert_eq!(updated.header.total, created.header.total);
    assert_eq!(updated.items.len(), created.items.len());
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn changing_payment_method_alone_does_not_recompute_total() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user, bolo, _) = setup(&pool).await;
    let orders = common::order_service(&pool);

    let created = orders
        .create(
            &pool,
            org,
            user,
            NewOrder {
                items: vec![ItemRequest { product_id: bolo, quantity: 2 }],
                client_id: None,
                payment_method: Some(PaymentMethod::Pix),
                delivery_date: None,
                observations: None,
            },
        )
        .await?;
    assert_eq!(created.header.total, common::dec("100.00"));

    // Sobretaxa só entra quando os itens são recalculados: trocar o meio
    // de pagamento sem mexer nos itens mantém o total gravado.
    let updated = orders
        .update(
            &pool,
            org,
            user,
            created.header.id,
            OrderPatch {
                payment_method: Some(PaymentMethod::Cartao),
                ..OrderPatch::default()
            },
        )
        .await?;

    assert_eq!(updated.header.payment_method, Some(PaymentMethod::Cartao));
    assert_eq!(updated.header.total, common::dec("100.00"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn patch_with_items_applies_the_effective_payment_method() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user, bolo, _) = setup(&pool).await;
    let orders = common::order_service(&pool);

    let created = orders
        .create(
            &pool,
            org,
            user,
            NewOrder {
                items: vec![ItemRequest { product_id: bolo, quantity: 2 }],
                client_id: None,
                payment_method: Some(PaymentMethod::Dinheiro),
                delivery_date: None,
                observations: None,
            },
        )
        .await?;

    // Patch traz itens E cartão: o recálculo usa o método do patch.
    let updated = orders
        .update(
            &pool,
            org,
            user,
            created.header.id,
            OrderPatch {
                payment_method: Some(PaymentMethod::Cartao),
                items: Some(vec![ItemRequest { product_id: bolo, quantity: 2 }]),
                ..OrderPatch::default()
            },
        )
        .await?;
    assert_eq!(updated.header.total, common::dec("106.00"));

    // Patch só com itens: o recálculo usa o método já gravado (cartão).
    let updated = orders
        .update(
            &pool,
            org,
            user,
            created.header.id,
            OrderPatch {
                items: Some(vec![ItemRequest { product_id: bolo, quantity: 1 }]),
                ..OrderPatch::default()
            },
        )
        .await?;
    assert_eq!(updated.header.total, common::dec("53.00"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL; run: cargo test -- --include-ignored"]
async fn status_is_freely_settable_including_out_of_cancelled() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (org, user, bolo, _) = setup(&pool).await;
    let orders = common::order_service(&pool);

    let created = orders
        .create(
            &pool,
            org,
            user,
            NewOrder {
                items: vec![ItemRequest { product_id: bolo, quantity: 1 }],
                client_id: None,
                payment_method: None,
                delivery_date: None,
                observations: None,
            },
        )
        .await?;
    assert_eq!(created.header.status, OrderStatus::Pendente);

    // Nenhuma ordenação é imposta pelo servidor: cancela e reabre.
    for status in [OrderStatus::Cancelado, OrderStatus::Pronto] {
        let updated = orders
            .update(
                &pool,
                org,
                user,
                created.header.id,
                OrderPatch {
                    status: Some(status),
                    ..OrderPatch::default()
                },
            )
            .await?;
        assert_eq!(updated.header.status, status);
    }
    Ok(())
}
