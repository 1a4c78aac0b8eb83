// src/services/pricing.rs
//
// A parte pura do cálculo de preço de pedidos: montagem dos retratos de
// linha (preço copiado do catálogo) e sobretaxa por meio de pagamento.
// Nada aqui toca o banco; o resolver em order_service busca os produtos
// e delega o cálculo para cá.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::{common::error::AppError, models::catalog::Product, models::orders::PaymentMethod};

/// Fator aplicado ao total quando o pagamento é no cartão (taxa da maquininha).
pub const CARD_SURCHARGE: Decimal = Decimal::from_parts(106, 0, 0, false, 2); // 1.06

/// Par (produto, quantidade) pedido pelo chamador, ainda não resolvido.
#[derive(Debug, Clone, Copy)]
pub struct ItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

/// Retrato de linha: a quantidade pedida com o preço unitário vigente
/// copiado do catálogo. É o que vira OrderItem dentro da transação.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSnapshot {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

/// Valida a lista de pares antes de qualquer leitura do catálogo:
/// lista vazia e quantidade não-positiva são rejeitadas na borda.
pub fn validate_requests(requests: &[ItemRequest]) -> Result<(), AppError> {
    if requests.is_empty() {
        return Err(AppError::InvalidArgument("A lista de itens não pode ser vazia."));
    }
    for req in requests {
        if req.quantity < 1 {
            return Err(AppError::InvalidArgument(
                "A quantidade de cada item deve ser um inteiro positivo.",
            ));
        }
    }
    Ok(())
}

/// Monta os retratos de linha na ordem dos pedidos e acumula o subtotal.
/// Pressupõe que `products` já veio filtrado pela organização e com a
/// contagem conferida pelo resolver (todo id pedido está no mapa).
pub fn build_snapshots(
    requests: &[ItemRequest],
    products: &HashMap<i64, Product>,
) -> (Vec<LineSnapshot>, Decimal) {
    let mut lines = Vec::with_capacity(requests.len());
    let mut subtotal = Decimal::ZERO;

    for req in requests {
        // O resolver já garantiu a presença; um furo aqui seria bug interno.
        if let Some(product) = products.get(&req.product_id) {
            let quantity = Decimal::from(req.quantity);
            subtotal += product.price * quantity;
            lines.push(LineSnapshot {
                product_id: req.product_id,
                quantity: req.quantity,
                price: product.price,
            });
        }
    }

    (lines, subtotal)
}

/// Fator de sobretaxa por meio de pagamento: cartão paga a taxa fixa,
/// os demais (e pedido sem meio definido) ficam no valor cheio.
pub fn surcharge_factor(method: Option<PaymentMethod>) -> Decimal {
    match method {
        Some(PaymentMethod::Cartao) => CARD_SURCHARGE,
        _ => Decimal::ONE,
    }
}

/// Total final do pedido: subtotal × fator, arredondado para centavos.
pub fn order_total(subtotal: Decimal, method: Option<PaymentMethod>) -> Decimal {
    (subtotal * surcharge_factor(method)).round_dp(2)
}
