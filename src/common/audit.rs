// src/common/audit.rs
//
// Emissor de auditoria: canal lateral best-effort. O armazenamento do log
// fica fora deste núcleo; aqui só emitimos o evento depois do commit.
// Falha na emissão jamais desfaz a transação primária.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    DeleteAll,
    Produce,
    Transfer,
    StockEntry,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::DeleteAll => "DELETE_ALL",
            AuditAction::Produce => "PRODUCE",
            AuditAction::Transfer => "TRANSFER",
            AuditAction::StockEntry => "STOCK_ENTRY",
        }
    }
}

#[async_trait]
pub trait AuditEmitter: Send + Sync {
    /// Registra uma mutação. Sem retorno: o chamador não tem o que fazer
    /// com uma falha de auditoria além de seguir em frente.
    async fn record_event(
        &self,
        user_id: i64,
        action: AuditAction,
        entity_type: &'static str,
        entity_id: Option<i64>,
        details: Value,
    );
}

/// Implementação padrão: evento estruturado via `tracing`, com um id de
/// correlação para o coletor externo agrupar.
#[derive(Clone, Default)]
pub struct TracingAuditEmitter;

#[async_trait]
impl AuditEmitter for TracingAuditEmitter {
    async fn record_event(
        &self,
        user_id: i64,
        action: AuditAction,
        entity_type: &'static str,
        entity_id: Option<i64>,
        details: Value,
    ) {
        let event_id = Uuid::new_v4();
        tracing::info!(
            %event_id,
            user_id,
            action = action.as_str(),
            entity_type,
            entity_id,
            %details,
            "auditoria"
        );
    }
}
