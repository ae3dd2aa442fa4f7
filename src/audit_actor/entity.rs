//! Append-only: every entry is written once by [`AuditClient::record`](crate::clients::AuditClient::record).

use super::error::AuditError;
use crate::model::{AuditCreate, AuditEntry, AuditId};
use async_trait::async_trait;
use chrono::Utc;
use resource_actor::ActorEntity;

#[async_trait]
impl ActorEntity for AuditEntry {
    type Id = AuditId;
    type Create = AuditCreate;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = AuditError;

    fn id(&self) -> &AuditId {
        &self.id
    }

    fn from_create_params(id: AuditId, params: AuditCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            action: params.action,
            entity: params.entity,
            entity_id: params.entity_id,
            details: params.details,
            created_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(AuditError::Immutable(self.id.to_string()))
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
