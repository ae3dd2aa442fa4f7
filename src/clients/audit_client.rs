use crate::audit_actor::AuditError;
use crate::model::{AuditCreate, AuditEntry, AuditId};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for the append-only audit log.
#[derive(Clone)]
pub struct AuditClient {
    inner: ResourceClient<AuditEntry>,
}

impl AuditClient {
    pub fn new(inner: ResourceClient<AuditEntry>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, entry), fields(action = ?entry.action, entity_id = %entry.entity_id))]
    pub async fn record(&self, entry: AuditCreate) -> Result<AuditId, AuditError> {
        debug!("Sending request");
        self.inner.create(entry).await.map_err(Self::map_error)
    }

    /// Every entry, oldest first.
    #[instrument(skip(self))]
    pub async fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let mut entries = self.list().await?;
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    /// Reloads persisted entries under their original ids.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn restore(&self, entries: Vec<AuditEntry>) -> Result<usize, AuditError> {
        self.inner.import(entries).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<AuditEntry> for AuditClient {
    type Error = AuditError;

    fn inner(&self) -> &ResourceClient<AuditEntry> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<AuditError>() {
            Ok(err) => err,
            Err(other) => AuditError::ActorCommunicationError(other.to_string()),
        }
    }
}
