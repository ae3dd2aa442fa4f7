/// Audit trail entries recorded alongside every stock mutation.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(pub u32);

impl From<u32> for AuditId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<AuditId> for u32 {
    fn from(id: AuditId) -> Self {
        id.0
    }
}

impl Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "audit_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    StockAdd,
    StockEdit,
    StockDelete,
}

/// What the mutated lot looked like. `before_quantity` is absent for additions,
/// `after_quantity` for deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
    pub product_name: String,
    pub lot_code: String,
    pub expires_at: NaiveDate,
    pub before_quantity: Option<u32>,
    pub after_quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: String,
    pub details: AuditDetails,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording an audit entry.
#[derive(Debug, Clone)]
pub struct AuditCreate {
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: String,
    pub details: AuditDetails,
}
