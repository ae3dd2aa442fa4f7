/// A lot: one batch of a product with its own expiry date and remaining quantity.
///
/// # Actor Framework
/// Lots are owned by a [`ResourceActor<Lot>`](resource_actor::ResourceActor) and only
/// change through its requests. See [`crate::lot_actor`] for the
/// [`ActorEntity`](resource_actor::ActorEntity) implementation.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque catalog identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type-safe identifier for lots. Issued in insertion order, which also makes it
/// the tie-break between lots expiring on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(pub u32);

impl From<u32> for LotId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<LotId> for u32 {
    fn from(id: LotId) -> Self {
        id.0
    }
}

impl Display for LotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lot_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub product_id: ProductId,
    pub product_name: String,
    pub lot_code: String,
    pub expires_at: NaiveDate,
    /// Remaining units. Exhausted lots stay at zero until deleted.
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

impl Lot {
    pub fn new(
        id: LotId,
        product_id: ProductId,
        product_name: impl Into<String>,
        lot_code: impl Into<String>,
        expires_at: NaiveDate,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            product_id,
            product_name: product_name.into(),
            lot_code: lot_code.into(),
            expires_at,
            quantity,
            created_at: Utc::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// Payload for adding a lot to stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotCreate {
    pub product_id: ProductId,
    pub product_name: String,
    pub lot_code: String,
    pub expires_at: NaiveDate,
    pub quantity: u32,
}

/// Manual correction of a lot's remaining quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LotUpdate {
    pub quantity: u32,
}
