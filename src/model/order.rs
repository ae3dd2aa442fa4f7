/// A client order: line items fulfilled from stock lots, plus a status.
///
/// # Actor Framework
/// Orders are owned by a [`ResourceActor<Order>`](resource_actor::ResourceActor).
/// Creating one allocates stock for every line item; see [`crate::order_actor`].
use crate::model::{LotId, ProductId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<OrderId> for u32 {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Fulfilled => write!(f, "fulfilled"),
        }
    }
}

/// Quantity taken from one lot for one line item. Never changes once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub lot_id: LotId,
    pub lot_code: String,
    pub expires_at: NaiveDate,
    pub quantity: u32,
}

/// One cart row as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Option<f64>,
}

impl OrderItemRequest {
    pub fn new(product_id: ProductId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            unit_price: None,
        }
    }

    pub fn with_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

/// One product within an order. On a stored order the allocation quantities
/// sum to `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Option<f64>,
    pub quantity: u32,
    pub allocations: Vec<AllocationRecord>,
}

impl From<OrderItemRequest> for LineItem {
    fn from(request: OrderItemRequest) -> Self {
        Self {
            product_id: request.product_id,
            name: request.name,
            unit_price: request.unit_price,
            quantity: request.quantity,
            allocations: Vec::new(),
        }
    }
}

impl LineItem {
    /// Units covered by this line's allocation records, saturating at `u32::MAX`.
    pub fn allocated(&self) -> u32 {
        self.allocations
            .iter()
            .fold(0u32, |total, a| total.saturating_add(a.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client: String,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for placing an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub client: String,
    pub items: Vec<OrderItemRequest>,
}

/// Status transition request.
#[derive(Debug, Clone, Copy)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}
