//! [`ActorEntity`] implementation for [`Order`].
//!
//! Placing an order is the commit step of the allocation engine. `from_create_params`
//! validates the request; `on_create` then asks the Lot actor to allocate every cart
//! row in one transaction and merges rows for the same product. Only if allocation
//! succeeds is the order stored, with status `Pending`.

use super::error::OrderError;
use crate::allocation::merge_line_items;
use crate::clients::StockClient;
use crate::model::{LineItem, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, ProductId};
use async_trait::async_trait;
use chrono::Utc;
use resource_actor::ActorEntity;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = StockClient;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Validates the request. Each cart row becomes one unallocated line item.
    ///
    /// # Errors
    /// `InvalidInput` for a blank client, an empty cart, a zero quantity, a blank
    /// product id, or rows for one product whose quantities sum past `u32::MAX`.
    /// Stock is not consulted.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.client.trim().is_empty() {
            return Err(OrderError::InvalidInput("client is required".into()));
        }
        if params.items.is_empty() {
            return Err(OrderError::InvalidInput("order has no items".into()));
        }
        if let Some(item) = params
            .items
            .iter()
            .find(|i| i.quantity == 0 || i.product_id.as_str().trim().is_empty())
        {
            return Err(OrderError::InvalidInput(format!(
                "invalid line for {}: quantity must be positive and product id set",
                item.name
            )));
        }
        let mut totals: Vec<(&ProductId, u32)> = Vec::new();
        for item in &params.items {
            match totals.iter_mut().find(|(id, _)| *id == &item.product_id) {
                Some((_, total)) => {
                    *total = total.checked_add(item.quantity).ok_or_else(|| {
                        OrderError::InvalidInput(format!(
                            "total quantity for {} is too large",
                            item.name
                        ))
                    })?;
                }
                None => totals.push((&item.product_id, item.quantity)),
            }
        }

        Ok(Self {
            id,
            client: params.client,
            items: params.items.into_iter().map(LineItem::from).collect(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Allocates stock for every row as one all-or-nothing transaction, then merges
    /// rows for the same product.
    async fn on_create(&mut self, stock: &StockClient) -> Result<(), Self::Error> {
        debug!(order = %self.id, rows = self.items.len(), "Allocating order");
        let allocated = stock.allocate_order(self.items.clone()).await?;
        self.items = merge_line_items(allocated);
        info!(order = %self.id, client = %self.client, "Order allocated");
        Ok(())
    }

    /// Moves `Pending` to `Fulfilled`. Re-applying the current status is a no-op.
    async fn on_update(&mut self, update: OrderUpdate, _stock: &StockClient) -> Result<(), Self::Error> {
        match (self.status, update.status) {
            (from, to) if from == to => Ok(()),
            (OrderStatus::Pending, OrderStatus::Fulfilled) => {
                self.status = OrderStatus::Fulfilled;
                Ok(())
            }
            (from, to) => Err(OrderError::InvalidStatusTransition { from, to }),
        }
    }

    async fn handle_action(&mut self, _action: (), _stock: &StockClient) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderItemRequest;

    fn request(items: Vec<OrderItemRequest>) -> OrderCreate {
        OrderCreate {
            client: "Ward 3".into(),
            items,
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        let err = Order::from_create_params(OrderId(1), request(vec![])).unwrap_err();
        assert_eq!(err, OrderError::InvalidInput("order has no items".into()));
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let err = Order::from_create_params(
            OrderId(1),
            request(vec![OrderItemRequest::new(ProductId::new("P"), "Saline", 0)]),
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(_)));
    }

    #[test]
    fn rows_stay_separate_until_allocated() {
        let order = Order::from_create_params(
            OrderId(1),
            request(vec![
                OrderItemRequest::new(ProductId::new("P"), "Saline", 3),
                OrderItemRequest::new(ProductId::new("P"), "Saline", 4),
            ]),
        )
        .unwrap();

        assert_eq!(order.items.len(), 2);
        assert!(order.items.iter().all(|item| item.allocations.is_empty()));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn rows_summing_past_u32_max_are_rejected() {
        let err = Order::from_create_params(
            OrderId(1),
            request(vec![
                OrderItemRequest::new(ProductId::new("P"), "Saline", u32::MAX),
                OrderItemRequest::new(ProductId::new("Q"), "Gauze", 1),
                OrderItemRequest::new(ProductId::new("P"), "Saline", 1),
            ]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidInput("total quantity for Saline is too large".into())
        );
    }

    #[test]
    fn large_rows_for_different_products_are_fine() {
        let order = Order::from_create_params(
            OrderId(1),
            request(vec![
                OrderItemRequest::new(ProductId::new("P"), "Saline", u32::MAX),
                OrderItemRequest::new(ProductId::new("Q"), "Gauze", u32::MAX),
            ]),
        )
        .unwrap();
        assert_eq!(order.items.len(), 2);
    }
}
