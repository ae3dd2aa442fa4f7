use crate::model::{Lot, Order, OrderCreate, OrderId, OrderItemRequest, OrderStatus, OrderUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Validation and stock allocation happen in the Order actor's `on_create` hook;
/// this client only shapes the request and translates errors.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Places an order. On success every line item is fully allocated and the order
    /// is stored as `Pending`; on failure nothing is stored and no stock moves.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn place_order(
        &self,
        client: &str,
        items: Vec<OrderItemRequest>,
    ) -> Result<OrderId, OrderError> {
        debug!(?items, "Sending request");
        let payload = OrderCreate {
            client: client.to_string(),
            items,
        };
        let id = self.inner.create(payload).await.map_err(Self::map_error)?;
        info!(order = %id, "Order placed");
        Ok(id)
    }

    /// Moves an order to `status` and returns it.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        debug!("Sending request");
        let changed = self
            .inner
            .update(id, OrderUpdate { status })
            .await
            .map_err(Self::map_error)?;
        if changed.before.status != changed.after.status {
            info!(from = %changed.before.status, to = %changed.after.status, "Order status changed");
        }
        Ok(changed.after)
    }

    /// Every order, oldest first.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list().await?;
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    /// Every order and every lot, both sorted by id, read as one consistent pair.
    ///
    /// The lots are read from inside the Order actor, which places orders one at a
    /// time, so no order can commit its stock between the two reads.
    #[instrument(skip(self))]
    pub async fn orders_with_stock(&self) -> Result<(Vec<Order>, Vec<Lot>), OrderError> {
        let (mut orders, stock) = self
            .inner
            .inspect(|orders, stock| {
                Box::pin(async move { (orders, stock.query_stock(None).await) })
            })
            .await
            .map_err(Self::map_error)?;
        let mut stock = stock?;
        orders.sort_by_key(|o| o.id);
        stock.sort_by_key(|lot| lot.id);
        debug!(orders = orders.len(), lots = stock.len(), "Read orders with stock");
        Ok((orders, stock))
    }

    /// Reloads persisted orders under their original ids. Their allocations are
    /// taken as already applied to stock.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn restore(&self, orders: Vec<Order>) -> Result<usize, OrderError> {
        self.inner.import(orders).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
