use crate::allocation::allocate;
use crate::clients::AuditClient;
use crate::lot_actor::StockError;
use crate::model::{
    AuditAction, AuditCreate, AuditDetails, LineItem, Lot, LotCreate, LotId, LotUpdate, ProductId,
};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument, warn};

/// Client for the lot store.
///
/// Every mutation made through this client (add, adjust, remove) is followed by one
/// audit entry. Allocation is not audited; the order it belongs to is the record.
#[derive(Clone)]
pub struct StockClient {
    inner: ResourceClient<Lot>,
    audit: AuditClient,
}

impl StockClient {
    pub fn new(inner: ResourceClient<Lot>, audit: AuditClient) -> Self {
        Self { inner, audit }
    }

    /// Adds a lot and returns its id.
    #[instrument(skip(self, lot), fields(product = %lot.product_id, lot_code = %lot.lot_code))]
    pub async fn add_stock_lot(&self, lot: LotCreate) -> Result<LotId, StockError> {
        lot.validate()?;
        debug!("Sending request");

        let details = AuditDetails {
            product_name: lot.product_name.clone(),
            lot_code: lot.lot_code.clone(),
            expires_at: lot.expires_at,
            before_quantity: None,
            after_quantity: Some(lot.quantity),
        };
        let id = self.inner.create(lot).await.map_err(Self::map_error)?;

        info!(lot = %id, "Lot added");
        self.record(AuditAction::StockAdd, id, details).await;
        Ok(id)
    }

    /// Sets a lot's remaining quantity and returns the lot as it now is.
    #[instrument(skip(self))]
    pub async fn adjust_stock_lot(&self, id: LotId, quantity: u32) -> Result<Lot, StockError> {
        debug!("Sending request");
        let changed = self
            .inner
            .update(id, LotUpdate { quantity })
            .await
            .map_err(Self::map_error)?;

        info!(
            before = changed.before.quantity,
            after = changed.after.quantity,
            "Lot adjusted"
        );
        let details = AuditDetails {
            before_quantity: Some(changed.before.quantity),
            after_quantity: Some(changed.after.quantity),
            ..lot_details(&changed.after)
        };
        self.record(AuditAction::StockEdit, id, details).await;
        Ok(changed.after)
    }

    /// Deletes a lot and returns it as it was just before removal.
    #[instrument(skip(self))]
    pub async fn remove_stock_lot(&self, id: LotId) -> Result<Lot, StockError> {
        debug!("Sending request");
        let removed = self.inner.delete(id).await.map_err(Self::map_error)?;

        info!(quantity = removed.quantity, "Lot removed");
        let details = AuditDetails {
            before_quantity: Some(removed.quantity),
            ..lot_details(&removed)
        };
        self.record(AuditAction::StockDelete, id, details).await;
        Ok(removed)
    }

    /// Lots of one product that still hold stock, in the order allocation would use them.
    #[instrument(skip(self))]
    pub async fn lots_for_product(&self, product_id: &ProductId) -> Result<Vec<Lot>, StockError> {
        let mut lots: Vec<Lot> = self
            .list()
            .await?
            .into_iter()
            .filter(|lot| &lot.product_id == product_id && lot.is_available())
            .collect();
        lots.sort_by_key(|lot| (lot.expires_at, lot.id));
        Ok(lots)
    }

    /// Every lot, exhausted ones included, grouped by product and sorted by expiry.
    /// With `product_id` set, only that product's lots are returned.
    #[instrument(skip(self))]
    pub async fn query_stock(&self, product_id: Option<&ProductId>) -> Result<Vec<Lot>, StockError> {
        let mut lots: Vec<Lot> = self
            .list()
            .await?
            .into_iter()
            .filter(|lot| product_id.map_or(true, |p| &lot.product_id == p))
            .collect();
        lots.sort_by(|a, b| {
            (&a.product_id, a.expires_at, a.id).cmp(&(&b.product_id, b.expires_at, b.id))
        });
        Ok(lots)
    }

    /// Allocates every line item in one transaction on the lot store.
    ///
    /// Returns the items with their allocations filled in. If any line cannot be
    /// covered, the whole transaction is discarded and no lot changes; the error names
    /// the line's product by display name.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn allocate_order(&self, items: Vec<LineItem>) -> Result<Vec<LineItem>, StockError> {
        debug!("Sending request");
        let outcome = self
            .inner
            .transact(move |tx| {
                let mut items = items;
                for item in items.iter_mut() {
                    item.allocations = allocate(tx.values_mut(), &item.product_id, item.quantity)
                        .map_err(|e| e.for_product(&item.name))?;
                }
                Ok::<_, StockError>(items)
            })
            .await
            .map_err(Self::map_error)?;

        if let Err(e) = &outcome {
            warn!(error = %e, "Allocation rejected");
        }
        outcome
    }

    /// Reloads persisted lots under their original ids, without auditing.
    #[instrument(skip(self, lots), fields(count = lots.len()))]
    pub async fn restore(&self, lots: Vec<Lot>) -> Result<usize, StockError> {
        self.inner.import(lots).await.map_err(Self::map_error)
    }

    async fn record(&self, action: AuditAction, id: LotId, details: AuditDetails) {
        let entry = AuditCreate {
            action,
            entity: "lot".into(),
            entity_id: id.to_string(),
            details,
        };
        if let Err(e) = self.audit.record(entry).await {
            warn!(error = %e, lot = %id, "Failed to write audit entry");
        }
    }
}

fn lot_details(lot: &Lot) -> AuditDetails {
    AuditDetails {
        product_name: lot.product_name.clone(),
        lot_code: lot.lot_code.clone(),
        expires_at: lot.expires_at,
        before_quantity: None,
        after_quantity: None,
    }
}

#[async_trait]
impl ActorClient<Lot> for StockClient {
    type Error = StockError;

    fn inner(&self) -> &ResourceClient<Lot> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<StockError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => StockError::NotFound(id),
            Err(other) => StockError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditEntry, AuditId, OrderItemRequest};
    use chrono::NaiveDate;
    use resource_actor::mock::MockClient;
    use resource_actor::Updated;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn saline_lots() -> Vec<Lot> {
        vec![
            Lot::new(LotId(1), ProductId::new("P"), "Saline", "A", date(2025, 1, 1), 5),
            Lot::new(LotId(2), ProductId::new("P"), "Saline", "B", date(2025, 2, 1), 10),
        ]
    }

    fn stock_client(lots: &MockClient<Lot>, audit: &MockClient<AuditEntry>) -> StockClient {
        StockClient::new(lots.client(), AuditClient::new(audit.client()))
    }

    #[tokio::test]
    async fn invalid_lot_is_rejected_before_reaching_the_actor() {
        let lots = MockClient::<Lot>::new();
        let audit = MockClient::<AuditEntry>::new();
        let stock = stock_client(&lots, &audit);

        let err = stock
            .add_stock_lot(LotCreate {
                product_id: ProductId::new("P"),
                product_name: "Saline".into(),
                lot_code: "A".into(),
                expires_at: date(2025, 1, 1),
                quantity: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StockError::InvalidInput(_)));
        lots.verify();
        audit.verify();
    }

    #[tokio::test]
    async fn allocation_commits_fefo_split() {
        let mut lots = MockClient::<Lot>::new();
        let audit = MockClient::<AuditEntry>::new();
        lots.expect_transact(saline_lots());
        let stock = stock_client(&lots, &audit);

        let items = vec![OrderItemRequest::new(ProductId::new("P"), "Saline", 7).into()];
        let allocated = stock.allocate_order(items).await.unwrap();

        let taken: Vec<(LotId, u32)> = allocated[0]
            .allocations
            .iter()
            .map(|a| (a.lot_id, a.quantity))
            .collect();
        assert_eq!(taken, vec![(LotId(1), 5), (LotId(2), 2)]);

        let mut committed = lots.committed().remove(0);
        committed.sort_by_key(|l| l.id);
        assert_eq!(committed[0].quantity, 0);
        assert_eq!(committed[1].quantity, 8);
        lots.verify();
    }

    #[tokio::test]
    async fn failed_line_discards_the_whole_transaction() {
        let mut lots = MockClient::<Lot>::new();
        let audit = MockClient::<AuditEntry>::new();
        lots.expect_transact(saline_lots());
        let stock = stock_client(&lots, &audit);

        let items = vec![
            OrderItemRequest::new(ProductId::new("P"), "Saline", 3).into(),
            OrderItemRequest::new(ProductId::new("Q"), "Gauze", 1).into(),
        ];
        let err = stock.allocate_order(items).await.unwrap_err();

        assert_eq!(
            err,
            StockError::InsufficientStock {
                product: "Gauze".into(),
                requested: 1,
                available: 0,
            }
        );
        assert!(lots.committed().is_empty());
    }

    #[tokio::test]
    async fn unknown_lot_maps_to_not_found() {
        let mut lots = MockClient::<Lot>::new();
        let audit = MockClient::<AuditEntry>::new();
        lots.expect_update(LotId(99))
            .return_err(FrameworkError::NotFound(LotId(99).to_string()));
        let stock = stock_client(&lots, &audit);

        let err = stock.adjust_stock_lot(LotId(99), 3).await.unwrap_err();

        assert_eq!(err, StockError::NotFound("lot_99".into()));
        audit.verify();
    }

    #[tokio::test]
    async fn audit_failure_does_not_undo_the_adjustment() {
        let mut lots = MockClient::<Lot>::new();
        let mut audit = MockClient::<AuditEntry>::new();
        let before = saline_lots().remove(0);
        let after = Lot {
            quantity: 2,
            ..before.clone()
        };
        lots.expect_update(LotId(1)).return_ok(Updated { before, after });
        audit.expect_create().return_err(FrameworkError::ActorClosed);
        let stock = stock_client(&lots, &audit);

        let lot = stock.adjust_stock_lot(LotId(1), 2).await.unwrap();

        assert_eq!(lot.quantity, 2);
        lots.verify();
        audit.verify();
    }

    #[tokio::test]
    async fn add_records_one_audit_entry() {
        let mut lots = MockClient::<Lot>::new();
        let mut audit = MockClient::<AuditEntry>::new();
        lots.expect_create().return_ok(LotId(4));
        audit.expect_create().return_ok(AuditId(1));
        let stock = stock_client(&lots, &audit);

        let id = stock
            .add_stock_lot(LotCreate {
                product_id: ProductId::new("P"),
                product_name: "Saline".into(),
                lot_code: "C".into(),
                expires_at: date(2025, 3, 1),
                quantity: 6,
            })
            .await
            .unwrap();

        assert_eq!(id, LotId(4));
        lots.verify();
        audit.verify();
    }
}
