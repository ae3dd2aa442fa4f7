//! [`ActorEntity`] implementation for [`Lot`].
//!
//! Creation validates the payload before anything is stored; updates are manual
//! quantity corrections. Allocation does not go through these hooks: it runs as a
//! transaction over the whole collection (see [`StockClient::allocate_order`](crate::clients::StockClient::allocate_order)).

use super::error::StockError;
use crate::model::{Lot, LotCreate, LotId, LotUpdate};
use async_trait::async_trait;
use resource_actor::ActorEntity;

#[async_trait]
impl ActorEntity for Lot {
    type Id = LotId;
    type Create = LotCreate;
    type Update = LotUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = StockError;

    fn id(&self) -> &LotId {
        &self.id
    }

    /// Builds a lot from a stock-add request.
    ///
    /// # Errors
    /// `InvalidInput` when the quantity is zero or the product id, product name or
    /// lot code is blank.
    fn from_create_params(id: LotId, params: LotCreate) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(Self::new(
            id,
            params.product_id,
            params.product_name,
            params.lot_code,
            params.expires_at,
            params.quantity,
        ))
    }

    /// Overwrites the remaining quantity. Zero is allowed; the lot is kept.
    async fn on_update(&mut self, update: LotUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.quantity = update.quantity;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl LotCreate {
    /// Checks the payload without touching the store.
    pub fn validate(&self) -> Result<(), StockError> {
        if self.quantity == 0 {
            return Err(StockError::InvalidInput(
                "lot quantity must be positive".into(),
            ));
        }
        let required = [
            ("product_id", self.product_id.as_str()),
            ("product_name", self.product_name.as_str()),
            ("lot_code", self.lot_code.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(StockError::InvalidInput(format!("{field} is required")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;
    use chrono::NaiveDate;

    fn create(quantity: u32, lot_code: &str) -> LotCreate {
        LotCreate {
            product_id: ProductId::new("P"),
            product_name: "Saline 500ml".into(),
            lot_code: lot_code.into(),
            expires_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            quantity,
        }
    }

    #[test]
    fn rejects_zero_quantity() {
        let err = Lot::from_create_params(LotId(1), create(0, "A")).unwrap_err();
        assert!(matches!(err, StockError::InvalidInput(_)));
    }

    #[test]
    fn rejects_blank_lot_code() {
        let err = Lot::from_create_params(LotId(1), create(5, "  ")).unwrap_err();
        assert_eq!(err, StockError::InvalidInput("lot_code is required".into()));
    }

    #[tokio::test]
    async fn update_may_set_zero() {
        let mut lot = Lot::from_create_params(LotId(1), create(5, "A")).unwrap();
        lot.on_update(LotUpdate { quantity: 0 }, &()).await.unwrap();
        assert_eq!(lot.quantity, 0);
    }
}
