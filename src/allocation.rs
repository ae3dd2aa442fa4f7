//! # FEFO Allocation Engine
//!
//! Decides which lots satisfy a requested quantity of one product, first-expiry-first-out.
//!
//! The engine is a pair of pure functions with no I/O and no knowledge of actors:
//!
//! - [`allocate`] walks the product's lots in `(expires_at, id)` order, takes
//!   `min(remaining, still_needed)` from each and decrements the lots in place.
//! - [`merge_line_items`] collapses allocated cart rows for the same product into one
//!   line item, concatenating their allocations in the order they were made.
//!
//! Atomicity is the caller's job: [`StockClient::allocate_order`](crate::clients::StockClient::allocate_order)
//! runs the engine inside a [`Transaction`](resource_actor::Transaction), whose working
//! copy is dropped if any line fails. The engine additionally checks availability
//! before touching anything, so even a bare slice of lots is left unchanged on
//! `InsufficientStock`.

use crate::lot_actor::StockError;
use crate::model::{AllocationRecord, LineItem, Lot, ProductId};
use tracing::debug;

/// Takes `needed` units of `product_id` from `lots`, earliest expiry first.
///
/// Lots of other products and lots with nothing left are skipped, whatever the caller
/// passed in. Lots expiring on the same day are consumed in id order. A lot that is
/// emptied stays in place with quantity zero.
///
/// # Errors
/// - `InvalidInput` if `needed` is zero.
/// - `InsufficientStock` if the product's lots hold fewer than `needed` units; no lot
///   is modified in that case.
pub fn allocate<'a, I>(
    lots: I,
    product_id: &ProductId,
    needed: u32,
) -> Result<Vec<AllocationRecord>, StockError>
where
    I: IntoIterator<Item = &'a mut Lot>,
{
    if needed == 0 {
        return Err(StockError::InvalidInput(format!(
            "requested quantity for {product_id} must be positive"
        )));
    }

    let mut candidates: Vec<&mut Lot> = lots
        .into_iter()
        .filter(|lot| &lot.product_id == product_id && lot.is_available())
        .collect();
    candidates.sort_by_key(|lot| (lot.expires_at, lot.id));

    let available: u64 = candidates.iter().map(|lot| u64::from(lot.quantity)).sum();
    if available < u64::from(needed) {
        return Err(StockError::InsufficientStock {
            product: product_id.to_string(),
            requested: needed,
            available: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut still_needed = needed;
    let mut records = Vec::new();
    for lot in candidates {
        if still_needed == 0 {
            break;
        }
        let take = lot.quantity.min(still_needed);
        lot.quantity -= take;
        still_needed -= take;
        debug!(lot = %lot.id, lot_code = %lot.lot_code, take, left = lot.quantity, "Lot allocated");
        records.push(AllocationRecord {
            lot_id: lot.id,
            lot_code: lot.lot_code.clone(),
            expires_at: lot.expires_at,
            quantity: take,
        });
    }

    Ok(records)
}

/// Collapses line items for the same product into one, keeping the order in which
/// products first appear. Quantities are summed and allocations appended; the first
/// row's name and price win. A record that continues the lot the previous record
/// came from is folded into it, so rows of 3 and 4 against lots of 5 and 10 read
/// A5, B2 just like a single row of 7.
///
/// Sums saturate. Orders reject per-product totals past `u32::MAX` before any stock
/// is allocated, so saturation is never reached from `place_order`.
pub fn merge_line_items(rows: Vec<LineItem>) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::with_capacity(rows.len());
    for row in rows {
        match items
            .iter_mut()
            .find(|item| item.product_id == row.product_id)
        {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(row.quantity);
                for record in row.allocations {
                    match item.allocations.last_mut() {
                        Some(last) if last.lot_id == record.lot_id => {
                            last.quantity = last.quantity.saturating_add(record.quantity);
                        }
                        _ => item.allocations.push(record),
                    }
                }
            }
            None => items.push(row),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderItemRequest;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn lot(id: u32, product: &str, code: &str, expires: &str, quantity: u32) -> Lot {
        Lot::new(
            id.into(),
            ProductId::new(product),
            "Saline 500ml",
            code,
            date(expires),
            quantity,
        )
    }

    fn p() -> ProductId {
        ProductId::new("P")
    }

    #[test]
    fn takes_earliest_expiry_first() {
        let mut lots = vec![
            lot(1, "P", "B", "2025-02-01", 10),
            lot(2, "P", "A", "2025-01-01", 5),
        ];

        let records = allocate(lots.iter_mut(), &p(), 7).unwrap();

        let taken: Vec<(&str, u32)> = records
            .iter()
            .map(|r| (r.lot_code.as_str(), r.quantity))
            .collect();
        assert_eq!(taken, vec![("A", 5), ("B", 2)]);
        assert_eq!(lots[1].quantity, 0, "lot A is emptied but kept");
        assert_eq!(lots[0].quantity, 8);
    }

    #[test]
    fn insufficient_stock_leaves_lots_untouched() {
        let mut lots = vec![
            lot(1, "P", "A", "2025-01-01", 5),
            lot(2, "P", "B", "2025-02-01", 10),
        ];

        let err = allocate(lots.iter_mut(), &p(), 20).unwrap_err();

        assert_eq!(
            err,
            StockError::InsufficientStock {
                product: "P".into(),
                requested: 20,
                available: 15,
            }
        );
        assert_eq!(lots[0].quantity, 5);
        assert_eq!(lots[1].quantity, 10);
    }

    #[test]
    fn zero_request_is_invalid() {
        let mut lots = vec![lot(1, "P", "A", "2025-01-01", 5)];
        assert!(matches!(
            allocate(lots.iter_mut(), &p(), 0),
            Err(StockError::InvalidInput(_))
        ));
        assert_eq!(lots[0].quantity, 5);
    }

    #[test]
    fn ignores_other_products_and_empty_lots() {
        let mut lots = vec![
            lot(1, "Q", "X", "2024-06-01", 50),
            lot(2, "P", "EMPTY", "2024-07-01", 0),
            lot(3, "P", "A", "2025-01-01", 4),
        ];

        let records = allocate(lots.iter_mut(), &p(), 4).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lot_code, "A");
        assert_eq!(lots[0].quantity, 50);
    }

    #[test]
    fn equal_expiry_breaks_ties_by_lot_id() {
        let mut lots = vec![
            lot(9, "P", "LATE-ID", "2025-01-01", 3),
            lot(4, "P", "EARLY-ID", "2025-01-01", 3),
        ];

        let records = allocate(lots.iter_mut(), &p(), 4).unwrap();

        assert_eq!(records[0].lot_code, "EARLY-ID");
        assert_eq!(records[0].quantity, 3);
        assert_eq!(records[1].lot_code, "LATE-ID");
        assert_eq!(records[1].quantity, 1);
    }

    #[test]
    fn exact_fit_stops_without_touching_later_lots() {
        let mut lots = vec![
            lot(1, "P", "A", "2025-01-01", 5),
            lot(2, "P", "B", "2025-02-01", 10),
        ];

        let records = allocate(lots.iter_mut(), &p(), 5).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(lots[0].quantity, 0);
        assert_eq!(lots[1].quantity, 10);
    }

    #[test]
    fn merge_collapses_duplicate_products_in_first_seen_order() {
        let mut lots = vec![
            lot(1, "P", "A", "2025-01-01", 5),
            lot(2, "P", "B", "2025-02-01", 10),
            lot(3, "Q", "G", "2025-03-01", 4),
        ];
        let mut rows: Vec<LineItem> = vec![
            OrderItemRequest::new(ProductId::new("P"), "Saline", 3).with_price(2.5).into(),
            OrderItemRequest::new(ProductId::new("Q"), "Gauze", 1).into(),
            OrderItemRequest::new(ProductId::new("P"), "Saline", 4).into(),
        ];
        for row in rows.iter_mut() {
            row.allocations = allocate(lots.iter_mut(), &row.product_id, row.quantity).unwrap();
        }

        let merged = merge_line_items(rows);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id, ProductId::new("P"));
        assert_eq!(merged[0].quantity, 7);
        assert_eq!(merged[0].unit_price, Some(2.5));
        let taken: Vec<(&str, u32)> = merged[0]
            .allocations
            .iter()
            .map(|r| (r.lot_code.as_str(), r.quantity))
            .collect();
        assert_eq!(taken, vec![("A", 5), ("B", 2)]);
        assert_eq!(merged[1].allocated(), 1);
    }

    #[test]
    fn merge_saturates_instead_of_overflowing() {
        let rows: Vec<LineItem> = vec![
            OrderItemRequest::new(ProductId::new("P"), "Saline", u32::MAX).into(),
            OrderItemRequest::new(ProductId::new("P"), "Saline", 1).into(),
        ];

        let merged = merge_line_items(rows);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, u32::MAX);
    }

    mod proptest_tests {
        use super::*;
        use crate::model::LotId;
        use chrono::Days;
        use proptest::prelude::*;

        fn arb_lots() -> impl Strategy<Value = Vec<Lot>> {
            prop::collection::vec((0u8..3, 0u64..90, 0u32..25), 0..12).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (product, day, quantity))| {
                        let expires = date("2025-01-01") + Days::new(day);
                        Lot::new(
                            LotId::from(i as u32 + 1),
                            ProductId::new(format!("P{product}")),
                            "Product",
                            format!("L{i}"),
                            expires,
                            quantity,
                        )
                    })
                    .collect()
            })
        }

        fn stock_of(lots: &[Lot], product: &ProductId) -> u32 {
            lots.iter()
                .filter(|l| &l.product_id == product)
                .map(|l| l.quantity)
                .sum()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: a successful allocation hands out exactly what was asked for
            /// and removes exactly that much from the product's lots.
            #[test]
            fn allocation_conserves_quantity(mut lots in arb_lots(), needed in 1u32..120) {
                let target = ProductId::new("P0");
                let before = stock_of(&lots, &target);

                match allocate(lots.iter_mut(), &target, needed) {
                    Ok(records) => {
                        let handed_out: u32 = records.iter().map(|r| r.quantity).sum();
                        prop_assert_eq!(handed_out, needed);
                        prop_assert!(records.iter().all(|r| r.quantity > 0));
                        prop_assert_eq!(stock_of(&lots, &target), before - needed);
                    }
                    Err(StockError::InsufficientStock { available, .. }) => {
                        prop_assert!(before < needed);
                        prop_assert_eq!(available, before);
                        prop_assert_eq!(stock_of(&lots, &target), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {other}"),
                }
            }

            /// Property: no later-expiring lot is touched while an earlier one still has stock.
            #[test]
            fn allocation_is_first_expiry_first_out(mut lots in arb_lots(), needed in 1u32..120) {
                let target = ProductId::new("P0");
                let original = lots.clone();

                if let Ok(records) = allocate(lots.iter_mut(), &target, needed) {
                    for pair in records.windows(2) {
                        prop_assert!((pair[0].expires_at, pair[0].lot_id) < (pair[1].expires_at, pair[1].lot_id));
                    }
                    // Every lot before the last one used must have been drained.
                    if let Some(last) = records.last() {
                        for (now, was) in lots.iter().zip(original.iter()) {
                            if was.product_id == target
                                && was.quantity > 0
                                && (was.expires_at, was.id) < (last.expires_at, last.lot_id)
                            {
                                prop_assert_eq!(now.quantity, 0);
                            }
                        }
                    }
                }
            }

            /// Property: lots of other products are never modified.
            #[test]
            fn allocation_leaves_other_products_alone(mut lots in arb_lots(), needed in 1u32..120) {
                let target = ProductId::new("P1");
                let original = lots.clone();

                let _ = allocate(lots.iter_mut(), &target, needed);

                for (now, was) in lots.iter().zip(original.iter()) {
                    if was.product_id != target {
                        prop_assert_eq!(now.quantity, was.quantity);
                    }
                    prop_assert!(now.quantity <= was.quantity);
                }
            }
        }
    }
}
