//! Demo run of the fulfillment engine.
//!
//! Stocks two lots of one product, places an order that spans both, a second order
//! with duplicate cart rows, and one that cannot be covered. Then fulfils the first
//! order, prints what is left and shuts down. With `FEFO_DATA_DIR` set, the system
//! resumes from and writes back to that directory.

use chrono::NaiveDate;
use fefo_fulfillment::config::SystemConfig;
use fefo_fulfillment::lifecycle::{setup_tracing, FulfillmentSystem};
use fefo_fulfillment::model::{LotCreate, OrderItemRequest, OrderStatus, ProductId};
use tracing::{error, info, Instrument};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn lot(
    product: &ProductId,
    code: &str,
    expires: (i32, u32, u32),
    quantity: u32,
) -> Result<LotCreate, BoxError> {
    let (y, m, d) = expires;
    let expires_at = NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid expiry date")?;
    Ok(LotCreate {
        product_id: product.clone(),
        product_name: "Saline 500ml".to_string(),
        lot_code: code.to_string(),
        expires_at,
        quantity,
    })
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    info!(?config, "Starting fulfillment demo");
    let system = FulfillmentSystem::start(config).await?;

    let saline = ProductId::new("SAL-500");

    let span = tracing::info_span!("stocking");
    async {
        system
            .stock_client
            .add_stock_lot(lot(&saline, "A", (2025, 1, 1), 5)?)
            .await?;
        system
            .stock_client
            .add_stock_lot(lot(&saline, "B", (2025, 2, 1), 10)?)
            .await?;
        Ok::<_, BoxError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("order_processing");
    let first = async {
        let first = system
            .order_client
            .place_order(
                "Ward 3",
                vec![OrderItemRequest::new(saline.clone(), "Saline 500ml", 7)],
            )
            .await?;

        // Two rows for the same product end up as one line item of 3.
        system
            .order_client
            .place_order(
                "Ward 5",
                vec![
                    OrderItemRequest::new(saline.clone(), "Saline 500ml", 1),
                    OrderItemRequest::new(saline.clone(), "Saline 500ml", 2),
                ],
            )
            .await?;

        match system
            .order_client
            .place_order(
                "Ward 7",
                vec![OrderItemRequest::new(saline.clone(), "Saline 500ml", 20)],
            )
            .await
        {
            Ok(id) => info!(order = %id, "Unexpectedly placed"),
            Err(e) => error!(error = %e, "Order rejected"),
        }
        Ok::<_, BoxError>(first)
    }
    .instrument(span)
    .await?;

    system
        .order_client
        .set_status(first, OrderStatus::Fulfilled)
        .await?;

    for order in system.order_client.orders().await? {
        for item in &order.items {
            for alloc in &item.allocations {
                info!(
                    order = %order.id,
                    status = %order.status,
                    lot_code = %alloc.lot_code,
                    expires_at = %alloc.expires_at,
                    quantity = alloc.quantity,
                    "Allocation"
                );
            }
        }
    }
    for remaining in system.stock_client.query_stock(Some(&saline)).await? {
        info!(lot_code = %remaining.lot_code, quantity = remaining.quantity, "Stock left");
    }

    system.persist().await?;
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
