use chrono::NaiveDate;
use fefo_fulfillment::clients::{ActorClient, AuditClient, OrderClient, StockClient};
use fefo_fulfillment::model::{
    AuditEntry, Lot, LotId, OrderId, OrderItemRequest, OrderStatus, ProductId,
};
use fefo_fulfillment::order_actor::{self, OrderError};
use resource_actor::mock::MockClient;

fn saline() -> ProductId {
    ProductId::new("SAL-500")
}

fn seeded_lots() -> Vec<Lot> {
    let day = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
    vec![
        Lot::new(LotId(1), saline(), "Saline 500ml", "A", day(1, 1), 5),
        Lot::new(LotId(2), saline(), "Saline 500ml", "B", day(2, 1), 10),
    ]
}

/// Real Order actor with a mocked lot store.
///
/// The order's `on_create` runs the allocation transaction against the mock's
/// seeded lots, so the test sees exactly what would have been committed. The two
/// cart rows are allocated in turn and then merged into one line item.
#[tokio::test]
async fn test_order_actor_with_mocked_stock() {
    let mut lots = MockClient::<Lot>::new();
    let audit = MockClient::<AuditEntry>::new();
    lots.expect_transact(seeded_lots());

    let stock = StockClient::new(lots.client(), AuditClient::new(audit.client()));
    let (order_actor, order_client) = order_actor::new(10);
    let order_client = OrderClient::new(order_client);
    let actor_handle = tokio::spawn(order_actor.run(stock));

    let id = order_client
        .place_order(
            "Ward 3",
            vec![
                OrderItemRequest::new(saline(), "Saline 500ml", 3),
                OrderItemRequest::new(saline(), "Saline 500ml", 4),
            ],
        )
        .await
        .unwrap();
    assert_eq!(id, OrderId(1));

    let order = order_client.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    let split: Vec<(&str, u32)> = order.items[0]
        .allocations
        .iter()
        .map(|a| (a.lot_code.as_str(), a.quantity))
        .collect();
    assert_eq!(split, vec![("A", 5), ("B", 2)]);

    let mut committed = lots.committed().remove(0);
    committed.sort_by_key(|l| l.id);
    assert_eq!(
        committed.iter().map(|l| l.quantity).collect::<Vec<_>>(),
        vec![0, 8]
    );

    lots.verify();
    audit.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_rejected_order_is_not_stored() {
    let mut lots = MockClient::<Lot>::new();
    let audit = MockClient::<AuditEntry>::new();
    lots.expect_transact(seeded_lots());

    let stock = StockClient::new(lots.client(), AuditClient::new(audit.client()));
    let (order_actor, order_client) = order_actor::new(10);
    let order_client = OrderClient::new(order_client);
    tokio::spawn(order_actor.run(stock));

    let err = order_client
        .place_order(
            "Ward 3",
            vec![OrderItemRequest::new(saline(), "Saline 500ml", 20)],
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::InsufficientStock {
            product_name: "Saline 500ml".into()
        }
    );
    assert!(lots.committed().is_empty());
    assert!(order_client.orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_order_never_reaches_stock() {
    // No expectations: any request to the lot store would fail the test.
    let lots = MockClient::<Lot>::new();
    let audit = MockClient::<AuditEntry>::new();

    let stock = StockClient::new(lots.client(), AuditClient::new(audit.client()));
    let (order_actor, order_client) = order_actor::new(10);
    let order_client = OrderClient::new(order_client);
    tokio::spawn(order_actor.run(stock));

    let empty = order_client.place_order("Ward 3", vec![]).await.unwrap_err();
    assert!(matches!(empty, OrderError::InvalidInput(_)));

    let zero = order_client
        .place_order(
            "Ward 3",
            vec![OrderItemRequest::new(saline(), "Saline 500ml", 0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(zero, OrderError::InvalidInput(_)));

    let anonymous = order_client
        .place_order("", vec![OrderItemRequest::new(saline(), "Saline 500ml", 1)])
        .await
        .unwrap_err();
    assert!(matches!(anonymous, OrderError::InvalidInput(_)));

    lots.verify();
}
