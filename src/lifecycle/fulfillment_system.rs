use crate::audit_actor::{self, AuditError};
use crate::clients::{AuditClient, OrderClient, StockClient};
use crate::config::SystemConfig;
use crate::lot_actor::{self, StockError};
use crate::order_actor::{self, OrderError};
use crate::persistence::{PersistenceError, Snapshot, SnapshotStore};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Errors from starting, snapshotting or stopping the system as a whole.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// The running fulfillment engine: one Lot actor, one Order actor, one Audit actor.
///
/// # Example
///
/// ```ignore
/// let system = FulfillmentSystem::start(SystemConfig::from_env()?).await?;
///
/// let lot = system.stock_client.add_stock_lot(params).await?;
/// let order = system.order_client.place_order("Ward 3", items).await?;
///
/// system.persist().await?;
/// system.shutdown().await?;
/// ```
pub struct FulfillmentSystem {
    /// Lot store operations and allocation.
    pub stock_client: StockClient,

    /// Order placement and status changes.
    pub order_client: OrderClient,

    /// Read access to the audit log.
    pub audit_client: AuditClient,

    store: Option<SnapshotStore>,

    /// Order, lot, audit; the order shutdown waits in.
    handles: Vec<JoinHandle<()>>,
}

impl FulfillmentSystem {
    /// Spawns all actors with empty collections.
    pub fn new(config: &SystemConfig) -> Self {
        let capacity = config.channel_capacity;

        // 1. Create actors
        let (audit_actor, audit_client) = audit_actor::new(capacity);
        let (lot_actor, lot_client) = lot_actor::new(capacity);
        let (order_actor, order_client) = order_actor::new(capacity);

        let audit_client = AuditClient::new(audit_client);
        let stock_client = StockClient::new(lot_client, audit_client.clone());

        // 2. Spawn with injected context
        let audit_handle = tokio::spawn(audit_actor.run(()));
        let lot_handle = tokio::spawn(lot_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(stock_client.clone()));

        info!(capacity, data_dir = ?config.data_dir, "System started");

        Self {
            stock_client,
            order_client: OrderClient::new(order_client),
            audit_client,
            store: config.data_dir.clone().map(SnapshotStore::new),
            handles: vec![order_handle, lot_handle, audit_handle],
        }
    }

    /// Spawns all actors and reloads the snapshot from `config.data_dir`, if set.
    #[instrument(skip(config))]
    pub async fn start(config: SystemConfig) -> Result<Self, SystemError> {
        let system = Self::new(&config);
        if let Some(store) = &system.store {
            let snapshot = store.load().await?;
            system.restore(snapshot).await?;
        }
        Ok(system)
    }

    /// Loads a snapshot into the running actors, keeping every id.
    ///
    /// Orders come back with their allocations as recorded; stock is not
    /// re-allocated.
    pub async fn restore(&self, snapshot: Snapshot) -> Result<(), SystemError> {
        let audit = self.audit_client.restore(snapshot.audit).await?;
        let lots = self.stock_client.restore(snapshot.stock).await?;
        let orders = self.order_client.restore(snapshot.orders).await?;
        info!(lots, orders, audit, "Snapshot restored");
        Ok(())
    }

    /// Reads every collection, each sorted by id.
    ///
    /// Stock and orders are read together through the Order actor, so every unit is
    /// either still on a lot or on exactly one stored order.
    pub async fn snapshot(&self) -> Result<Snapshot, SystemError> {
        let (orders, stock) = self.order_client.orders_with_stock().await?;

        Ok(Snapshot {
            stock,
            orders,
            audit: self.audit_client.entries().await?,
        })
    }

    /// Writes the current state to `data_dir`. Does nothing when the system runs
    /// in memory only.
    #[instrument(skip(self))]
    pub async fn persist(&self) -> Result<(), SystemError> {
        let Some(store) = &self.store else {
            debug!("No data directory configured");
            return Ok(());
        };
        let snapshot = self.snapshot().await?;
        store.save(&snapshot).await?;
        Ok(())
    }

    /// Drops all clients and waits for every actor task to finish.
    ///
    /// # Errors
    /// `ActorFailed` if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.stock_client);
        drop(self.audit_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
