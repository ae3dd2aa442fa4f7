use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Updated};
use crate::transaction::Transaction;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns a collection of entities.
///
/// This is the server half: it owns the `store` and the receiving end of the channel.
/// Every request is processed to completion before the next one is received, so the
/// store needs no lock, and a `Transact` request is never interleaved with a
/// concurrent create, update or delete on the same collection.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2.  **Wire**: pass dependencies (other clients) to `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on a Tokio task.
///
/// ```rust
/// use resource_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Bin { id: u32, count: u32 }
/// #[derive(Debug)] struct BinCreate { count: u32 }
/// #[derive(Debug, thiserror::Error)] #[error("bin error")] struct BinError;
///
/// #[async_trait]
/// impl ActorEntity for Bin {
///     type Id = u32;
///     type Create = BinCreate;
///     type Update = u32;
///     type Action = ();
///     type ActionResult = ();
///     type Context = ();
///     type Error = BinError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn from_create_params(id: u32, p: BinCreate) -> Result<Self, BinError> {
///         Ok(Self { id, count: p.count })
///     }
///     async fn on_update(&mut self, count: u32, _: &()) -> Result<(), BinError> {
///         self.count = count;
///         Ok(())
///     }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), BinError> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Bin>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(BinCreate { count: 3 }).await.unwrap();
///     let changed = client.update(id, 5).await.unwrap();
///     assert_eq!((changed.before.count, changed.after.count), (3, 5));
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the channel capacity; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// `context` is passed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Short type name ("Lot" rather than "fefo_fulfillment::model::lot::Lot")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.next_id += 1;
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        // Hooks work on a copy so a failed update leaves the entity untouched
                        let before = item.clone();
                        let mut candidate = item.clone();
                        if let Err(e) = candidate.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        *item = candidate.clone();
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(Updated {
                            before,
                            after: candidate,
                        }));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        match self.store.remove(&id) {
                            Some(removed) => {
                                info!(entity_type, %id, size = self.store.len(), "Deleted");
                                let _ = respond_to.send(Ok(removed));
                            }
                            None => {
                                let _ =
                                    respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                            }
                        }
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Transact { op } => {
                    let mut tx = Transaction::begin(self.store.clone());
                    if op(&mut tx) {
                        self.store = tx.into_inner();
                        info!(entity_type, size = self.store.len(), "Transaction committed");
                    } else {
                        warn!(entity_type, "Transaction discarded");
                    }
                }
                ResourceRequest::Inspect { op } => {
                    debug!(entity_type, size = self.store.len(), "Inspect");
                    op(self.store.values().cloned().collect(), &context).await;
                }
                ResourceRequest::Import { items, respond_to } => {
                    let count = items.len();
                    for item in items {
                        let id = item.id().clone();
                        let seq: u32 = id.clone().into();
                        self.next_id = self.next_id.max(seq.saturating_add(1));
                        self.store.insert(id, item);
                    }
                    info!(entity_type, count, next_id = self.next_id, "Imported");
                    let _ = respond_to.send(Ok(count));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
