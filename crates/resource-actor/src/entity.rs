use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by a [`ResourceActor`](crate::ResourceActor).
///
/// One trait covers every resource type (lots, orders, audit entries), so the
/// message loop in [`ResourceActor::run`](crate::ResourceActor::run) is written once.
///
/// # Async & Context
/// Hooks are `async` so an entity can call other actors while it is being created
/// (an order allocating stock, for instance). The `Context` is handed to `run()`
/// rather than `new()`, which lets actors be wired after they are constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier issued from the actor's `u32` sequence.
    ///
    /// `Into<u32>` is needed to move the sequence past imported ids.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32> + Into<u32>;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into the actor at `run()` time. Use `()` for none.
    type Context: Send + Sync;

    /// Per-resource error type.
    ///
    /// Errors cross the channel boxed inside [`FrameworkError::EntityError`](crate::FrameworkError::EntityError)
    /// and can be recovered with [`FrameworkError::downcast_entity`](crate::FrameworkError::downcast_entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// The entity's identifier.
    fn id(&self) -> &Self::Id;

    /// Construct the entity from its id and payload. Runs before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the entity is stored.
    /// An error here means the entity is never inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
