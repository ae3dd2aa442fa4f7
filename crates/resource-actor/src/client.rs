use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{BoxFuture, InspectOp, ResourceRequest, Updated};
use crate::transaction::{Transaction, TransactionOp};
use tokio::sync::{mpsc, oneshot};

/// A type-safe, cloneable handle to a [`ResourceActor`](crate::ResourceActor).
///
/// Holds only the channel sender, so cloning is cheap and clones can be shared
/// across tasks. Every method resolves once the actor has answered.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Creates an entity from `params` and returns its new id.
    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    /// Fetches one entity, `None` if the id is unknown.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Snapshot of every entity, in no particular order.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    /// Applies `update` and returns the entity before and after the change.
    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<Updated<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Removes an entity and returns it as it was just before removal.
    pub async fn delete(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    /// Runs a resource-specific action against one entity.
    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Restores entities under their existing ids. Returns how many were inserted.
    pub async fn import(&self, items: Vec<T>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Import { items, respond_to })
            .await
    }

    /// Runs `f` against a working copy of the whole collection.
    ///
    /// The copy is committed if `f` returns `Ok` and discarded otherwise. The outer
    /// `Result` reports channel failures; the inner one is whatever `f` returned.
    pub async fn transact<R, E, F>(&self, f: F) -> Result<Result<R, E>, FrameworkError>
    where
        R: Send + 'static,
        E: Send + 'static,
        F: FnOnce(&mut Transaction<T>) -> Result<R, E> + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let op: TransactionOp<T> = Box::new(move |tx| {
            let outcome = f(tx);
            let commit = outcome.is_ok();
            let _ = respond_to.send(outcome);
            commit
        });
        self.sender
            .send(ResourceRequest::Transact { op })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// Runs `f` over a copy of every entity together with the actor's context.
    ///
    /// The actor awaits the returned future before taking the next request, so
    /// nothing in this collection changes while `f` reads other actors through the
    /// context.
    pub async fn inspect<R, F>(&self, f: F) -> Result<R, FrameworkError>
    where
        R: Send + 'static,
        F: for<'a> FnOnce(Vec<T>, &'a T::Context) -> BoxFuture<'a, R> + Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let op = inspect_op::<T, _>(move |items, context| {
            Box::pin(async move {
                let outcome = f(items, context).await;
                let _ = respond_to.send(outcome);
            })
        });
        self.sender
            .send(ResourceRequest::Inspect { op })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

fn inspect_op<T, F>(f: F) -> InspectOp<T>
where
    T: ActorEntity,
    F: for<'a> FnOnce(Vec<T>, &'a T::Context) -> BoxFuture<'a, ()> + Send + 'static,
{
    Box::new(f)
}
