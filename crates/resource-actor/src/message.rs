use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::transaction::TransactionOp;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A boxed future that may borrow from the actor for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type-erased read-only request as it travels through the channel.
///
/// Receives a copy of every entity and a borrow of the actor's context; the reply
/// travels on a channel captured by the closure.
pub type InspectOp<T> =
    Box<dyn for<'a> FnOnce(Vec<T>, &'a <T as ActorEntity>::Context) -> BoxFuture<'a, ()> + Send>;

/// State of an entity on both sides of an update.
///
/// Callers that must record what changed (stock corrections, status transitions)
/// get it from the same message that made the change.
#[derive(Debug, Clone)]
pub struct Updated<T> {
    pub before: T,
    pub after: T,
}

/// Message type sent to a [`ResourceActor`](crate::ResourceActor).
///
/// The variants cover the lifecycle of a stored resource (CRUD), a custom
/// [`ActorEntity::Action`], and collection-level requests: `List` for snapshots,
/// `Inspect` for reads that must also consult the context, and `Transact` for
/// all-or-nothing mutations across many entities.
///
/// Generic over `T: ActorEntity`, so a lot payload can never be sent to the order actor.
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<Updated<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    /// Runs `op` against a working copy; the reply travels on a channel captured by `op`.
    Transact { op: TransactionOp<T> },
    /// Runs `op` over the collection and the context; no other request is handled
    /// until its future completes.
    Inspect { op: InspectOp<T> },
    /// Inserts entities under their existing ids.
    Import {
        items: Vec<T>,
        respond_to: Response<usize>,
    },
}

impl<T: ActorEntity> fmt::Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRequest::Create { params, .. } => {
                f.debug_struct("Create").field("params", params).finish()
            }
            ResourceRequest::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            ResourceRequest::List { .. } => f.write_str("List"),
            ResourceRequest::Update { id, update, .. } => f
                .debug_struct("Update")
                .field("id", id)
                .field("update", update)
                .finish(),
            ResourceRequest::Delete { id, .. } => {
                f.debug_struct("Delete").field("id", id).finish()
            }
            ResourceRequest::Action { id, action, .. } => f
                .debug_struct("Action")
                .field("id", id)
                .field("action", action)
                .finish(),
            ResourceRequest::Transact { .. } => f.write_str("Transact"),
            ResourceRequest::Inspect { .. } => f.write_str("Inspect"),
            ResourceRequest::Import { items, .. } => f
                .debug_struct("Import")
                .field("count", &items.len())
                .finish(),
        }
    }
}
