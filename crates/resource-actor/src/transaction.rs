//! Working-copy transactions over an actor's whole collection.
//!
//! A [`Transaction`] is built from a clone of the actor's store. The closure passed to
//! [`ResourceClient::transact`](crate::ResourceClient::transact) mutates the copy freely;
//! the actor swaps the copy in only when the closure returns `Ok`. While the closure
//! runs the actor handles no other message, so the read-mutate-commit sequence is a
//! single critical section.

use crate::entity::ActorEntity;
use std::collections::HashMap;

/// Type-erased transaction body as it travels through the channel.
///
/// Returns `true` when the working copy should be committed.
pub type TransactionOp<T> = Box<dyn FnOnce(&mut Transaction<T>) -> bool + Send>;

/// A mutable working copy of an actor's entities.
pub struct Transaction<T: ActorEntity> {
    working: HashMap<T::Id, T>,
}

impl<T: ActorEntity> Transaction<T> {
    /// Starts a transaction over `working`, which must be a copy the caller is
    /// prepared to discard.
    pub fn begin(working: HashMap<T::Id, T>) -> Self {
        Self { working }
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.working.get(id)
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.working.get_mut(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.working.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.working.values_mut()
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Consumes the transaction, yielding the (possibly mutated) collection.
    pub fn into_inner(self) -> HashMap<T::Id, T> {
        self.working
    }
}
