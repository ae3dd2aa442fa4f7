//! Audit log: an append-only [`ResourceActor<AuditEntry>`].

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::AuditEntry;
use resource_actor::{ResourceActor, ResourceClient};

/// Creates a new audit actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<AuditEntry>, ResourceClient<AuditEntry>) {
    ResourceActor::new(buffer_size)
}
