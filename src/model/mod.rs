//! Plain data records. Each top-level type implements [`ActorEntity`](resource_actor::ActorEntity)
//! in its actor module; the shapes here are also the persisted record shapes.

pub mod audit;
pub mod lot;
pub mod order;

pub use audit::*;
pub use lot::*;
pub use order::*;
