//! Keyspace layout for the weir multi-tenant run queue.
//!
//! Weir stores its queue state in a Redis-Cluster-compatible store under
//! flat string keys. This crate is the addressing authority the rest of the
//! system builds on: it composes keys from hierarchical tenant identifiers
//! (organization → project → environment → queue → optional concurrency
//! partition), produces wildcard patterns over whole key families for
//! enumeration sweeps, and parses composed keys back into their
//! identifiers.
//!
//! The crate performs no I/O and holds no mutable state. The storage
//! backend, dequeue scheduling, concurrency enforcement, and tenant
//! resolution are all external collaborators that consume the keys built
//! here.

pub mod keys;
pub mod scope;
pub mod settings;

pub use keys::{KeyPart, KeyProducer, QueueDescriptor};
pub use scope::{AuthenticatedEnvironment, EnvDescriptor, EnvScope, Organization, Project};
pub use settings::{ConfigError, KeyspaceConfig};
