//! Container registry for the silo object node.
//!
//! Containers are the namespaces objects live in. The object service never
//! reads or writes an object whose container is unknown; the check goes
//! through the [`ContainerSource`] trait, which the in-memory registry
//! implements.
//!
//! # Modules
//!
//! - [`error`] — Error types for container operations
//! - [`types`] — The [`Container`] description and its id
//! - [`traits`] — The [`ContainerSource`] gate interface
//! - [`memory`] — In-memory [`InMemoryContainers`] registry

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{ContainerError, Result};
pub use memory::InMemoryContainers;
pub use traits::ContainerSource;
pub use types::{Container, RESERVED_PREFIX};
