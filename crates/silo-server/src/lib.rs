//! HTTP node for the silo object store.
//!
//! Wires a storage engine, the container and session registries and the
//! network epoch into an [`silo_object::ObjectService`], and serves it
//! over axum. Streamed calls use [`silo_protocol::WireCodec`] frames as
//! request or response bodies; unary calls use JSON.

pub mod config;
pub mod error;
pub mod handler;
pub mod node;
pub mod router;
pub mod server;
pub mod stream;

pub use config::{NetworkConfig, NodeConfig, ServerConfig, StorageBackend, StorageConfig};
pub use error::{ServerError, ServerResult};
pub use node::Node;
pub use server::SiloServer;
