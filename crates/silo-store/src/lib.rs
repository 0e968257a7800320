//! Object model and local storage engines for the silo object node.
//!
//! An [`Object`] is a [`Header`], an optional [`ObjectSignature`] over its
//! id, and an opaque payload. The id is the domain-separated BLAKE3 hash
//! of the canonical header encoding, so neither the payload nor the
//! signature contribute to identity.
//!
//! # Storage Backends
//!
//! All backends implement the [`StorageEngine`] trait:
//!
//! - [`InMemoryEngine`] -- `HashMap`-based engine for tests and embedding
//! - [`FsEngine`] -- one CRC-framed file per object under a root directory
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; repeated `put` is a no-op.
//! 2. Removal is logical: tombstones inhume objects into a graveyard.
//! 3. Concurrent reads are always safe.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod filter;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use filter::{MatchOp, SearchFilter, KEY_OBJECT_TYPE, KEY_OWNER_ID};
pub use fs::FsEngine;
pub use memory::InMemoryEngine;
pub use object::{
    Attribute, Header, HeaderView, Object, ObjectSignature, ObjectType, Tombstone,
    CURRENT_VERSION,
};
pub use traits::StorageEngine;
