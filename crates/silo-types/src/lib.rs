//! Foundation types for the silo object node.
//!
//! Every other silo crate depends on `silo-types`. Nothing here performs
//! I/O; the only shared mutable state is the atomic [`NetworkState`] epoch
//! counter.
//!
//! # Key Types
//!
//! - [`ObjectId`] — content-derived object identifier
//! - [`ContainerId`] — container identifier
//! - [`OwnerId`] — owner identity derived from a public key
//! - [`Address`] — container + object pair
//! - [`Epoch`] — logical network time used for expiry
//! - [`ChecksumType`] / [`Checksum`] — payload checksum algorithm tags
//! - [`Range`] — payload byte range
//! - [`SessionToken`] — public part of a delegated-signing session

#[macro_use]
mod macros;

pub mod address;
pub mod checksum;
pub mod container;
pub mod epoch;
pub mod error;
pub mod identity;
pub mod object;
pub mod range;
pub mod session;

pub use address::Address;
pub use checksum::{Checksum, ChecksumType};
pub use container::ContainerId;
pub use epoch::{Epoch, EpochSource, NetworkState};
pub use error::TypeError;
pub use identity::OwnerId;
pub use object::ObjectId;
pub use range::Range;
pub use session::{SessionId, SessionToken};
