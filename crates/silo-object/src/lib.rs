//! Object ingestion, range hashing and streamed reads.
//!
//! Every write runs through a chain of [`ObjectTarget`] stages selected
//! when the header part arrives:
//!
//! ```text
//! signed object:    ValidatingTarget -> LocalTarget -> StorageEngine::put
//! session write:    PayloadSizeLimiter -> FormatTarget -> LocalTarget -> StorageEngine::put
//! ```
//!
//! The validation chain enforces the declared payload size, the node's
//! size limit and the declared checksum. The delegated chain trusts the
//! session: the node computes checksums itself and signs the object with
//! the session key. Either way the engine sees exactly one `put`, and only
//! after every check has passed.
//!
//! # Modules
//!
//! - [`target`] -- the [`ObjectTarget`] trait and the [`WriteChain`] shapes
//! - [`targets`] -- individual chain stages
//! - [`format`] -- [`FormatValidator`] and the tombstone delete hook
//! - [`put`] -- [`PutStream`] per-call state machine
//! - [`range`] -- [`RangeHasher`] for salted range digests
//! - [`read`] -- chunking and response sinks for streamed reads
//! - [`service`] -- [`ObjectService`] tying it together behind the container gate

pub mod config;
pub mod error;
pub mod format;
pub mod put;
pub mod range;
pub mod read;
pub mod service;
pub mod target;
pub mod targets;

pub use config::ObjectConfig;
pub use error::{ObjectError, ObjectResult};
pub use format::{DeleteHandler, EngineDeleteHandler, FormatValidator};
pub use put::PutStream;
pub use range::RangeHasher;
pub use read::{GetResponseStream, PayloadChunks, RangeResponseStream};
pub use service::ObjectService;
pub use target::{ObjectTarget, WriteChain};
