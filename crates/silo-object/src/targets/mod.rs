//! Write target stages.
//!
//! - [`ValidatingTarget`] -- size, checksum and format checks for client-signed objects
//! - [`PayloadSizeLimiter`] -- running byte limit
//! - [`FormatTarget`] -- completes and signs the header with a session key
//! - [`LocalTarget`] -- buffers the payload and performs the single engine `put`

pub mod format;
pub mod limiter;
pub mod local;
pub mod validating;

pub use format::FormatTarget;
pub use limiter::PayloadSizeLimiter;
pub use local::LocalTarget;
pub use validating::ValidatingTarget;
