//! Session tokens for delegated signing.
//!
//! A client that cannot sign its own objects opens a session: the node
//! generates a key pair bound to the owner, keeps the private half in a
//! [`TokenStore`], and hands back the public [`SessionToken`]. Writes that
//! reference the session are signed by the node with that key until the
//! token's expiry epoch.

pub mod authorizer;
pub mod error;
pub mod store;

pub use authorizer::SessionAuthorizer;
pub use error::{SessionError, SessionResult};
pub use store::{PrivateToken, SessionRegistry, TokenStore};
