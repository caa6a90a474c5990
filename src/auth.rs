//! Credential models and the authentication levels they unlock.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
