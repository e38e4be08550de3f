//! Credential management
//!
//! The [`TokenStore`] holds the current bearer credential; the
//! [`TokenRefresher`] renews it through a [`ports::TokenEndpoint`] with at
//! most one refresh in flight at a time.

pub mod ports;
pub mod refresher;
pub mod token_store;

pub use refresher::TokenRefresher;
pub use token_store::TokenStore;
