//! # Authentication
//!
//! HTTP Basic authentication against the users collection.

pub mod basic;
pub mod errors;
pub mod users;

pub use basic::Credentials;
pub use errors::{AuthError, AuthResult};
pub use users::UserDirectory;
