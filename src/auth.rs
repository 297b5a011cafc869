//! Credential-domain models: requested scopes, redacted secrets, and issued token grants.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::*;
