//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated Envoy metadata ([`ProviderDescriptor`]): the authorization,
//! token, and GraphQL endpoints derived from a host, the profile query, the scope separator,
//! and the client authentication method. `strategy` defines [`ProviderStrategy`], the hook set
//! the authorization-code flow calls to parse token errors and fetch profiles. `envoy` provides
//! the Envoy implementation of those hooks.

pub mod descriptor;
pub mod envoy;
pub mod strategy;

pub use descriptor::*;
pub use envoy::*;
pub use strategy::*;
