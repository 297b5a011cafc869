//! Envoy OAuth 2.0 authentication strategy: authorization-code exchange, provider-aware token
//! error parsing, and GraphQL-backed profile normalization in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod graphql;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod options;
pub mod profile;
pub mod provider;

pub use flows::{Authentication, CallbackRequest, Strategy};
pub use options::StrategyOptions;
pub use profile::Profile;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
