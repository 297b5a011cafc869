//! Optional observability helpers for authentication flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `envoy_oauth2.flow` with the `flow` (stage
//!   kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `envoy_oauth2_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.
//!
//! Nothing here logs errors; failures are only counted and returned to the caller.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow stages observed by the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Full `authenticate` call.
	Authenticate,
	/// Authorization-code exchange against the token endpoint.
	TokenExchange,
	/// GraphQL profile fetch.
	UserProfile,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authenticate => "authenticate",
			FlowKind::TokenExchange => "token_exchange",
			FlowKind::UserProfile => "user_profile",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Recoverable authentication failure (for example a user denial).
	Rejected,
	/// Error propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Rejected => "rejected",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a flow span, recording the attempt and its success or failure.
pub async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	observe_with(kind, stage, fut, |_| FlowOutcome::Success).await
}

/// Like [`observe`], but `classify` picks the single outcome recorded for an `Ok` value.
pub async fn observe_with<T, Fut, F>(
	kind: FlowKind,
	stage: &'static str,
	fut: Fut,
	classify: F,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
	F: FnOnce(&T) -> FlowOutcome,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = match &result {
		Ok(value) => classify(value),
		Err(_) => FlowOutcome::Failure,
	};

	record_flow_outcome(kind, outcome);

	result
}
