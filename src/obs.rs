//! Spans and recorder metrics for auth and catalog calls.
//!
//! # Feature Flags
//!
//! - `tracing` (default) wraps each call in a `catalog_broker.call` span carrying `call`,
//!   `stage`, and the terminal `outcome`.
//! - `metrics` feeds [`CALL_TOTAL`] and the [`CALL_DURATION_SECONDS`] latency histogram.
//!
//! Per-client tallies that need no recorder live on the clients themselves.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Client-credentials authentication.
	Authenticate,
	/// Ticket refresh.
	Refresh,
	/// Bearer token resolution (cache hit, authenticate, or refresh).
	AccessToken,
	/// Full catalog listing.
	ListProducts,
	/// Batch lookup by product code.
	GetProducts,
	/// Single product lookup.
	GetProduct,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Authenticate => "authenticate",
			CallKind::Refresh => "refresh",
			CallKind::AccessToken => "access_token",
			CallKind::ListProducts => "list_products",
			CallKind::GetProducts => "get_products",
			CallKind::GetProduct => "get_product",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a call span, recording the attempt, the outcome, and its latency.
pub(crate) async fn observe<T, E, Fut>(
	kind: CallKind,
	stage: &'static str,
	fut: Fut,
) -> Result<T, E>
where
	Fut: Future<Output = Result<T, E>>,
{
	let span = CallSpan::new(kind, stage);
	let started = Instant::now();

	record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure };

	span.finish(outcome);
	record_call_outcome(kind, outcome);
	record_call_duration(kind, outcome, started.elapsed());

	result
}
