// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{CallKind, CallOutcome};

/// Counter incremented once per attempt and once per terminal outcome.
pub const CALL_TOTAL: &str = "catalog_broker_call_total";
/// Histogram of completed call latency in seconds, labeled by terminal outcome.
pub const CALL_DURATION_SECONDS: &str = "catalog_broker_call_duration_seconds";

/// Bumps [`CALL_TOTAL`] for `kind` + `outcome`. No-op without the `metrics` feature.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(CALL_TOTAL, "call" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records `elapsed` into [`CALL_DURATION_SECONDS`]. Attempts are not timed.
pub fn record_call_duration(kind: CallKind, outcome: CallOutcome, elapsed: StdDuration) {
	if outcome == CallOutcome::Attempt {
		return;
	}

	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			CALL_DURATION_SECONDS,
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, elapsed);
	}
}
