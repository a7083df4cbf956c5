// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

/// Future returned by [`CallSpan::instrument`]; the span is attached only with `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; the span is attached only with `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// `catalog_broker.call` span covering one client operation.
///
/// The `outcome` field starts empty and is filled by [`CallSpan::finish`].
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens the span for `kind`, tagged with the caller's `stage`.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"catalog_broker.call",
				call = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Attaches the span to `fut` so no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records the terminal `outcome` and logs failures at debug level.
	pub fn finish(&self, outcome: CallOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if outcome == CallOutcome::Failure {
				self.span.in_scope(|| tracing::debug!("Client call failed."));
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}
}
