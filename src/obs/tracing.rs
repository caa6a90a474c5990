// self
use crate::{_prelude::*, governor::GovernorConfig, obs::GovernorEvent};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span builder used by the request pipeline.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the HTTP method + stage.
	pub fn new(method: &str, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("discogs_client.request", method, stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
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
}

/// Emits a debug event for a governor decision.
pub fn trace_governor_event(event: GovernorEvent, buffered: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			target: "discogs_client::governor",
			decision = event.as_str(),
			buffered,
			"governor decision"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (event, buffered);
	}
}

/// Emits a debug event describing the governor's new limits.
pub fn trace_reconfigure(config: &GovernorConfig) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			target: "discogs_client::governor",
			max_calls_per_interval = config.max_calls_per_interval,
			max_buffered_requests = config.max_buffered_requests,
			interval_ms = u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
			"governor reconfigured"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = config;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn governor_events_trace_without_subscriber() {
		trace_governor_event(GovernorEvent::Cleared, 0);
		trace_reconfigure(&GovernorConfig::default());
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new("GET", "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
