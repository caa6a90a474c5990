// self
use crate::obs::{GovernorEvent, RequestOutcome};

/// Records an API call outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("discogs_client_request_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Counts a governor decision via the global metrics recorder (when enabled).
pub fn count_governor_event(event: GovernorEvent) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("discogs_client_admission_total", "decision" => event.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = event;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_request_outcome(RequestOutcome::Failure);
		count_governor_event(GovernorEvent::Buffered);
	}
}
