//! Optional observability helpers for the request pipeline and the governor.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every API call inside a `discogs_client.request` span (fields
//!   `method` and `stage`) and to emit debug events for governor decisions.
//! - Enable `metrics` to increment `discogs_client_request_total` (labeled by `outcome`) and
//!   `discogs_client_admission_total` (labeled by `decision`).

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::{_prelude::*, governor::GovernorConfig};

/// Governor decisions observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GovernorEvent {
	/// Admitted from a free slot.
	Immediate,
	/// Parked in the buffer.
	Buffered,
	/// Released from the buffer by its timer.
	Released,
	/// Refused because the buffer was full.
	Rejected,
	/// Refused because no Tokio runtime could schedule the release timer.
	RuntimeUnavailable,
	/// Buffer emptied by an explicit clear.
	Cleared,
}
impl GovernorEvent {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GovernorEvent::Immediate => "immediate",
			GovernorEvent::Buffered => "buffered",
			GovernorEvent::Released => "released",
			GovernorEvent::Rejected => "rejected",
			GovernorEvent::RuntimeUnavailable => "runtime_unavailable",
			GovernorEvent::Cleared => "cleared",
		}
	}
}
impl Display for GovernorEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to the request pipeline.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a governor decision through every enabled backend.
pub fn record_governor_event(event: GovernorEvent, buffered: usize) {
	count_governor_event(event);
	trace_governor_event(event, buffered);
}

/// Records a governor reconfiguration through every enabled backend.
pub fn record_reconfigure(config: &GovernorConfig) {
	trace_reconfigure(config);
}
