//! Admission results handed back by [`RequestGovernor::admit`](super::RequestGovernor::admit).

// std
use std::{
	task::{Context, Poll},
	time::Duration as StdDuration,
};
// crates.io
use tokio::sync::oneshot;
// self
use crate::_prelude::*;

/// Slot counts reported when an admission is granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admitted {
	/// Immediate admissions left in the current window.
	pub free_remaining: u32,
	/// Buffer positions left after this admission.
	pub buffer_remaining: u32,
}

/// Reasons an admission is not granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum AdmissionError {
	/// Buffer is full; the caller must not retry internally.
	#[error("Too many requests.")]
	QuotaExceeded,
	/// The buffer was cleared, or the runtime running the release timer shut down, before this
	/// admission was released.
	#[error("Admission was abandoned before it was released.")]
	Abandoned,
	/// Buffering needs a Tokio runtime to schedule the release timer.
	#[error("Admission could not be buffered outside of a Tokio runtime.")]
	RuntimeUnavailable,
}
impl AdmissionError {
	/// HTTP-equivalent status for the rejection, when one applies.
	pub const fn status_code(self) -> Option<u16> {
		match self {
			Self::QuotaExceeded => Some(429),
			Self::Abandoned | Self::RuntimeUnavailable => None,
		}
	}
}

/// Decision taken at the moment [`admit`](crate::governor::RequestGovernor::admit) ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmissionDecision {
	/// A quota slot was free.
	Immediate,
	/// Queued until a later window; `release_in` is the scheduled delay.
	Buffered {
		/// Delay between the decision and the scheduled release.
		release_in: StdDuration,
	},
	/// Buffer was full or buffering was impossible.
	Rejected,
}
impl AdmissionDecision {
	/// Stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Immediate => "immediate",
			Self::Buffered { .. } => "buffered",
			Self::Rejected => "rejected",
		}
	}
}

/// Future resolving once the governor grants or refuses an admission.
///
/// Immediate and rejected tickets are ready on first poll. Buffered tickets resolve when
/// their release timer fires.
///
/// A cleared admission is never granted, but its ticket does not stay pending forever either:
/// it resolves with [`AdmissionError::Abandoned`] so the awaiting task can finish. Callers
/// that treat a cleared call as "never runs" should simply drop the call on that error. The
/// same happens when the runtime that owns the release timer shuts down first.
#[derive(Debug)]
#[must_use = "an admission ticket does nothing unless awaited"]
pub struct AdmissionTicket {
	decision: AdmissionDecision,
	outcome: TicketOutcome,
}
impl AdmissionTicket {
	pub(crate) fn immediate(admitted: Admitted) -> Self {
		Self {
			decision: AdmissionDecision::Immediate,
			outcome: TicketOutcome::Ready(Ok(admitted)),
		}
	}

	pub(crate) fn rejected(error: AdmissionError) -> Self {
		Self { decision: AdmissionDecision::Rejected, outcome: TicketOutcome::Ready(Err(error)) }
	}

	pub(crate) fn buffered(release_in: StdDuration, receiver: oneshot::Receiver<Admitted>) -> Self {
		Self {
			decision: AdmissionDecision::Buffered { release_in },
			outcome: TicketOutcome::Pending(receiver),
		}
	}

	/// Decision recorded when the ticket was issued.
	pub fn decision(&self) -> AdmissionDecision {
		self.decision
	}

	/// Returns `true` when the ticket waits on a buffered release.
	pub fn is_buffered(&self) -> bool {
		matches!(self.decision, AdmissionDecision::Buffered { .. })
	}
}
impl Future for AdmissionTicket {
	type Output = Result<Admitted, AdmissionError>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match &mut self.get_mut().outcome {
			TicketOutcome::Ready(result) => Poll::Ready(*result),
			TicketOutcome::Pending(receiver) => Pin::new(receiver)
				.poll(cx)
				.map(|released| released.map_err(|_| AdmissionError::Abandoned)),
		}
	}
}

#[derive(Debug)]
enum TicketOutcome {
	Ready(Result<Admitted, AdmissionError>),
	Pending(oneshot::Receiver<Admitted>),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn quota_rejection_maps_to_too_many_requests() {
		assert_eq!(AdmissionError::QuotaExceeded.status_code(), Some(429));
		assert_eq!(AdmissionError::QuotaExceeded.to_string(), "Too many requests.");
		assert_eq!(AdmissionError::Abandoned.status_code(), None);
	}

	#[tokio::test]
	async fn dropped_sender_resolves_as_abandoned() {
		let (sender, receiver) = oneshot::channel();
		let ticket = AdmissionTicket::buffered(StdDuration::from_millis(10), receiver);

		assert!(ticket.is_buffered());
		assert_eq!(ticket.decision().as_str(), "buffered");

		drop(sender);

		assert_eq!(ticket.await, Err(AdmissionError::Abandoned));
	}

	#[tokio::test]
	async fn ready_tickets_resolve_without_a_timer() {
		let admitted = Admitted { free_remaining: 3, buffer_remaining: 2 };

		assert_eq!(AdmissionTicket::immediate(admitted).await, Ok(admitted));
		assert_eq!(
			AdmissionTicket::rejected(AdmissionError::QuotaExceeded).await,
			Err(AdmissionError::QuotaExceeded)
		);
	}
}
