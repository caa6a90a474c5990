// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use parking_lot::Mutex;
use tokio::time::Instant;
// self
use discogs_client::governor::{
	AdmissionDecision, AdmissionError, GovernorConfig, GovernorConfigPatch, GovernorStatus,
	RequestGovernor,
};

fn governor(max_buffered: u32, max_calls: u32, interval_ms: u64) -> RequestGovernor {
	RequestGovernor::new(GovernorConfig::new(
		max_buffered,
		max_calls,
		StdDuration::from_millis(interval_ms),
	))
}

#[tokio::test(start_paused = true)]
async fn overload_scenario_admits_buffers_then_rejects() {
	let governor = governor(2, 5, 5_000);

	for expected in [4, 3, 2, 1, 0] {
		let admitted = governor.admit().await.expect("Calls within quota should be admitted.");

		assert_eq!(admitted.free_remaining, expected);
		assert_eq!(admitted.buffer_remaining, 2);
	}

	let sixth = governor.admit();

	assert!(sixth.is_buffered());
	assert_eq!(governor.status().buffer_remaining, 1);

	let seventh = governor.admit();

	assert!(seventh.is_buffered());
	assert_eq!(governor.status().buffer_remaining, 0);

	let eighth = governor.admit();

	assert_eq!(eighth.decision(), AdmissionDecision::Rejected);

	let err = eighth.await.expect_err("A full buffer should reject the call.");

	assert_eq!(err, AdmissionError::QuotaExceeded);
	assert_eq!(err.status_code(), Some(429));
	assert_eq!(governor.status().buffered, 2);

	governor.clear();

	assert_eq!(
		governor.status(),
		GovernorStatus { free_remaining: 0, buffered: 0, buffer_remaining: 2 }
	);
	assert_eq!(sixth.await, Err(AdmissionError::Abandoned));
	assert_eq!(seventh.await, Err(AdmissionError::Abandoned));
}

#[tokio::test(start_paused = true)]
async fn buffered_admissions_release_in_fifo_order() {
	let governor = governor(3, 1, 100);
	let start = Instant::now();

	governor.admit().await.expect("First call should be admitted immediately.");

	let order = Arc::new(Mutex::new(Vec::new()));
	let tasks = (0..3)
		.map(|index| {
			let ticket = governor.admit();
			let order = order.clone();

			tokio::spawn(async move {
				ticket.await.expect("Buffered call should be released.");
				order.lock().push(index);
			})
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await.expect("Release task should not panic.");
	}

	assert_eq!(*order.lock(), vec![0, 1, 2]);
	assert!(start.elapsed() >= StdDuration::from_millis(301));
	assert_eq!(governor.status().buffered, 0);
}

#[tokio::test(start_paused = true)]
async fn raising_the_quota_admits_the_next_call_immediately() {
	let governor = governor(5, 1, 60_000);

	governor.admit().await.expect("First call should be admitted immediately.");
	governor.reconfigure(GovernorConfigPatch::default().max_calls_per_interval(3));

	let ticket = governor.admit();

	assert_eq!(ticket.decision(), AdmissionDecision::Immediate);

	let admitted = ticket.await.expect("Raised quota should admit immediately.");

	assert_eq!(admitted.free_remaining, 1);
	assert_eq!(governor.config().max_buffered_requests, 5);
	assert_eq!(governor.config().interval, StdDuration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn shrinking_the_buffer_keeps_queued_entries() {
	let governor = governor(3, 1, 100);

	governor.admit().await.expect("First call should be admitted immediately.");

	let queued = [governor.admit(), governor.admit()];

	governor.reconfigure(GovernorConfigPatch::default().max_buffered_requests(1));

	assert_eq!(governor.status().buffered, 2);
	assert_eq!(governor.admit().await, Err(AdmissionError::QuotaExceeded));

	for ticket in queued {
		ticket.await.expect("Entries queued before the change should still be released.");
	}
}
