//! Client-side request-rate governor.
//!
//! One [`RequestGovernor`] guards every call made against a single remote quota domain. Each
//! call to [`RequestGovernor::admit`] is decided on the spot:
//!
//! - a free slot in the current window admits the call immediately;
//! - an exhausted window parks the call in a bounded FIFO buffer, released by a Tokio timer
//!   once a later window opens (at most `max_calls_per_interval` releases per window);
//! - a full buffer rejects the call with [`AdmissionError::QuotaExceeded`].
//!
//! Decisions never block the caller. All state sits behind a single mutex so no two decisions
//! observe a partially applied reconfiguration.

pub mod config;
pub mod ticket;

pub use config::*;
pub use ticket::*;

// std
use std::{
	collections::VecDeque,
	sync::{OnceLock, Weak},
	time::Duration as StdDuration,
};
// crates.io
use tokio::{runtime::Handle, sync::oneshot, task::AbortHandle, time::Instant};
// self
use crate::{
	_prelude::*,
	obs::{self, GovernorEvent},
};

// Minimum gap between two scheduled releases.
const RELEASE_SPACING: StdDuration = StdDuration::from_millis(1);

static SHARED: OnceLock<Arc<RequestGovernor>> = OnceLock::new();

/// Point-in-time snapshot returned by [`RequestGovernor::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorStatus {
	/// Immediate admissions left in the current window.
	pub free_remaining: u32,
	/// Admissions currently waiting in the buffer.
	pub buffered: u32,
	/// Buffer positions still available.
	pub buffer_remaining: u32,
}

/// Admits, defers, or rejects outbound calls so the aggregate rate stays under a fixed quota.
#[derive(Debug)]
pub struct RequestGovernor {
	state: Arc<Mutex<GovernorState>>,
}
impl RequestGovernor {
	/// Creates an isolated governor.
	pub fn new(config: GovernorConfig) -> Self {
		Self { state: Arc::new(Mutex::new(GovernorState::new(config))) }
	}

	/// Returns the process-wide governor, creating it with default limits on first use.
	///
	/// Release timers run on whichever runtime called [`admit`](Self::admit). If that runtime
	/// shuts down first, its buffered admissions are dropped from the buffer and their tickets
	/// resolve with [`AdmissionError::Abandoned`].
	pub fn shared() -> Arc<Self> {
		SHARED.get_or_init(|| Arc::new(Self::default())).clone()
	}

	/// Snapshot of the live configuration.
	pub fn config(&self) -> GovernorConfig {
		self.state.lock().config
	}

	/// Merges `patch` into the live configuration.
	///
	/// Buffered admissions keep the release instants computed when they were queued.
	pub fn reconfigure(&self, patch: GovernorConfigPatch) {
		if patch.is_empty() {
			return;
		}

		let mut state = self.state.lock();

		state.config = state.config.merged(&patch);

		obs::record_reconfigure(&state.config);
	}

	/// Consistent snapshot of slot usage.
	pub fn status(&self) -> GovernorStatus {
		self.state.lock().status()
	}

	/// Drops every buffered admission and cancels its release timer.
	///
	/// A cleared admission is never granted. Unlike a callback that is simply never invoked,
	/// its ticket still resolves, with [`AdmissionError::Abandoned`], so no task is left
	/// awaiting forever.
	pub fn clear(&self) {
		let cleared = {
			let mut state = self.state.lock();

			state.epoch = state.epoch.wrapping_add(1);

			state.buffer.drain(..).collect::<Vec<_>>()
		};

		// Timer guards lock the state when dropped, so abort only after unlocking.
		for timer in cleared.iter().filter_map(|entry| entry.timer.as_ref()) {
			timer.abort();
		}

		if !cleared.is_empty() {
			obs::record_governor_event(GovernorEvent::Cleared, cleared.len());
		}
	}

	/// Requests permission to issue one call.
	///
	/// Never blocks; the returned ticket resolves exactly once. Buffering spawns a timer on the
	/// current Tokio runtime, so outside a runtime a call that cannot be admitted immediately is
	/// rejected with [`AdmissionError::RuntimeUnavailable`].
	pub fn admit(&self) -> AdmissionTicket {
		let now = Instant::now();
		let mut state = self.state.lock();

		if state.buffer.is_empty()
			&& let Some(admitted) = state.admit_now(now)
		{
			obs::record_governor_event(GovernorEvent::Immediate, 0);

			return AdmissionTicket::immediate(admitted);
		}
		if state.buffer.len() >= state.config.max_buffered_requests as usize {
			obs::record_governor_event(GovernorEvent::Rejected, state.buffer.len());

			return AdmissionTicket::rejected(AdmissionError::QuotaExceeded);
		}

		let Ok(runtime) = Handle::try_current() else {
			obs::record_governor_event(GovernorEvent::RuntimeUnavailable, state.buffer.len());

			return AdmissionTicket::rejected(AdmissionError::RuntimeUnavailable);
		};
		let release_at = state.next_release_at(now);
		let id = state.next_entry_id();
		let epoch = state.epoch;
		let (sender, receiver) = oneshot::channel();

		state.buffer.push_back(BufferedEntry { id, sender, release_at, timer: None });

		obs::record_governor_event(GovernorEvent::Buffered, state.buffer.len());
		drop(state);

		// Spawned unlocked: a runtime that is shutting down drops the task, and its guard, on
		// the spot.
		let guard = TimerGuard { state: Arc::downgrade(&self.state), id, armed: true };
		let timer = runtime.spawn(release_after(guard, epoch, release_at)).abort_handle();
		let orphaned = {
			let mut state = self.state.lock();

			match state.buffer.iter_mut().find(|entry| entry.id == id) {
				Some(entry) => {
					entry.timer = Some(timer);

					None
				},
				None => Some(timer),
			}
		};

		// Cleared or released before the handle was stored.
		if let Some(timer) = orphaned {
			timer.abort();
		}

		AdmissionTicket::buffered(release_at.saturating_duration_since(now), receiver)
	}
}
impl Default for RequestGovernor {
	fn default() -> Self {
		Self::new(GovernorConfig::default())
	}
}
impl Drop for RequestGovernor {
	fn drop(&mut self) {
		self.clear();
	}
}

#[derive(Debug)]
struct GovernorState {
	config: GovernorConfig,
	window_start: Option<Instant>,
	admitted_in_window: u32,
	buffer: VecDeque<BufferedEntry>,
	// Bumped by `clear` so timers that already woke cannot release newer entries.
	epoch: u64,
	next_id: u64,
}
impl GovernorState {
	fn new(config: GovernorConfig) -> Self {
		Self {
			config,
			window_start: None,
			admitted_in_window: 0,
			buffer: VecDeque::new(),
			epoch: 0,
			next_id: 0,
		}
	}

	fn next_entry_id(&mut self) -> u64 {
		self.next_id = self.next_id.wrapping_add(1);

		self.next_id
	}

	// Spare quota is spent before the window is checked: a stale window keeps counting until it
	// fills up, and only then is it restarted at `now`.
	fn admit_now(&mut self, now: Instant) -> Option<Admitted> {
		if self.admitted_in_window < self.config.max_calls_per_interval {
			self.admitted_in_window += 1;

			if self.window_start.is_none() {
				self.window_start = Some(now);
			}
		} else if self
			.window_start
			.is_none_or(|start| now.saturating_duration_since(start) > self.config.interval)
		{
			self.window_start = Some(now);
			self.admitted_in_window = 1;
		} else {
			return None;
		}

		Some(Admitted {
			free_remaining: self.free_remaining(),
			buffer_remaining: self.buffer_remaining(),
		})
	}

	// Entry `n` of the buffer lands in window `n / quota + 1` after the current one, offset by
	// `n % quota + 1` milliseconds, and always strictly after the previous entry.
	fn next_release_at(&self, now: Instant) -> Instant {
		let queued = self.buffered();
		let quota = self.config.max_calls_per_interval;
		let window_start = self.window_start.unwrap_or(now);
		let scheduled = window_start
			+ self.config.interval * (queued / quota + 1)
			+ RELEASE_SPACING * (queued % quota + 1);
		let floor =
			self.buffer.back().map_or(now, |last| last.release_at.max(now)) + RELEASE_SPACING;

		scheduled.max(floor)
	}

	fn release_front(&mut self) {
		let Some(entry) = self.buffer.pop_front() else {
			return;
		};

		self.admitted_in_window = self.admitted_in_window.saturating_add(1);

		let admitted = Admitted { free_remaining: 0, buffer_remaining: self.buffer_remaining() };

		// The caller may have stopped waiting; the slot is spent either way.
		let _ = entry.sender.send(admitted);

		obs::record_governor_event(GovernorEvent::Released, self.buffer.len());
	}

	fn forget(&mut self, id: u64) {
		if let Some(position) = self.buffer.iter().position(|entry| entry.id == id) {
			self.buffer.remove(position);

			obs::record_governor_event(GovernorEvent::Cleared, 1);
		}
	}

	fn status(&self) -> GovernorStatus {
		GovernorStatus {
			free_remaining: self.free_remaining(),
			buffered: self.buffered(),
			buffer_remaining: self.buffer_remaining(),
		}
	}

	fn free_remaining(&self) -> u32 {
		self.config.max_calls_per_interval.saturating_sub(self.admitted_in_window)
	}

	fn buffered(&self) -> u32 {
		u32::try_from(self.buffer.len()).unwrap_or(u32::MAX)
	}

	fn buffer_remaining(&self) -> u32 {
		self.config.max_buffered_requests.saturating_sub(self.buffered())
	}
}

#[derive(Debug)]
struct BufferedEntry {
	id: u64,
	sender: oneshot::Sender<Admitted>,
	release_at: Instant,
	// Unset until the timer task is spawned.
	timer: Option<AbortHandle>,
}

// Removes its entry from the buffer if the timer task is dropped before firing, e.g. when the
// runtime that spawned it shuts down. Every remaining entry then still has a live timer.
struct TimerGuard {
	state: Weak<Mutex<GovernorState>>,
	id: u64,
	armed: bool,
}
impl Drop for TimerGuard {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		if let Some(state) = self.state.upgrade() {
			state.lock().forget(self.id);
		}
	}
}

// Releases the buffer's front entry rather than a specific one, which keeps delivery FIFO even
// if two timers race for the lock.
async fn release_after(mut guard: TimerGuard, epoch: u64, at: Instant) {
	tokio::time::sleep_until(at).await;

	guard.armed = false;

	let Some(shared) = guard.state.upgrade() else {
		return;
	};
	let mut state = shared.lock();

	if state.epoch == epoch {
		state.release_front();
	}
}
