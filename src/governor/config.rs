//! Quota configuration consumed by [`RequestGovernor`](crate::governor::RequestGovernor).

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Live quota tuple evaluated by every admission decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
	/// Maximum number of admissions that may wait in the buffer.
	pub max_buffered_requests: u32,
	/// Immediate admissions allowed per window.
	pub max_calls_per_interval: u32,
	/// Window length.
	#[serde(with = "millis")]
	pub interval: StdDuration,
}
impl GovernorConfig {
	/// Default buffer capacity.
	pub const DEFAULT_MAX_BUFFERED_REQUESTS: u32 = 20;
	/// Default per-window quota.
	pub const DEFAULT_MAX_CALLS_PER_INTERVAL: u32 = 60;
	/// Default window length.
	pub const DEFAULT_INTERVAL: StdDuration = StdDuration::from_secs(60);

	/// Creates a configuration from explicit values, clamping the quota and window to their
	/// minimums.
	pub fn new(
		max_buffered_requests: u32,
		max_calls_per_interval: u32,
		interval: StdDuration,
	) -> Self {
		Self { max_buffered_requests, max_calls_per_interval, interval }.normalized()
	}

	/// Merges the populated fields of `patch` into a copy of `self`.
	pub fn merged(self, patch: &GovernorConfigPatch) -> Self {
		Self {
			max_buffered_requests: patch
				.max_buffered_requests
				.unwrap_or(self.max_buffered_requests),
			max_calls_per_interval: patch
				.max_calls_per_interval
				.unwrap_or(self.max_calls_per_interval),
			interval: patch.interval.unwrap_or(self.interval),
		}
		.normalized()
	}

	// A zero quota or zero window would make the release schedule undefined.
	fn normalized(mut self) -> Self {
		self.max_calls_per_interval = self.max_calls_per_interval.max(1);

		if self.interval < StdDuration::from_millis(1) {
			self.interval = StdDuration::from_millis(1);
		}

		self
	}
}
impl Default for GovernorConfig {
	fn default() -> Self {
		Self {
			max_buffered_requests: Self::DEFAULT_MAX_BUFFERED_REQUESTS,
			max_calls_per_interval: Self::DEFAULT_MAX_CALLS_PER_INTERVAL,
			interval: Self::DEFAULT_INTERVAL,
		}
	}
}

/// Partial update applied through
/// [`RequestGovernor::reconfigure`](super::RequestGovernor::reconfigure).
///
/// Fields left as `None` keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfigPatch {
	/// New buffer capacity.
	pub max_buffered_requests: Option<u32>,
	/// New per-window quota.
	pub max_calls_per_interval: Option<u32>,
	/// New window length.
	#[serde(default, with = "millis_opt")]
	pub interval: Option<StdDuration>,
}
impl GovernorConfigPatch {
	/// Sets the buffer capacity.
	pub fn max_buffered_requests(mut self, value: u32) -> Self {
		self.max_buffered_requests = Some(value);

		self
	}

	/// Sets the per-window quota.
	pub fn max_calls_per_interval(mut self, value: u32) -> Self {
		self.max_calls_per_interval = Some(value);

		self
	}

	/// Sets the window length.
	pub fn interval(mut self, value: StdDuration) -> Self {
		self.interval = Some(value);

		self
	}

	/// Returns `true` when no field is populated.
	pub fn is_empty(&self) -> bool {
		self.max_buffered_requests.is_none()
			&& self.max_calls_per_interval.is_none()
			&& self.interval.is_none()
	}
}

pub(crate) mod millis {
	// std
	use std::time::Duration as StdDuration;
	// crates.io
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &StdDuration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<StdDuration, D::Error>
	where
		D: Deserializer<'de>,
	{
		u64::deserialize(deserializer).map(StdDuration::from_millis)
	}
}

mod millis_opt {
	// std
	use std::time::Duration as StdDuration;
	// crates.io
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &Option<StdDuration>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(duration) => super::millis::serialize(duration, serializer),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<StdDuration>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Option::<u64>::deserialize(deserializer)?.map(StdDuration::from_millis))
	}
}
