//! Client configuration.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError, governor::GovernorConfigPatch};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com";
/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str =
	concat!("DiscogsClient/", env!("CARGO_PKG_VERSION"), " +", env!("CARGO_PKG_REPOSITORY"));

/// Markup format requested for text fields in API responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	/// Discogs markup.
	#[default]
	Discogs,
	/// Plain text.
	Plaintext,
	/// HTML.
	Html,
}
impl OutputFormat {
	/// Media-type suffix for the `Accept` header.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Discogs => "discogs",
			Self::Plaintext => "plaintext",
			Self::Html => "html",
		}
	}
}
impl Display for OutputFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Settings shared by every call a [`Client`](crate::client::Client) makes.
///
/// Every field has a default, so partial JSON or TOML documents deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// API root that relative paths are joined onto.
	pub base_url: String,
	/// `User-Agent` header value.
	pub user_agent: String,
	/// API version advertised in the `Accept` header.
	pub api_version: String,
	/// Markup format advertised in the `Accept` header.
	pub output_format: OutputFormat,
	/// Calls per window for anonymous clients.
	pub request_limit: u32,
	/// Calls per window for authenticated clients.
	pub request_limit_auth: u32,
	/// Window length, serialized as milliseconds.
	#[serde(with = "crate::governor::config::millis")]
	pub request_limit_interval: StdDuration,
	/// Buffer capacity for calls that exceed the window quota.
	pub request_limit_queue_size: u32,
}
impl ClientConfig {
	/// Default anonymous quota.
	pub const DEFAULT_REQUEST_LIMIT: u32 = 25;
	/// Default authenticated quota.
	pub const DEFAULT_REQUEST_LIMIT_AUTH: u32 = 60;
	/// Default window length.
	pub const DEFAULT_REQUEST_LIMIT_INTERVAL: StdDuration = StdDuration::from_secs(60);
	/// Default buffer capacity.
	pub const DEFAULT_REQUEST_LIMIT_QUEUE_SIZE: u32 = 20;

	/// Governor limits implied by this configuration.
	pub fn governor_patch(&self, authenticated: bool) -> GovernorConfigPatch {
		let max_calls = if authenticated { self.request_limit_auth } else { self.request_limit };

		GovernorConfigPatch::default()
			.max_buffered_requests(self.request_limit_queue_size)
			.max_calls_per_interval(max_calls)
			.interval(self.request_limit_interval)
	}

	/// Parses [`base_url`](Self::base_url).
	pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
		Url::parse(&self.base_url).map_err(|e| ConfigError::invalid_url(&self.base_url, e))
	}

	/// `Accept` header value for this version and format.
	pub fn accept_header(&self) -> String {
		format!(
			"application/json,application/vnd.discogs.{}.{}+json,application/octet-stream",
			self.api_version, self.output_format
		)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			user_agent: DEFAULT_USER_AGENT.into(),
			api_version: "v2".into(),
			output_format: OutputFormat::default(),
			request_limit: Self::DEFAULT_REQUEST_LIMIT,
			request_limit_auth: Self::DEFAULT_REQUEST_LIMIT_AUTH,
			request_limit_interval: Self::DEFAULT_REQUEST_LIMIT_INTERVAL,
			request_limit_queue_size: Self::DEFAULT_REQUEST_LIMIT_QUEUE_SIZE,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn partial_documents_fill_defaults() {
		let config: ClientConfig = serde_json::from_str(
			r#"{"user_agent":"MyApp/1.0","output_format":"html","request_limit_interval":1000}"#,
		)
		.expect("Partial config should deserialize.");

		assert_eq!(config.user_agent, "MyApp/1.0");
		assert_eq!(config.output_format, OutputFormat::Html);
		assert_eq!(config.request_limit_interval, StdDuration::from_secs(1));
		assert_eq!(config.request_limit, 25);
		assert_eq!(
			config.parsed_base_url().expect("Default base URL should parse.").as_str(),
			"https://api.discogs.com/"
		);
	}

	#[test]
	fn invalid_base_url_is_a_config_error() {
		let config = ClientConfig { base_url: "not a url".into(), ..Default::default() };

		assert!(matches!(config.parsed_base_url(), Err(ConfigError::InvalidUrl { .. })));
	}

	#[test]
	fn accept_header_advertises_version_and_format() {
		let config = ClientConfig { output_format: OutputFormat::Plaintext, ..Default::default() };

		assert_eq!(
			config.accept_header(),
			"application/json,application/vnd.discogs.v2.plaintext+json,application/octet-stream"
		);
	}

	#[test]
	fn governor_patch_picks_quota_by_authentication() {
		let config = ClientConfig::default();

		assert_eq!(config.governor_patch(false).max_calls_per_interval, Some(25));
		assert_eq!(config.governor_patch(true).max_calls_per_interval, Some(60));
		assert_eq!(config.governor_patch(true).max_buffered_requests, Some(20));
		assert_eq!(config.governor_patch(true).interval, Some(StdDuration::from_secs(60)));
	}
}
