//! Transport primitives for API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the owned [`ApiRequest`] and [`ApiResponse`]
//! values so downstream crates can plug in custom HTTP clients without touching the request
//! pipeline. The client assembles every header itself; transports only move bytes.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Header carrying the remote per-window quota.
pub const RATE_LIMIT_HEADER: &str = "x-discogs-ratelimit";
/// Header carrying the calls consumed in the remote window.
pub const RATE_LIMIT_USED_HEADER: &str = "x-discogs-ratelimit-used";
/// Header carrying the calls left in the remote window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-discogs-ratelimit-remaining";

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	#[default]
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully assembled outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets the body.
	pub fn with_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Decoded (decompressed) body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Remote rate-limit counters, when the service reported them.
	pub fn rate_limit(&self) -> Option<RateLimitInfo> {
		RateLimitInfo::from_response(self)
	}
}

/// Remote rate-limit counters reported on each response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
	/// Calls allowed per remote window.
	pub limit: u32,
	/// Calls consumed in the remote window.
	pub used: u32,
	/// Calls left in the remote window.
	pub remaining: u32,
}
impl RateLimitInfo {
	/// Parses the counters; absent when the quota header is missing or malformed.
	pub fn from_response(response: &ApiResponse) -> Option<Self> {
		let parse = |name: &str| response.header(name).and_then(|v| v.trim().parse::<u32>().ok());
		let limit = parse(RATE_LIMIT_HEADER)?;

		Some(Self {
			limit,
			used: parse(RATE_LIMIT_USED_HEADER).unwrap_or_default(),
			remaining: parse(RATE_LIMIT_REMAINING_HEADER).unwrap_or_default(),
		})
	}
}

/// Abstraction over HTTP transports capable of executing API calls.
///
/// The trait acts as the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can be shared by cloned clients, and the
/// returned future must be `Send` so callers can spawn API calls onto multi-threaded runtimes.
/// Implementations must return decompressed bodies and must not follow redirects on behalf of
/// the client beyond what the transport does by default.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a request and returns the raw response, including error statuses.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client negotiates gzip and deflate compression, so bodies reach the pipeline
/// already decoded.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let mut builder = self.0.request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}
