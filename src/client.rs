//! Request pipeline shared by every API section.
//!
//! A call flows through four steps: the endpoint's required [`AuthLevel`] is checked against the
//! configured credentials, the [`RequestGovernor`] admits (or buffers, or rejects) the call, the
//! headers are assembled and signed, and the transport runs. Statuses above 399 become
//! [`Error::Api`] with the message carried by the body, if any.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	api::{Database, Marketplace, User},
	auth::{AuthLevel, AuthMethod, Credentials},
	config::ClientConfig,
	error::{ConfigError, DecodeError},
	ext::RequestSigner,
	governor::RequestGovernor,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod, RateLimitInfo},
	oauth::{OAuthConfig, OAuthFlow},
	obs::{self, RequestOutcome, RequestSpan},
};

const MARKUP_PREFIX: &[u8] = b"<!";
const MARKUP_PREVIEW_CHARS: usize = 64;

/// Per-call options understood by [`Client::send`].
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Path relative to the configured base URL, or an absolute URL.
	pub url: String,
	/// Minimum level the credentials must grant.
	pub auth_level: AuthLevel,
	/// Whether the call goes through the request governor.
	pub queue: bool,
	/// JSON body.
	pub body: Option<Value>,
}
impl RequestOptions {
	/// Creates queued, anonymous options without a body.
	pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
		Self { method, url: url.into(), auth_level: AuthLevel::None, queue: true, body: None }
	}

	/// `GET` options.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// `POST` options.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// `PUT` options.
	pub fn put(url: impl Into<String>) -> Self {
		Self::new(HttpMethod::Put, url)
	}

	/// `DELETE` options.
	pub fn delete(url: impl Into<String>) -> Self {
		Self::new(HttpMethod::Delete, url)
	}

	/// Requires at least `level` from the credentials.
	pub fn auth_level(mut self, level: AuthLevel) -> Self {
		self.auth_level = level;

		self
	}

	/// Skips the request governor.
	pub fn unqueued(mut self) -> Self {
		self.queue = false;

		self
	}

	/// Sets a JSON body.
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes `body` into the JSON body.
	pub fn with_json<T>(self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let value = serde_json::to_value(body).map_err(|source| Error::Encode { source })?;

		Ok(self.with_body(value))
	}
}
impl From<&str> for RequestOptions {
	fn from(url: &str) -> Self {
		Self::get(url)
	}
}
impl From<String> for RequestOptions {
	fn from(url: String) -> Self {
		Self::get(url)
	}
}

/// Successful response returned by [`Client::send`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
	status: u16,
	headers: Vec<(String, String)>,
	body: Vec<u8>,
	rate_limit: Option<RateLimitInfo>,
}
impl Response {
	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Remote rate-limit counters, when reported.
	pub fn rate_limit(&self) -> Option<RateLimitInfo> {
		self.rate_limit
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Raw body bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response and returns the body bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.body
	}

	/// Body as text, replacing invalid UTF-8 sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns `true` when the body is an HTML document rather than JSON.
	pub fn is_markup(&self) -> bool {
		self.body.starts_with(MARKUP_PREFIX)
	}

	/// Decodes the body as JSON; an empty body decodes as `null`.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		if self.is_markup() {
			let preview = self.text().chars().take(MARKUP_PREVIEW_CHARS).collect();

			return Err(DecodeError::NotJson { preview }.into());
		}

		let body: &[u8] =
			if self.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &self.body };
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError::Json { source, status: self.status }.into())
	}
}
impl From<ApiResponse> for Response {
	fn from(response: ApiResponse) -> Self {
		let rate_limit = response.rate_limit();
		let ApiResponse { status, headers, body } = response;

		Self { status, headers, body, rate_limit }
	}
}

/// Client metadata reported by [`Client::about`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
	/// Crate version.
	pub version: String,
	/// Configured `User-Agent`.
	pub user_agent: String,
	/// Scheme of the configured credentials.
	pub auth_method: AuthMethod,
	/// Level of the configured credentials.
	pub auth_level: AuthLevel,
}

/// API root document plus local client metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct About {
	/// Document served at the API root.
	pub api: Value,
	/// Local client metadata.
	pub client: ClientInfo,
}

/// Discogs API client.
///
/// Cloning is cheap; clones share the transport and the governor. Every client built without an
/// explicit governor shares [`RequestGovernor::shared`], so all of them draw from one quota.
#[derive(Clone)]
pub struct Client {
	config: ClientConfig,
	base_url: Url,
	credentials: Credentials,
	oauth: OAuthConfig,
	governor: Arc<RequestGovernor>,
	http_client: Arc<dyn ApiHttpClient>,
}
impl Client {
	/// Starts a [`ClientBuilder`].
	pub fn builder() -> ClientBuilder {
		ClientBuilder::default()
	}

	/// Builds a client with default configuration, the shared governor, and the default
	/// transport.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Self::builder().credentials(credentials).build()
	}

	/// Active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Replaces the configuration and pushes its limits to the governor.
	pub fn set_config(&mut self, config: ClientConfig) -> Result<()> {
		self.base_url = config.parsed_base_url()?;
		self.config = config;

		self.sync_governor();

		Ok(())
	}

	/// Configured credentials.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Replaces the credentials, moving the governor to the matching quota.
	pub fn set_credentials(&mut self, credentials: Credentials) {
		self.credentials = credentials;

		self.sync_governor();
	}

	/// OAuth endpoints used by [`Client::oauth`].
	pub fn oauth_config(&self) -> &OAuthConfig {
		&self.oauth
	}

	/// Governor guarding this client's calls.
	pub fn governor(&self) -> &Arc<RequestGovernor> {
		&self.governor
	}

	/// Level granted by the configured credentials.
	pub fn auth_level(&self) -> AuthLevel {
		self.credentials.level()
	}

	/// Returns `true` when authenticated at `level` or above.
	///
	/// Anonymous clients are never authenticated, even for [`AuthLevel::None`].
	pub fn authenticated(&self, level: AuthLevel) -> bool {
		self.credentials.is_authenticated() && self.auth_level() >= level
	}

	/// OAuth 1.0a token exchange.
	pub fn oauth(&self) -> OAuthFlow<'_> {
		OAuthFlow::new(self)
	}

	/// Artists, releases, masters, labels, images, and search.
	pub fn database(&self) -> Database<'_> {
		Database::new(self)
	}

	/// Listings, orders, fees, and price suggestions.
	pub fn marketplace(&self) -> Marketplace<'_> {
		Marketplace::new(self)
	}

	/// Profiles, collections, wantlists, and lists.
	pub fn user(&self) -> User<'_> {
		User::new(self)
	}

	/// Identity of the authenticated user.
	pub async fn identity(&self) -> Result<Value> {
		self.get(RequestOptions::get("/oauth/identity").auth_level(AuthLevel::User)).await
	}

	/// API root document together with local client metadata.
	pub async fn about(&self) -> Result<About> {
		let api = self.get("").await?;
		let client = ClientInfo {
			version: env!("CARGO_PKG_VERSION").into(),
			user_agent: self.config.user_agent.clone(),
			auth_method: self.credentials.method(),
			auth_level: self.auth_level(),
		};

		Ok(About { api, client })
	}

	/// `GET` returning the decoded JSON body.
	pub async fn get(&self, options: impl Into<RequestOptions>) -> Result<Value> {
		let options = options.into();

		self.send(RequestOptions { method: HttpMethod::Get, ..options }).await?.json()
	}

	/// `POST` with a JSON body, returning the decoded JSON body.
	pub async fn post<T>(&self, options: impl Into<RequestOptions>, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let options: RequestOptions = options.into();
		let options = RequestOptions { method: HttpMethod::Post, ..options }.with_json(data)?;

		self.send(options).await?.json()
	}

	/// `PUT` with a JSON body, returning the decoded JSON body.
	pub async fn put<T>(&self, options: impl Into<RequestOptions>, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let options: RequestOptions = options.into();
		let options = RequestOptions { method: HttpMethod::Put, ..options }.with_json(data)?;

		self.send(options).await?.json()
	}

	/// `DELETE` returning the decoded JSON body (usually `null`).
	pub async fn delete(&self, options: impl Into<RequestOptions>) -> Result<Value> {
		let options = options.into();

		self.send(RequestOptions { method: HttpMethod::Delete, ..options }).await?.json()
	}

	/// Runs `options` through the pipeline and returns the raw response.
	pub async fn send(&self, options: RequestOptions) -> Result<Response> {
		self.execute(options, &self.credentials).await
	}

	pub(crate) async fn execute(
		&self,
		options: RequestOptions,
		signer: &dyn RequestSigner,
	) -> Result<Response> {
		let span = RequestSpan::new(options.method.as_str(), "execute");

		span.instrument(async move {
			obs::record_request_outcome(RequestOutcome::Attempt);

			let result = self.dispatch(options, signer).await;

			obs::record_request_outcome(if result.is_ok() {
				RequestOutcome::Success
			} else {
				RequestOutcome::Failure
			});

			result
		})
		.await
	}

	async fn dispatch(
		&self,
		options: RequestOptions,
		signer: &dyn RequestSigner,
	) -> Result<Response> {
		let current = self.auth_level();

		if current < options.auth_level {
			return Err(Error::Unauthorized { required: options.auth_level, current });
		}

		let url = self.resolve_url(&options.url)?;

		if options.queue {
			self.governor.admit().await?;
		}

		let mut request = ApiRequest::new(options.method, url)
			.with_header("User-Agent", self.config.user_agent.as_str())
			.with_header("Accept", self.config.accept_header());

		if let Some(body) = &options.body {
			let bytes = serde_json::to_vec(body).map_err(|source| Error::Encode { source })?;

			request = request.with_header("Content-Type", "application/json").with_body(bytes);
		}
		if let Some(authorization) = signer.authorization(request.method, &request.url) {
			request = request.with_header("Authorization", authorization);
		}

		let response = self.http_client.execute(request).await?;

		if response.status > 399 {
			return Err(Error::api(response.status, error_message(&response.body)));
		}

		Ok(response.into())
	}

	fn resolve_url(&self, url: &str) -> Result<Url> {
		if let Ok(absolute) = Url::parse(url) {
			return Ok(absolute);
		}

		let joined = format!("{}{url}", self.base_url.as_str().trim_end_matches('/'));

		Url::parse(&joined).map_err(|e| ConfigError::invalid_url(joined, e).into())
	}

	fn sync_governor(&self) {
		self.governor
			.reconfigure(self.config.governor_patch(self.credentials.is_authenticated()));
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.field("oauth", &self.oauth)
			.field("governor", &self.governor)
			.finish_non_exhaustive()
	}
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
	config: ClientConfig,
	credentials: Credentials,
	oauth: OAuthConfig,
	governor: Option<Arc<RequestGovernor>>,
	http_client: Option<Arc<dyn ApiHttpClient>>,
}
impl ClientBuilder {
	/// Replaces the whole configuration.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.config.user_agent = user_agent.into();

		self
	}

	/// Sets the credentials.
	pub fn credentials(mut self, credentials: Credentials) -> Self {
		self.credentials = credentials;

		self
	}

	/// Overrides the OAuth endpoints.
	pub fn oauth_config(mut self, oauth: OAuthConfig) -> Self {
		self.oauth = oauth;

		self
	}

	/// Uses `governor` instead of [`RequestGovernor::shared`].
	pub fn governor(mut self, governor: Arc<RequestGovernor>) -> Self {
		self.governor = Some(governor);

		self
	}

	/// Uses a custom transport.
	pub fn http_client(mut self, http_client: impl ApiHttpClient) -> Self {
		self.http_client = Some(Arc::new(http_client));

		self
	}

	/// Validates the configuration and pushes its limits to the governor.
	pub fn build(self) -> Result<Client> {
		let base_url = self.config.parsed_base_url()?;
		let http_client = match self.http_client {
			Some(http_client) => http_client,
			None => default_http_client()?,
		};
		let client = Client {
			config: self.config,
			base_url,
			credentials: self.credentials,
			oauth: self.oauth,
			governor: self.governor.unwrap_or_else(RequestGovernor::shared),
			http_client,
		};

		client.sync_governor();

		Ok(client)
	}
}

#[cfg(feature = "reqwest")]
fn default_http_client() -> Result<Arc<dyn ApiHttpClient>> {
	let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

	Ok(Arc::new(ReqwestHttpClient::with_client(client)))
}

#[cfg(not(feature = "reqwest"))]
fn default_http_client() -> Result<Arc<dyn ApiHttpClient>> {
	Err(ConfigError::MissingTransport.into())
}

#[derive(Deserialize)]
struct ErrorBody {
	message: Option<String>,
}

fn error_message(body: &[u8]) -> Option<String> {
	serde_json::from_slice::<ErrorBody>(body)
		.ok()
		.and_then(|body| body.message)
		.filter(|message| !message.is_empty())
}
