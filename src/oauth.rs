//! OAuth 1.0a support: header signing and the three-legged token exchange.
//!
//! Signatures use the `PLAINTEXT` method, so the header never depends on the request method or
//! URL. The exchange itself bypasses the request governor: token endpoints are not part of the
//! metered API surface.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
// self
use crate::{
	_prelude::*,
	auth::{Consumer, OAuthCredentials, OAuthToken},
	client::{Client, RequestOptions},
	error::ConfigError,
	ext::RequestSigner,
	http::HttpMethod,
	util,
};

/// Default request-token endpoint.
pub const REQUEST_TOKEN_URL: &str = "https://api.discogs.com/oauth/request_token";
/// Default access-token endpoint.
pub const ACCESS_TOKEN_URL: &str = "https://api.discogs.com/oauth/access_token";
/// Default user authorization page.
pub const AUTHORIZE_URL: &str = "https://www.discogs.com/oauth/authorize";
/// Signature method advertised in every header.
pub const SIGNATURE_METHOD: &str = "PLAINTEXT";
/// Protocol version advertised in every header.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_BYTES: usize = 24;

/// Endpoints used by [`OAuthFlow`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
	/// Request-token endpoint.
	pub request_token_url: String,
	/// Access-token endpoint.
	pub access_token_url: String,
	/// Page the user visits to approve the request token.
	pub authorize_url: String,
}
impl Default for OAuthConfig {
	fn default() -> Self {
		Self {
			request_token_url: REQUEST_TOKEN_URL.into(),
			access_token_url: ACCESS_TOKEN_URL.into(),
			authorize_url: AUTHORIZE_URL.into(),
		}
	}
}

/// Per-request values mixed into the OAuth header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthHeaderParams {
	/// Single-use random string.
	pub nonce: String,
	/// Seconds since the Unix epoch.
	pub timestamp: i64,
}
impl OAuthHeaderParams {
	/// Random nonce and the current time.
	pub fn fresh() -> Self {
		let bytes = rand::rng().random::<[u8; NONCE_BYTES]>();

		Self {
			nonce: URL_SAFE_NO_PAD.encode(bytes),
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
		}
	}
}

/// Builds an OAuth 1.0a `Authorization` header value with a `PLAINTEXT` signature.
///
/// Parameters are sorted by name and every value is percent-encoded, so the signature
/// `<consumer_secret>&<token_secret>` appears with its ampersand encoded as `%26`.
pub fn authorization_header(
	consumer: &Consumer,
	token: Option<&OAuthToken>,
	params: &OAuthHeaderParams,
) -> String {
	let signature = format!(
		"{}&{}",
		util::percent_encode(consumer.secret.expose()),
		token.map(|t| util::percent_encode(t.secret.expose())).unwrap_or_default()
	);
	let timestamp = params.timestamp.to_string();
	let mut fields = vec![
		("oauth_consumer_key", consumer.key.as_str()),
		("oauth_nonce", params.nonce.as_str()),
		("oauth_signature", signature.as_str()),
		("oauth_signature_method", SIGNATURE_METHOD),
		("oauth_timestamp", timestamp.as_str()),
		("oauth_version", OAUTH_VERSION),
	];

	if let Some(token) = token {
		fields.push(("oauth_token", token.token.as_str()));
	}

	fields.sort_by_key(|(name, _)| *name);

	let joined = fields
		.into_iter()
		.map(|(name, value)| format!("{name}=\"{}\"", util::percent_encode(value)))
		.collect::<Vec<_>>()
		.join(", ");

	format!("OAuth {joined}")
}

/// Unauthorized request token plus the page where the user approves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestToken {
	/// Temporary token and secret.
	pub token: OAuthToken,
	/// Authorization page for this token.
	pub authorize_url: Url,
}

/// Three-legged OAuth 1.0a exchange, borrowed from a [`Client`].
///
/// 1. [`request_token`](Self::request_token) obtains a temporary token and its approval page.
/// 2. The user approves it and receives a verifier.
/// 3. [`access_token`](Self::access_token) trades token and verifier for user-level credentials.
#[derive(Clone, Copy, Debug)]
pub struct OAuthFlow<'a> {
	client: &'a Client,
}
impl<'a> OAuthFlow<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Requests a temporary token; the provider redirects the user to `callback_url` afterwards.
	pub async fn request_token(
		&self,
		consumer: &Consumer,
		callback_url: &str,
	) -> Result<RequestToken> {
		let config = self.client.oauth_config();
		let url = format!(
			"{}?oauth_callback={}",
			config.request_token_url,
			util::percent_encode(callback_url)
		);
		let token = self.exchange(url, &TokenSigner { consumer, token: None }).await?;
		let authorize_url = Url::parse_with_params(
			&config.authorize_url,
			[("oauth_token", token.token.as_str())],
		)
		.map_err(|e| ConfigError::invalid_url(&config.authorize_url, e))?;

		Ok(RequestToken { token, authorize_url })
	}

	/// Trades an approved request token and its verifier for access credentials.
	pub async fn access_token(
		&self,
		consumer: &Consumer,
		request_token: &OAuthToken,
		verifier: &str,
	) -> Result<OAuthCredentials> {
		let url = format!(
			"{}?oauth_verifier={}",
			self.client.oauth_config().access_token_url,
			util::percent_encode(verifier)
		);
		let token =
			self.exchange(url, &TokenSigner { consumer, token: Some(request_token) }).await?;

		Ok(OAuthCredentials::consumer(consumer.clone()).with_access_token(token))
	}

	async fn exchange(&self, url: String, signer: &TokenSigner<'_>) -> Result<OAuthToken> {
		let options = RequestOptions::new(HttpMethod::Get, url).unqueued();
		let response = self.client.execute(options, signer).await?;

		parse_token_response(response.bytes())
	}
}

struct TokenSigner<'a> {
	consumer: &'a Consumer,
	token: Option<&'a OAuthToken>,
}
impl RequestSigner for TokenSigner<'_> {
	fn authorization(&self, _method: HttpMethod, _url: &Url) -> Option<String> {
		Some(authorization_header(self.consumer, self.token, &OAuthHeaderParams::fresh()))
	}
}

fn parse_token_response(body: &[u8]) -> Result<OAuthToken> {
	let mut token = None;
	let mut secret = None;

	for (key, value) in url::form_urlencoded::parse(body) {
		match key.as_ref() {
			"oauth_token" => token = Some(value.into_owned()),
			"oauth_token_secret" => secret = Some(value.into_owned()),
			_ => {},
		}
	}

	let token = token.ok_or(Error::InvalidTokenResponse { field: "oauth_token" })?;
	let secret = secret.ok_or(Error::InvalidTokenResponse { field: "oauth_token_secret" })?;

	Ok(OAuthToken::new(token, secret))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixed_params() -> OAuthHeaderParams {
		OAuthHeaderParams { nonce: "nonce".into(), timestamp: 1_700_000_000 }
	}

	#[test]
	fn header_without_token_signs_consumer_secret_only() {
		let header = authorization_header(&Consumer::new("key", "sec ret"), None, &fixed_params());

		assert_eq!(
			header,
			"OAuth oauth_consumer_key=\"key\", oauth_nonce=\"nonce\", \
			 oauth_signature=\"sec%2520ret%26\", oauth_signature_method=\"PLAINTEXT\", \
			 oauth_timestamp=\"1700000000\", oauth_version=\"1.0\""
		);
	}

	#[test]
	fn header_with_token_includes_token_field() {
		let token = OAuthToken::new("tok", "tsec");
		let header =
			authorization_header(&Consumer::new("key", "csec"), Some(&token), &fixed_params());

		assert!(header.contains("oauth_signature=\"csec%26tsec\""));
		assert!(
			header.contains("oauth_timestamp=\"1700000000\", oauth_token=\"tok\", oauth_version")
		);
	}

	#[test]
	fn fresh_params_use_unique_nonces() {
		let a = OAuthHeaderParams::fresh();
		let b = OAuthHeaderParams::fresh();

		assert_ne!(a.nonce, b.nonce);
		assert_eq!(a.nonce.len(), 32);
		assert!(a.timestamp > 0);
	}

	#[test]
	fn token_response_parses_form_body() {
		let token = parse_token_response(b"oauth_token=abc&oauth_token_secret=d%26f&x=1")
			.expect("Form body should parse.");

		assert_eq!(token.token, "abc");
		assert_eq!(token.secret.expose(), "d&f");
	}

	#[test]
	fn token_response_requires_both_fields() {
		let err = parse_token_response(b"oauth_token=abc").expect_err("Secret is missing.");

		assert!(matches!(err, Error::InvalidTokenResponse { field: "oauth_token_secret" }));
	}
}
