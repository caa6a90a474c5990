//! Request signing contract that turns credentials into an `Authorization` header.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	http::HttpMethod,
	oauth::{self, OAuthHeaderParams},
};

/// Produces the `Authorization` header for an outbound call.
///
/// The pipeline invokes the signer once per call, after admission and right before the
/// transport runs, so time-sensitive schemes (OAuth nonces and timestamps) stay fresh even
/// when the call waited in the governor's buffer.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Returns the header value, or `None` when the call goes out unsigned.
	fn authorization(&self, method: HttpMethod, url: &Url) -> Option<String>;
}
impl RequestSigner for Credentials {
	fn authorization(&self, _method: HttpMethod, _url: &Url) -> Option<String> {
		match self {
			Self::None => None,
			Self::UserToken(token) => Some(format!("Discogs token={}", token.expose())),
			Self::Consumer(consumer) => Some(format!(
				"Discogs key={}, secret={}",
				consumer.key,
				consumer.secret.expose()
			)),
			Self::OAuth(credentials) => Some(oauth::authorization_header(
				&credentials.consumer,
				credentials.access_token.as_ref(),
				&OAuthHeaderParams::fresh(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{Consumer, OAuthCredentials, OAuthToken};

	fn url() -> Url {
		Url::parse("https://api.discogs.com/oauth/identity").expect("Static URL should parse.")
	}

	#[test]
	fn discogs_scheme_headers() {
		assert_eq!(Credentials::None.authorization(HttpMethod::Get, &url()), None);
		assert_eq!(
			Credentials::user_token("abc").authorization(HttpMethod::Get, &url()),
			Some("Discogs token=abc".into())
		);
		assert_eq!(
			Credentials::consumer("key", "secret").authorization(HttpMethod::Get, &url()),
			Some("Discogs key=key, secret=secret".into())
		);
	}

	#[test]
	fn oauth_scheme_signs_with_plaintext() {
		let credentials = Credentials::OAuth(
			OAuthCredentials::consumer(Consumer::new("ck", "cs"))
				.with_access_token(OAuthToken::new("tk", "ts")),
		);
		let header = credentials
			.authorization(HttpMethod::Post, &url())
			.expect("OAuth credentials should always sign.");

		assert!(header.starts_with("OAuth oauth_consumer_key=\"ck\", oauth_nonce=\""));
		assert!(header.contains("oauth_signature=\"cs%26ts\""));
		assert!(header.contains("oauth_token=\"tk\""));
		assert!(header.ends_with("oauth_version=\"1.0\""));
	}
}
