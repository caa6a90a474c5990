//! Credential variants and the access level each one grants.

// self
use crate::{_prelude::*, auth::Secret};

/// Access level required by an endpoint or held by a client.
///
/// Levels are ordered, so a client holding [`AuthLevel::User`] satisfies any endpoint that needs
/// [`AuthLevel::Consumer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthLevel {
	/// Anonymous access.
	#[default]
	None,
	/// Application-level access (consumer key and secret).
	Consumer,
	/// Access on behalf of a user (personal token or OAuth access token).
	User,
}
impl AuthLevel {
	/// Numeric rank (0, 1, or 2).
	pub const fn rank(self) -> u8 {
		match self {
			Self::None => 0,
			Self::Consumer => 1,
			Self::User => 2,
		}
	}
}

/// Authentication scheme in use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
	/// No credentials.
	#[default]
	None,
	/// Discogs header scheme (`Discogs token=...` or `Discogs key=..., secret=...`).
	Discogs,
	/// OAuth 1.0a.
	OAuth,
}
impl AuthMethod {
	/// Stable label for the scheme.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Discogs => "discogs",
			Self::OAuth => "oauth",
		}
	}
}
impl Display for AuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Consumer key pair issued to an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
	/// Public consumer key.
	pub key: String,
	/// Consumer secret.
	pub secret: Secret,
}
impl Consumer {
	/// Creates a consumer key pair.
	pub fn new(key: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { key: key.into(), secret: secret.into() }
	}
}

/// OAuth token and its secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
	/// Public token value.
	pub token: String,
	/// Token secret.
	pub secret: Secret,
}
impl OAuthToken {
	/// Creates a token pair.
	pub fn new(token: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { token: token.into(), secret: secret.into() }
	}
}

/// OAuth 1.0a credentials; the access token is absent until the flow completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
	/// Application key pair.
	pub consumer: Consumer,
	/// Access token granted by the user.
	pub access_token: Option<OAuthToken>,
}
impl OAuthCredentials {
	/// Credentials for a consumer that has not been authorized by a user yet.
	pub fn consumer(consumer: Consumer) -> Self {
		Self { consumer, access_token: None }
	}

	/// Credentials carrying a user-granted access token.
	pub fn with_access_token(mut self, token: OAuthToken) -> Self {
		self.access_token = Some(token);

		self
	}
}

/// Credentials attached to every outbound call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
	/// Anonymous.
	#[default]
	None,
	/// Personal user token.
	UserToken(Secret),
	/// Consumer key pair sent with the Discogs header scheme.
	Consumer(Consumer),
	/// OAuth 1.0a.
	OAuth(OAuthCredentials),
}
impl Credentials {
	/// Personal user token credentials.
	pub fn user_token(token: impl Into<Secret>) -> Self {
		Self::UserToken(token.into())
	}

	/// Consumer key pair credentials.
	pub fn consumer(key: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self::Consumer(Consumer::new(key, secret))
	}

	/// Level granted by these credentials.
	pub fn level(&self) -> AuthLevel {
		match self {
			Self::None => AuthLevel::None,
			Self::UserToken(_) => AuthLevel::User,
			Self::Consumer(_) => AuthLevel::Consumer,
			Self::OAuth(oauth) if oauth.access_token.is_some() => AuthLevel::User,
			Self::OAuth(_) => AuthLevel::Consumer,
		}
	}

	/// Scheme used by these credentials.
	pub fn method(&self) -> AuthMethod {
		match self {
			Self::None => AuthMethod::None,
			Self::UserToken(_) | Self::Consumer(_) => AuthMethod::Discogs,
			Self::OAuth(_) => AuthMethod::OAuth,
		}
	}

	/// Returns `true` when any level above anonymous is held.
	pub fn is_authenticated(&self) -> bool {
		self.level() > AuthLevel::None
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn levels_follow_credential_kind() {
		assert_eq!(Credentials::None.level(), AuthLevel::None);
		assert_eq!(Credentials::consumer("key", "secret").level(), AuthLevel::Consumer);
		assert_eq!(Credentials::user_token("token").level(), AuthLevel::User);

		let oauth = OAuthCredentials::consumer(Consumer::new("key", "secret"));

		assert_eq!(Credentials::OAuth(oauth.clone()).level(), AuthLevel::Consumer);
		assert_eq!(
			Credentials::OAuth(oauth.with_access_token(OAuthToken::new("t", "s"))).level(),
			AuthLevel::User
		);
	}

	#[test]
	fn levels_are_ordered() {
		assert!(AuthLevel::User > AuthLevel::Consumer);
		assert!(AuthLevel::Consumer > AuthLevel::None);
		assert_eq!(AuthLevel::User.rank(), 2);
	}

	#[test]
	fn methods_have_stable_labels() {
		assert_eq!(Credentials::None.method().as_str(), "none");
		assert_eq!(Credentials::user_token("t").method().as_str(), "discogs");
		assert!(!Credentials::None.is_authenticated());
	}
}
