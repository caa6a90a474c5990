//! Async Discogs API client: artists, releases, marketplace, collections, and OAuth 1.0a, with a
//! process-wide request governor that keeps call volume under the remote quota.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ext;
pub mod governor;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod util;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::Client,
		config::ClientConfig,
		governor::{GovernorConfig, RequestGovernor},
		http::ReqwestHttpClient,
	};

	/// Configuration pointing at a mock server.
	pub fn test_config(server_url: &str) -> ClientConfig {
		ClientConfig {
			base_url: server_url.into(),
			user_agent: "DiscogsClientTests/1.0".into(),
			..Default::default()
		}
	}

	/// Governor isolated from [`RequestGovernor::shared`].
	pub fn isolated_governor() -> Arc<RequestGovernor> {
		Arc::new(RequestGovernor::new(GovernorConfig::default()))
	}

	/// Builds a [`Client`] against `server_url` with its own governor, so tests never share
	/// quota state.
	pub fn build_test_client(server_url: &str, credentials: Credentials) -> Client {
		build_test_client_with(test_config(server_url), credentials, isolated_governor())
	}

	/// Builds a [`Client`] from explicit parts and the reqwest transport.
	pub fn build_test_client_with(
		config: ClientConfig,
		credentials: Credentials,
		governor: Arc<RequestGovernor>,
	) -> Client {
		Client::builder()
			.config(config)
			.credentials(credentials)
			.governor(governor)
			.http_client(ReqwestHttpClient::default())
			.build()
			.expect("Test client configuration should be valid.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
