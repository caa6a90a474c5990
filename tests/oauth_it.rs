// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use discogs_client::{
	auth::{AuthLevel, Consumer, Credentials, OAuthToken},
	client::Client,
	config::ClientConfig,
	error::Error,
	governor::RequestGovernor,
	oauth::OAuthConfig,
};

const CALLBACK: &str = "https://app.example/callback?step=2";

fn oauth_client(server: &MockServer) -> Client {
	let config = ClientConfig {
		base_url: server.base_url(),
		request_limit: 1,
		request_limit_auth: 1,
		request_limit_queue_size: 0,
		..Default::default()
	};
	let oauth = OAuthConfig {
		request_token_url: server.url("/oauth/request_token"),
		access_token_url: server.url("/oauth/access_token"),
		authorize_url: server.url("/oauth/authorize"),
	};

	Client::builder()
		.config(config)
		.oauth_config(oauth)
		.governor(Arc::new(RequestGovernor::default()))
		.build()
		.expect("OAuth test client configuration should be valid.")
}

#[tokio::test]
async fn three_legged_exchange_yields_user_credentials() {
	let server = MockServer::start_async().await;
	let request_token = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth/request_token")
				.query_param("oauth_callback", CALLBACK)
				.header_exists("authorization");
			then.status(200).body(
				"oauth_token=request-token&oauth_token_secret=request-secret\
				 &oauth_callback_confirmed=true",
			);
		})
		.await;
	let access_token = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth/access_token")
				.query_param("oauth_verifier", "verifier-123")
				.header_exists("authorization");
			then.status(200).body("oauth_token=access-token&oauth_token_secret=access-secret");
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/identity").header_exists("authorization");
			then.status(200).json_body(json!({ "username": "rodneyfool" }));
		})
		.await;
	let mut client = oauth_client(&server);
	let consumer = Consumer::new("consumer-key", "consumer-secret");

	// Spend the whole quota so the exchange proves it bypasses the governor.
	client.governor().admit().await.expect("Exhausting the quota should succeed.");

	let requested = client
		.oauth()
		.request_token(&consumer, CALLBACK)
		.await
		.expect("Request token exchange should succeed.");

	assert_eq!(requested.token, OAuthToken::new("request-token", "request-secret"));
	assert_eq!(
		requested.authorize_url.as_str(),
		format!("{}?oauth_token=request-token", server.url("/oauth/authorize"))
	);

	let credentials = client
		.oauth()
		.access_token(&consumer, &requested.token, "verifier-123")
		.await
		.expect("Access token exchange should succeed.");

	assert_eq!(credentials.access_token, Some(OAuthToken::new("access-token", "access-secret")));

	client.set_credentials(Credentials::OAuth(credentials));

	assert_eq!(client.auth_level(), AuthLevel::User);

	// Quota is still spent; raise it so the identity call goes through.
	client
		.set_config(ClientConfig { base_url: server.base_url(), ..Default::default() })
		.expect("Valid configuration should apply.");

	let me = client.identity().await.expect("Identity should succeed with OAuth credentials.");

	assert_eq!(me["username"], "rodneyfool");

	request_token.assert_calls_async(1).await;
	access_token.assert_calls_async(1).await;
	identity.assert_calls_async(1).await;
}

#[tokio::test]
async fn incomplete_token_response_is_rejected() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/request_token");
			then.status(200).body("oauth_token=request-token");
		})
		.await;
	let client = oauth_client(&server);
	let err = client
		.oauth()
		.request_token(&Consumer::new("consumer-key", "consumer-secret"), CALLBACK)
		.await
		.expect_err("A response without a token secret should be rejected.");

	assert!(matches!(err, Error::InvalidTokenResponse { field: "oauth_token_secret" }));
}

#[tokio::test]
async fn rejected_consumer_surfaces_api_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/request_token");
			then.status(401).body(r#"{"message": "Invalid consumer."}"#);
		})
		.await;
	let client = oauth_client(&server);
	let err = client
		.oauth()
		.request_token(&Consumer::new("consumer-key", "wrong"), CALLBACK)
		.await
		.expect_err("A rejected consumer should fail the exchange.");

	assert!(matches!(&err, Error::Api { status: 401, message } if message == "Invalid consumer."));
}
