#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_social::{
	_preludet::*,
	config::{EndpointOverrides, OAuthConfig, ProviderConfig, ProviderName},
	error::DecodeError,
	manager::{OAuthManager, OAuthRequest},
};

const REDIRECT_URI: &str = "https://app.example.com/callback";

fn overrides(server: &MockServer, profile_path: &str) -> EndpointOverrides {
	EndpointOverrides {
		authorization: Some(server.url("/authorize")),
		token: Some(server.url("/token")),
		user_profile: Some(server.url(profile_path)),
	}
}

fn build_manager(name: ProviderName, config: ProviderConfig) -> OAuthManager {
	let manager = OAuthManager::with_http_client(Arc::new(test_reqwest_http_client()));

	manager
		.configure(OAuthConfig::new(REDIRECT_URI).with_provider(name, config))
		.expect("Mock provider configuration should be valid.");

	manager
}

#[tokio::test]
async fn google_callback_runs_full_pipeline_over_http() {
	let server = MockServer::start_async().await;
	let manager = build_manager(
		ProviderName::Google,
		ProviderConfig::new("client-it", "secret-it")
			.with_endpoints(overrides(&server, "/userinfo")),
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-http\",\"token_type\":\"Bearer\",\"expires_in\":3599,\"id_token\":\"h.c.s\"}",
			);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo").header("authorization", "Bearer access-http");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":\"108\",\"name\":\"Ada Lovelace\",\"email\":\"ada@example.com\",\"picture\":\"https://img.example.com/ada\"}",
			);
		})
		.await;
	let authorize_url =
		manager.authorization_url("google", Some("csrf")).expect("Google should be configured.");

	assert!(authorize_url.as_str().starts_with(&server.url("/authorize")));

	let user = manager
		.handle_callback("google", &OAuthRequest::from_url("/callback?code=auth-code&state=csrf"))
		.await
		.expect("Google callback should succeed against the mock server.");

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(user.id, "108");
	assert_eq!(user.name, "Ada Lovelace");
	assert_eq!(user.email.as_deref(), Some("ada@example.com"));
	assert_eq!(user.avatar.as_deref(), Some("https://img.example.com/ada"));
	assert_eq!(user.provider, ProviderName::Google);
}

#[tokio::test]
async fn token_endpoint_failure_surfaces_status_and_body() {
	let server = MockServer::start_async().await;
	let manager = build_manager(
		ProviderName::Linkedin,
		ProviderConfig::new("client-it", "secret-it").with_endpoints(overrides(&server, "/me")),
	);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/me");
			then.status(200).body("{}");
		})
		.await;
	let err = manager
		.handle_callback("linkedin", &OAuthRequest::default().with_query([("code", "expired")]))
		.await
		.expect_err("A rejected code must fail the callback.");

	token_mock.assert_async().await;

	assert_eq!(profile_mock.hits_async().await, 0);
	assert!(matches!(
		err,
		Error::TokenExchangeFailed { provider: ProviderName::Linkedin, status: 400, ref body }
			if body == "{\"error\":\"invalid_grant\"}"
	));
}

#[tokio::test]
async fn malformed_token_body_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let manager = build_manager(
		ProviderName::Facebook,
		ProviderConfig::new("client-it", "secret-it").with_endpoints(overrides(&server, "/me")),
	);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body("{\"token_type\":\"bearer\"}");
		})
		.await;

	let err = manager
		.handle_callback("facebook", &OAuthRequest::default().with_query([("code", "c")]))
		.await
		.expect_err("A token body without an access token must fail.");

	assert!(matches!(
		err,
		Error::Decode(DecodeError::TokenResponse {
			provider: ProviderName::Facebook,
			status: 200,
			..
		})
	));
}

#[tokio::test]
async fn github_email_lookup_follows_profile_endpoint_override() {
	let server = MockServer::start_async().await;
	let manager = build_manager(
		ProviderName::Github,
		ProviderConfig::new("client-it", "secret-it")
			.with_endpoints(overrides(&server, "/api/v3/user")),
	);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body("{\"access_token\":\"gh-token\",\"token_type\":\"bearer\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/user").header("authorization", "Bearer gh-token");
			then.status(200).body("{\"id\":1,\"login\":\"octocat\",\"name\":\"The Octocat\"}");
		})
		.await;

	let emails_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v3/user/emails")
				.header("authorization", "Bearer gh-token");
			then.status(200).body(
				"[{\"email\":\"first@example.com\",\"primary\":false},{\"email\":\"primary@example.com\",\"primary\":true}]",
			);
		})
		.await;
	let user = manager
		.handle_callback("github", &OAuthRequest::default().with_query([("code", "gh-code")]))
		.await
		.expect("GitHub callback should succeed against the mock server.");

	emails_mock.assert_async().await;

	assert_eq!(user.id, "1");
	assert_eq!(user.name, "The Octocat");
	assert_eq!(user.email.as_deref(), Some("primary@example.com"));
}
