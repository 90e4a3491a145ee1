//! Twitter/X OAuth 2.0 (API v2).
//!
//! Twitter requires PKCE on the authorization request and HTTP Basic client authentication on
//! the token request; the client secret never travels in the form body. Each provider
//! instance owns one verifier (generated at construction unless the host pins one), so the
//! instance that built the authorization URL can also complete the exchange.

// self
use crate::{
	_prelude::*,
	auth::{OAuthUser, PkcePair, TokenResponse},
	config::{ProviderConfig, ProviderName},
	error::ConfigError,
	http::{self, FormAuth, HttpTransport},
	provider::{OAuthProvider, ProviderContext, ProviderDescriptor, ProviderFuture, profile},
};

/// Twitter endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Twitter,
	authorization_endpoint: "https://twitter.com/i/oauth2/authorize",
	token_endpoint: "https://api.twitter.com/2/oauth2/token",
	user_profile_endpoint: Some(
		"https://api.twitter.com/2/users/me?user.fields=id,name,username,profile_image_url",
	),
	default_scopes: &["tweet.read", "users.read"],
};

/// Twitter/X sign-in.
#[derive(Debug)]
pub struct TwitterProvider {
	context: ProviderContext,
	pkce: PkcePair,
}
impl TwitterProvider {
	/// Resolves `config` and prepares the PKCE pair.
	pub fn new(
		config: ProviderConfig,
		redirect_uri: &str,
		http_client: Arc<dyn HttpTransport>,
	) -> Result<Self, ConfigError> {
		let pkce = match config.pkce_verifier.as_deref() {
			Some(verifier) => PkcePair::from_verifier(verifier)
				.ok_or(ConfigError::InvalidPkceVerifier { provider: DESCRIPTOR.name })?,
			None => PkcePair::generate(),
		};
		let context = ProviderContext::new(&DESCRIPTOR, config, redirect_uri, http_client)?;

		Ok(Self { context, pkce })
	}

	/// PKCE pair bound to this instance.
	pub fn pkce(&self) -> &PkcePair {
		&self.pkce
	}
}
impl OAuthProvider for TwitterProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn build_authorization_url(&self, state: Option<&str>) -> Url {
		self.context.authorization_url(
			state,
			&[
				("code_challenge", self.pkce.challenge()),
				("code_challenge_method", self.pkce.method().as_str()),
			],
		)
	}

	fn exchange_code_for_token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenResponse> {
		Box::pin(async move {
			let config = &self.context.config;
			let request = http::form_post(
				self.token_endpoint(),
				&[
					("client_id", config.client_id.as_str()),
					("code", code),
					("redirect_uri", self.context.redirect_uri.as_str()),
					("grant_type", "authorization_code"),
					("code_verifier", self.pkce.verifier()),
				],
				FormAuth::Basic {
					client_id: &config.client_id,
					client_secret: &config.client_secret,
				},
			)?;

			self.context.request_token(request).await
		})
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		if !profile.get("data").is_some_and(Value::is_object) {
			return Err(Error::MalformedProfile { provider: self.name(), field: "data" });
		}

		let id = profile::require_id(self.name(), &profile, "/data/id", "data.id")?;

		Ok(OAuthUser {
			name: profile::first_string_at(&profile, &["/data/name", "/data/username"])
				.unwrap_or_else(|| id.clone()),
			// API v2 does not expose the email address to OAuth 2.0 apps.
			email: None,
			avatar: profile::string_at(&profile, "/data/profile_image_url"),
			provider: self.name(),
			id,
			raw: profile,
		})
	}
}
