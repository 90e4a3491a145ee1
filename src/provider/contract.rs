//! The capability contract every identity provider satisfies.

// self
use crate::{
	_prelude::*,
	auth::{OAuthUser, TokenResponse},
	config::ProviderName,
	http::{self, FormAuth},
	provider::ProviderContext,
};

/// Boxed future returned by provider operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Provider contract: static metadata, profile normalization, and the overridable
/// authorize → exchange → fetch → normalize pipeline.
///
/// Implementors supply [`context`](OAuthProvider::context) (which carries the descriptor,
/// resolved endpoints, and credentials) plus [`normalize_user`](OAuthProvider::normalize_user).
/// Every other method has a default that matches the plain OAuth 2.0 authorization-code
/// flow; providers that deviate override only the stage that differs. The trait is
/// object-safe so the manager can keep heterogeneous providers behind `Arc<dyn OAuthProvider>`.
pub trait OAuthProvider: Send + Sync + Debug {
	/// Resolved per-instance state.
	fn context(&self) -> &ProviderContext;

	/// Maps the provider's native profile into an [`OAuthUser`].
	///
	/// Must not perform I/O. Missing optional fields fall back or stay absent; only a missing
	/// identifier is an error.
	fn normalize_user(&self, profile: Value) -> Result<OAuthUser>;

	/// Stable provider identifier.
	fn name(&self) -> ProviderName {
		self.context().name()
	}

	/// Authorization endpoint.
	fn authorization_endpoint(&self) -> &Url {
		&self.context().endpoints.authorization
	}

	/// Token endpoint.
	fn token_endpoint(&self) -> &Url {
		&self.context().endpoints.token
	}

	/// User profile endpoint; `None` when the provider has none.
	fn user_profile_endpoint(&self) -> Option<&Url> {
		self.context().endpoints.user_profile.as_ref()
	}

	/// Scopes requested when the host does not override them.
	fn default_scopes(&self) -> &'static [&'static str] {
		self.context().descriptor.default_scopes
	}

	/// Builds the redirect URL carrying `client_id`, `redirect_uri`, `response_type=code`,
	/// the space-joined scopes, and `state` when supplied.
	fn build_authorization_url(&self, state: Option<&str>) -> Url {
		self.context().authorization_url(state, &[])
	}

	/// Exchanges an authorization code with the client secret in the form body.
	fn exchange_code_for_token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenResponse> {
		Box::pin(async move {
			let ctx = self.context();
			let request = http::form_post(
				self.token_endpoint(),
				&[
					("client_id", ctx.config.client_id.as_str()),
					("client_secret", ctx.config.client_secret.as_str()),
					("code", code),
					("redirect_uri", ctx.redirect_uri.as_str()),
					("grant_type", "authorization_code"),
				],
				FormAuth::Body,
			)?;

			ctx.request_token(request).await
		})
	}

	/// Fetches the raw profile with a bearer-authenticated GET.
	fn fetch_user_profile<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, Value> {
		Box::pin(async move {
			let endpoint = self.user_profile_endpoint().ok_or(Error::UnsupportedOperation {
				provider: self.name(),
				operation: "user profile retrieval",
				reason: "the provider has no user profile endpoint",
			})?;

			self.context().request_profile(endpoint, access_token).await
		})
	}

	/// Runs exchange → fetch → normalize for an authorization code.
	fn authenticate<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, OAuthUser> {
		Box::pin(async move {
			let token = self.exchange_code_for_token(code).await?;
			let profile = self.fetch_user_profile(token.access_token.expose()).await?;

			self.normalize_user(profile)
		})
	}
}
