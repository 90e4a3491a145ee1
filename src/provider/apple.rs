//! Sign in with Apple.
//!
//! Apple has no profile endpoint: identity claims arrive in the signed `id_token` of the token
//! response. Verifying that JWT (fetching Apple's JWKS, checking signature, audience, and
//! expiry) is outside this crate, so profile retrieval fails with
//! [`Error::UnsupportedOperation`] instead of trusting unverified claims. Hosts that verify
//! the token themselves can feed the claims to [`OAuthProvider::normalize_user`].

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	provider::{
		OAuthProvider, ProviderContext, ProviderDescriptor, ProviderFuture, def_provider, profile,
	},
};

/// Placeholder name used when the claims carry none.
pub const FALLBACK_NAME: &str = "Apple User";

/// Apple endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Apple,
	authorization_endpoint: "https://appleid.apple.com/auth/authorize",
	token_endpoint: "https://appleid.apple.com/auth/token",
	user_profile_endpoint: None,
	default_scopes: &["name", "email"],
};

def_provider!(AppleProvider, DESCRIPTOR, "Sign in with Apple.");
impl OAuthProvider for AppleProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	/// Requests `response_mode=form_post`; Apple then POSTs the code to the redirect URI.
	fn build_authorization_url(&self, state: Option<&str>) -> Url {
		self.context.authorization_url(state, &[("response_mode", "form_post")])
	}

	fn fetch_user_profile<'a>(&'a self, _access_token: &'a str) -> ProviderFuture<'a, Value> {
		let unsupported: Result<Value> = Err(Error::UnsupportedOperation {
			provider: self.name(),
			operation: "user profile retrieval",
			reason: "Apple delivers identity claims in a signed ID token, which must be verified with a JWT library",
		});

		Box::pin(async move { unsupported })
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/sub", "sub")?;

		Ok(OAuthUser {
			id,
			name: profile::string_at(&profile, "/name").unwrap_or_else(|| FALLBACK_NAME.into()),
			email: profile::string_at(&profile, "/email"),
			avatar: None,
			provider: self.name(),
			raw: profile,
		})
	}
}
