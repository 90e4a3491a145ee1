//! Google OAuth 2.0 with the OpenID Connect userinfo endpoint.

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	provider::{OAuthProvider, ProviderContext, ProviderDescriptor, def_provider, profile},
};

/// Google endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Google,
	authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth",
	token_endpoint: "https://oauth2.googleapis.com/token",
	user_profile_endpoint: Some("https://www.googleapis.com/oauth2/v2/userinfo"),
	default_scopes: &["openid", "profile", "email"],
};

def_provider!(GoogleProvider, DESCRIPTOR, "Google sign-in.");
impl OAuthProvider for GoogleProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/id", "id")?;

		Ok(OAuthUser {
			name: profile::string_at(&profile, "/name").unwrap_or_else(|| id.clone()),
			email: profile::string_at(&profile, "/email"),
			avatar: profile::string_at(&profile, "/picture"),
			provider: self.name(),
			id,
			raw: profile,
		})
	}
}
