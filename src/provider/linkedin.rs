//! LinkedIn "Sign In with LinkedIn using OpenID Connect".

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	provider::{OAuthProvider, ProviderContext, ProviderDescriptor, def_provider, profile},
};

/// LinkedIn endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Linkedin,
	authorization_endpoint: "https://www.linkedin.com/oauth/v2/authorization",
	token_endpoint: "https://www.linkedin.com/oauth/v2/accessToken",
	user_profile_endpoint: Some("https://api.linkedin.com/v2/userinfo"),
	default_scopes: &["openid", "profile", "email"],
};

def_provider!(LinkedInProvider, DESCRIPTOR, "LinkedIn sign-in (OpenID Connect userinfo).");
impl OAuthProvider for LinkedInProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/sub", "sub")?;

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
