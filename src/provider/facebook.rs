//! Facebook Login backed by the Graph API.

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	provider::{OAuthProvider, ProviderContext, ProviderDescriptor, def_provider, profile},
};

/// Facebook endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Facebook,
	authorization_endpoint: "https://www.facebook.com/v18.0/dialog/oauth",
	token_endpoint: "https://graph.facebook.com/v18.0/oauth/access_token",
	user_profile_endpoint: Some("https://graph.facebook.com/me?fields=id,name,email,picture"),
	default_scopes: &["email", "public_profile"],
};

def_provider!(FacebookProvider, DESCRIPTOR, "Facebook Login.");
impl OAuthProvider for FacebookProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/id", "id")?;

		Ok(OAuthUser {
			name: profile::string_at(&profile, "/name").unwrap_or_else(|| id.clone()),
			email: profile::string_at(&profile, "/email"),
			// Graph wraps the picture as `{ "data": { "url": … } }`.
			avatar: profile::string_at(&profile, "/picture/data/url"),
			provider: self.name(),
			id,
			raw: profile,
		})
	}
}
