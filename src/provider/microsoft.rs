//! Microsoft identity platform (v2.0 endpoints, `common` tenant) with Microsoft Graph.
//!
//! Tenant-specific installs replace the endpoints through
//! [`EndpointOverrides`](crate::config::EndpointOverrides).

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	provider::{OAuthProvider, ProviderContext, ProviderDescriptor, def_provider, profile},
};

/// Microsoft endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Microsoft,
	authorization_endpoint: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
	token_endpoint: "https://login.microsoftonline.com/common/oauth2/v2.0/token",
	user_profile_endpoint: Some("https://graph.microsoft.com/v1.0/me"),
	default_scopes: &["openid", "profile", "email", "User.Read"],
};

def_provider!(MicrosoftProvider, DESCRIPTOR, "Microsoft account / Entra ID sign-in.");
impl OAuthProvider for MicrosoftProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/id", "id")?;

		Ok(OAuthUser {
			name: profile::string_at(&profile, "/displayName").unwrap_or_else(|| id.clone()),
			email: profile::first_string_at(&profile, &["/mail", "/userPrincipalName"]),
			// Graph serves photos from a separate binary endpoint.
			avatar: None,
			provider: self.name(),
			id,
			raw: profile,
		})
	}
}
