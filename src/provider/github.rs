//! GitHub OAuth apps.
//!
//! GitHub omits `email` from `/user` when the user keeps it private; the provider then asks
//! `/user/emails` (which the default `user:email` scope unlocks) and merges the primary
//! address into the profile before normalization.

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::ProviderName,
	http,
	provider::{
		OAuthProvider, ProviderContext, ProviderDescriptor, ProviderFuture, def_provider, profile,
	},
};

/// GitHub endpoints and default scopes.
pub const DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
	name: ProviderName::Github,
	authorization_endpoint: "https://github.com/login/oauth/authorize",
	token_endpoint: "https://github.com/login/oauth/access_token",
	user_profile_endpoint: Some("https://api.github.com/user"),
	default_scopes: &["user:email"],
};

def_provider!(GitHubProvider, DESCRIPTOR, "GitHub sign-in.");
impl GitHubProvider {
	/// Secondary emails listing, always `<profile endpoint>/emails`.
	pub fn user_emails_endpoint(&self) -> Option<Url> {
		let mut url = self.user_profile_endpoint()?.clone();

		url.path_segments_mut().ok()?.pop_if_empty().push("emails");

		Some(url)
	}

	/// Looks up the primary address; a non-success status leaves the email unknown.
	async fn lookup_email(&self, access_token: &str) -> Result<Option<String>> {
		let Some(url) = self.user_emails_endpoint() else {
			return Ok(None);
		};
		let response = self.context.send(http::bearer_get(&url, access_token)?).await?;

		if !response.status().is_success() {
			return Ok(None);
		}

		Ok(select_email(&self.context.decode_json(&response)?))
	}
}
impl OAuthProvider for GitHubProvider {
	fn context(&self) -> &ProviderContext {
		&self.context
	}

	fn fetch_user_profile<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, Value> {
		Box::pin(async move {
			let endpoint = self.user_profile_endpoint().ok_or(Error::UnsupportedOperation {
				provider: self.name(),
				operation: "user profile retrieval",
				reason: "the user profile endpoint is not configured",
			})?;
			let mut profile = self.context.request_profile(endpoint, access_token).await?;

			if profile::string_at(&profile, "/email").is_none() {
				let email = self.lookup_email(access_token).await?;

				if let (Some(email), Some(object)) = (email, profile.as_object_mut()) {
					object.insert("email".into(), Value::String(email));
				}
			}

			Ok(profile)
		})
	}

	fn normalize_user(&self, profile: Value) -> Result<OAuthUser> {
		let id = profile::require_id(self.name(), &profile, "/id", "id")?;

		Ok(OAuthUser {
			name: profile::first_string_at(&profile, &["/name", "/login"])
				.unwrap_or_else(|| id.clone()),
			email: profile::string_at(&profile, "/email"),
			avatar: profile::string_at(&profile, "/avatar_url"),
			provider: self.name(),
			id,
			raw: profile,
		})
	}
}

/// Picks the address of the entry flagged `primary`, else the address of the first entry.
fn select_email(emails: &Value) -> Option<String> {
	let entries = emails.as_array()?;
	let email = |entry: &Value| profile::string_at(entry, "/email");

	entries
		.iter()
		.find(|entry| entry.get("primary") == Some(&Value::Bool(true)))
		.and_then(email)
		.or_else(|| entries.first().and_then(email))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		config::{EndpointOverrides, ProviderConfig},
		provider,
	};

	#[test]
	fn emails_endpoint_extends_profile_endpoint() {
		let build = |user_profile: Option<&str>| {
			GitHubProvider::new(
				ProviderConfig::new("c", "s").with_endpoints(EndpointOverrides {
					user_profile: user_profile.map(Into::into),
					..Default::default()
				}),
				"https://host/cb",
				provider::offline_transport(),
			)
			.expect("GitHub provider should build.")
		};

		assert_eq!(
			build(None).user_emails_endpoint().map(|url| url.to_string()).as_deref(),
			Some("https://api.github.com/user/emails")
		);
		assert_eq!(
			build(Some("https://ghe.example.com/api/v3/user/"))
				.user_emails_endpoint()
				.map(|url| url.to_string())
				.as_deref(),
			Some("https://ghe.example.com/api/v3/user/emails")
		);
	}

	#[test]
	fn primary_email_wins_over_order() {
		let emails = json!([
			{ "email": "a@x.com", "primary": false, "verified": true },
			{ "email": "b@x.com", "primary": true, "verified": true },
		]);

		assert_eq!(select_email(&emails).as_deref(), Some("b@x.com"));
	}

	#[test]
	fn first_email_is_the_fallback() {
		let emails = json!([{ "email": "a@x.com", "primary": false }, { "email": "c@x.com" }]);

		assert_eq!(select_email(&emails).as_deref(), Some("a@x.com"));
		assert_eq!(select_email(&json!([])), None);
		assert_eq!(select_email(&json!({ "message": "Not Found" })), None);
	}

	#[test]
	fn primary_entry_without_address_falls_back_to_first() {
		let emails = json!([{ "email": "a@x.com", "primary": false }, { "primary": true }]);

		assert_eq!(select_email(&emails).as_deref(), Some("a@x.com"));
	}
}
