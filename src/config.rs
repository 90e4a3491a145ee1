//! Host-facing configuration records.
//!
//! Every record (de)serializes with camelCase keys so hosts can keep provider credentials in
//! JSON or TOML next to the rest of their settings. Loading those files (and environment
//! variables) stays the host's job.

// self
use crate::_prelude::*;

/// Identity providers supported by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
	/// Google (OpenID Connect userinfo).
	Google,
	/// Facebook Graph API.
	Facebook,
	/// GitHub REST API.
	Github,
	/// Twitter/X API v2.
	Twitter,
	/// LinkedIn OpenID Connect userinfo.
	Linkedin,
	/// Sign in with Apple.
	Apple,
	/// Microsoft identity platform + Graph.
	Microsoft,
}
impl ProviderName {
	/// Every supported provider, in declaration order.
	pub const ALL: [ProviderName; 7] = [
		ProviderName::Google,
		ProviderName::Facebook,
		ProviderName::Github,
		ProviderName::Twitter,
		ProviderName::Linkedin,
		ProviderName::Apple,
		ProviderName::Microsoft,
	];

	/// Returns the stable lowercase identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderName::Google => "google",
			ProviderName::Facebook => "facebook",
			ProviderName::Github => "github",
			ProviderName::Twitter => "twitter",
			ProviderName::Linkedin => "linkedin",
			ProviderName::Apple => "apple",
			ProviderName::Microsoft => "microsoft",
		}
	}
}
impl AsRef<str> for ProviderName {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProviderName {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|name| name.as_str() == s)
			.ok_or_else(|| Error::UnknownProvider { provider: s.to_owned() })
	}
}

/// Replacement URLs for a provider's built-in endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointOverrides {
	/// Authorization endpoint the end user is redirected to.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authorization: Option<String>,
	/// Token endpoint used for the code exchange.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	/// User profile endpoint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_profile: Option<String>,
}
impl EndpointOverrides {
	/// Returns true when no endpoint is overridden.
	pub fn is_empty(&self) -> bool {
		self.authorization.is_none() && self.token.is_none() && self.user_profile.is_none()
	}
}

/// Credentials and options for a single provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: String,
	/// Scopes replacing the provider defaults, in request order.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<Vec<String>>,
	/// Redirect URI overriding [`OAuthConfig::redirect_uri`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<String>,
	/// Fixed PKCE verifier for providers that require PKCE.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pkce_verifier: Option<String>,
	/// Endpoint replacements (tenant-specific hosts, enterprise installs, test servers).
	#[serde(default, skip_serializing_if = "EndpointOverrides::is_empty")]
	pub endpoints: EndpointOverrides,
}
impl ProviderConfig {
	/// Creates a configuration from a client identifier + secret pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			scope: None,
			redirect_uri: None,
			pkce_verifier: None,
			endpoints: EndpointOverrides::default(),
		}
	}

	/// Replaces the provider's default scopes.
	pub fn with_scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = Some(scope.into_iter().map(Into::into).collect());

		self
	}

	/// Overrides the global redirect URI for this provider.
	pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Pins the PKCE verifier instead of generating one per provider instance.
	pub fn with_pkce_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.pkce_verifier = Some(verifier.into());

		self
	}

	/// Replaces built-in endpoints.
	pub fn with_endpoints(mut self, endpoints: EndpointOverrides) -> Self {
		self.endpoints = endpoints;

		self
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri)
			.field("pkce_verifier_set", &self.pkce_verifier.is_some())
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

/// Root configuration passed to [`OAuthManager::configure`](crate::manager::OAuthManager::configure).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
	/// Provider configurations; `None` entries stay inactive.
	#[serde(default)]
	pub providers: BTreeMap<ProviderName, Option<ProviderConfig>>,
	/// Global redirect URI used when a provider does not override it.
	pub redirect_uri: String,
}
impl OAuthConfig {
	/// Creates an empty configuration with the global redirect URI.
	pub fn new(redirect_uri: impl Into<String>) -> Self {
		Self { providers: BTreeMap::new(), redirect_uri: redirect_uri.into() }
	}

	/// Activates `name` with the provided configuration.
	pub fn with_provider(mut self, name: ProviderName, config: ProviderConfig) -> Self {
		self.providers.insert(name, Some(config));

		self
	}

	/// Iterates over the active (non-`None`) provider entries.
	pub fn active_providers(&self) -> impl Iterator<Item = (ProviderName, &ProviderConfig)> {
		self.providers.iter().filter_map(|(name, config)| config.as_ref().map(|c| (*name, c)))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn provider_names_round_trip_through_strings() {
		for name in ProviderName::ALL {
			assert_eq!(name.as_str().parse::<ProviderName>().ok(), Some(name));
		}

		let err = "myspace".parse::<ProviderName>().expect_err("Unknown names must be rejected.");

		assert!(matches!(err, Error::UnknownProvider { provider } if provider == "myspace"));
		assert!("Google".parse::<ProviderName>().is_err(), "Names are case-sensitive.");
	}

	#[test]
	fn config_deserializes_from_camel_case_json() {
		let config: OAuthConfig = serde_json::from_str(
			r#"{
				"providers": {
					"google": { "clientId": "g-id", "clientSecret": "g-secret" },
					"github": null,
					"twitter": {
						"clientId": "t-id",
						"clientSecret": "t-secret",
						"scope": ["users.read"],
						"redirectUri": "https://app.example.com/twitter",
						"endpoints": { "token": "https://mock.example.com/token" }
					}
				},
				"redirectUri": "https://app.example.com/cb"
			}"#,
		)
		.expect("Configuration JSON should deserialize.");
		let active = config.active_providers().map(|(name, _)| name).collect::<Vec<_>>();

		assert_eq!(active, vec![ProviderName::Google, ProviderName::Twitter]);

		let twitter = config.providers[&ProviderName::Twitter]
			.as_ref()
			.expect("Twitter entry should be present.");

		assert_eq!(twitter.scope.as_deref(), Some(&["users.read".to_owned()][..]));
		assert_eq!(twitter.redirect_uri.as_deref(), Some("https://app.example.com/twitter"));
		assert_eq!(twitter.endpoints.token.as_deref(), Some("https://mock.example.com/token"));
		assert!(twitter.endpoints.authorization.is_none());
	}

	#[test]
	fn provider_config_debug_redacts_secret() {
		let config = ProviderConfig::new("client", "super-secret").with_pkce_verifier("v".repeat(43));
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains(&"v".repeat(43)));
	}
}
