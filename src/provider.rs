//! Provider contract, descriptors, and the seven identity-provider implementations.
//!
//! `descriptor` holds the static metadata (`ProviderDescriptor`) and the per-instance
//! `ProviderContext` resolved from host configuration. `contract` defines [`OAuthProvider`],
//! whose default methods implement the standard authorization-code pipeline; each provider
//! module overrides only the stages where its wire protocol deviates:
//!
//! - `github`: falls back to the `/user/emails` listing when the profile hides the email.
//! - `twitter`: PKCE on the authorization URL, HTTP Basic client authentication on exchange.
//! - `apple`: `response_mode=form_post`, no profile endpoint.

pub mod apple;
pub mod contract;
pub mod descriptor;
pub mod facebook;
pub mod github;
pub mod google;
pub mod linkedin;
pub mod microsoft;
pub mod twitter;

mod profile;

pub use apple::AppleProvider;
pub use contract::*;
pub use descriptor::*;
pub use facebook::FacebookProvider;
pub use github::GitHubProvider;
pub use google::GoogleProvider;
pub use linkedin::LinkedInProvider;
pub use microsoft::MicrosoftProvider;
pub use twitter::TwitterProvider;

// self
use crate::{
	_prelude::*,
	config::{ProviderConfig, ProviderName},
	error::ConfigError,
	http::HttpTransport,
};

macro_rules! def_provider {
	($name:ident, $descriptor:path, $doc:literal) => {
		#[doc = $doc]
		#[derive(Debug)]
		pub struct $name {
			context: $crate::provider::ProviderContext,
		}
		impl $name {
			/// Resolves `config` against the provider's built-in endpoints and scopes.
			pub fn new(
				config: $crate::config::ProviderConfig,
				redirect_uri: &str,
				http_client: std::sync::Arc<dyn $crate::http::HttpTransport>,
			) -> std::result::Result<Self, $crate::error::ConfigError> {
				let context = $crate::provider::ProviderContext::new(
					&$descriptor,
					config,
					redirect_uri,
					http_client,
				)?;

				Ok(Self { context })
			}
		}
	};
}
pub(crate) use def_provider;

/// Returns the static descriptor of `name`.
pub fn descriptor(name: ProviderName) -> &'static ProviderDescriptor {
	match name {
		ProviderName::Google => &google::DESCRIPTOR,
		ProviderName::Facebook => &facebook::DESCRIPTOR,
		ProviderName::Github => &github::DESCRIPTOR,
		ProviderName::Twitter => &twitter::DESCRIPTOR,
		ProviderName::Linkedin => &linkedin::DESCRIPTOR,
		ProviderName::Apple => &apple::DESCRIPTOR,
		ProviderName::Microsoft => &microsoft::DESCRIPTOR,
	}
}

/// Instantiates the implementation registered for `name`.
///
/// `redirect_uri` is the global fallback; [`ProviderConfig::redirect_uri`] wins when set.
pub fn build_provider(
	name: ProviderName,
	config: ProviderConfig,
	redirect_uri: &str,
	http_client: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn OAuthProvider>, ConfigError> {
	let provider: Arc<dyn OAuthProvider> = match name {
		ProviderName::Google => Arc::new(GoogleProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Facebook =>
			Arc::new(FacebookProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Github => Arc::new(GitHubProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Twitter => Arc::new(TwitterProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Linkedin =>
			Arc::new(LinkedInProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Apple => Arc::new(AppleProvider::new(config, redirect_uri, http_client)?),
		ProviderName::Microsoft =>
			Arc::new(MicrosoftProvider::new(config, redirect_uri, http_client)?),
	};

	Ok(provider)
}

#[cfg(test)]
pub(crate) fn offline_transport() -> Arc<dyn HttpTransport> {
	// self
	use crate::{error::TransportError, http::HttpFuture};

	struct Offline;
	impl HttpTransport for Offline {
		fn execute(&self, _: oauth2::HttpRequest) -> HttpFuture<'_> {
			Box::pin(async {
				Err(TransportError::network(std::io::Error::other("Offline transport.")))
			})
		}
	}

	Arc::new(Offline)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_name_builds_its_own_variant() {
		for name in ProviderName::ALL {
			let provider = build_provider(
				name,
				ProviderConfig::new("client", "secret"),
				"https://host/cb",
				offline_transport(),
			)
			.expect("Provider should build.");

			assert_eq!(provider.name(), name);
			assert_eq!(provider.default_scopes(), descriptor(name).default_scopes);
			assert_eq!(provider.token_endpoint().as_str(), descriptor(name).token_endpoint);
		}
	}

	#[test]
	fn provider_redirect_overrides_global_one() {
		let provider = build_provider(
			ProviderName::Google,
			ProviderConfig::new("client", "secret").with_redirect_uri("https://host/google"),
			"https://host/cb",
			offline_transport(),
		)
		.expect("Provider should build.");
		let url = provider.build_authorization_url(None);
		let pairs = url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(pairs.get("redirect_uri").map(String::as_str), Some("https://host/google"));
		assert!(!pairs.contains_key("state"));
	}

	#[test]
	fn invalid_settings_are_rejected_at_construction() {
		let err = build_provider(
			ProviderName::Github,
			ProviderConfig::new(" ", "secret"),
			"https://host/cb",
			offline_transport(),
		)
		.expect_err("Blank client id must fail.");

		assert!(matches!(err, ConfigError::MissingClientId { provider: ProviderName::Github }));

		let err = build_provider(
			ProviderName::Microsoft,
			ProviderConfig::new("client", "secret").with_endpoints(
				crate::config::EndpointOverrides {
					token: Some("::not-a-url".into()),
					..Default::default()
				},
			),
			"https://host/cb",
			offline_transport(),
		)
		.expect_err("Broken endpoint must fail.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { endpoint: "token", .. }));
	}
}
