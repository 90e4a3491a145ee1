//! Caller-owned registry that dispatches to configured providers.
//!
//! An [`OAuthManager`] starts empty. [`configure`](OAuthManager::configure) validates a full
//! [`OAuthConfig`], instantiates one provider per active entry, and swaps the resulting registry
//! in atomically. Lookups clone the provider handle out of the current snapshot, so a
//! reconfiguration never disturbs callbacks that are already in flight; they finish against the
//! configuration they started with.

pub mod callback;

pub use callback::OAuthRequest;

// self
use crate::{
	_prelude::*,
	auth::OAuthUser,
	config::{OAuthConfig, ProviderName},
	http::HttpTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{self, OAuthProvider},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[derive(Debug)]
struct Registry {
	config: OAuthConfig,
	providers: BTreeMap<ProviderName, Arc<dyn OAuthProvider>>,
}

/// Registry + dispatcher for every configured identity provider.
pub struct OAuthManager {
	http_client: Arc<dyn HttpTransport>,
	registry: RwLock<Option<Arc<Registry>>>,
}
impl OAuthManager {
	/// Creates an unconfigured manager backed by a default reqwest client.
	#[cfg(feature = "reqwest")]
	pub fn new() -> Self {
		Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
	}

	/// Creates an unconfigured manager that sends every provider request through `http_client`.
	pub fn with_http_client(http_client: Arc<dyn HttpTransport>) -> Self {
		Self { http_client, registry: RwLock::new(None) }
	}

	/// Replaces the registry with providers built from `config`.
	///
	/// Every active entry is validated and instantiated before the swap; on error the previous
	/// registry stays untouched. Calling it again fully replaces earlier state.
	pub fn configure(&self, config: OAuthConfig) -> Result<()> {
		let mut providers = BTreeMap::new();

		for (name, provider_config) in config.active_providers() {
			let provider = provider::build_provider(
				name,
				provider_config.clone(),
				&config.redirect_uri,
				self.http_client.clone(),
			)?;

			providers.insert(name, provider);
		}

		*self.registry.write() = Some(Arc::new(Registry { config, providers }));

		Ok(())
	}

	/// Builds the redirect URL for `provider`, carrying `state` when supplied.
	pub fn authorization_url(&self, provider: impl AsRef<str>, state: Option<&str>) -> Result<Url> {
		const KIND: FlowKind = FlowKind::AuthorizationUrl;

		let provider = provider.as_ref();
		let _guard = FlowSpan::new(KIND, provider).entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.provider(provider).map(|p| p.build_authorization_url(state));

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Extracts the authorization code from `request` and runs the provider's pipeline.
	///
	/// Fails with [`Error::NotConfigured`] or [`Error::UnknownProvider`] before looking at the
	/// request, then with [`Error::MissingCode`] when no code can be found.
	pub async fn handle_callback(
		&self,
		provider: impl AsRef<str>,
		request: &OAuthRequest,
	) -> Result<OAuthUser> {
		const KIND: FlowKind = FlowKind::Callback;

		let provider = provider.as_ref();
		let span = FlowSpan::new(KIND, provider);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let instance = self.provider(provider)?;
				let code = request.authorization_code().ok_or(Error::MissingCode)?;

				instance.authenticate(&code).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Returns the names of the currently registered providers.
	pub fn configured_providers(&self) -> BTreeSet<ProviderName> {
		self.registry
			.read()
			.as_ref()
			.map(|registry| registry.providers.keys().copied().collect())
			.unwrap_or_default()
	}

	/// Returns the registered provider instance for `name`.
	pub fn provider(&self, name: impl AsRef<str>) -> Result<Arc<dyn OAuthProvider>> {
		let registry = self.snapshot()?;
		let name = name.as_ref();
		let unknown = || Error::UnknownProvider { provider: name.to_owned() };
		let key = name.parse::<ProviderName>().map_err(|_| unknown())?;

		registry.providers.get(&key).cloned().ok_or_else(unknown)
	}

	/// Returns the last applied configuration, if any.
	pub fn config(&self) -> Option<OAuthConfig> {
		self.registry.read().as_ref().map(|registry| registry.config.clone())
	}

	fn snapshot(&self) -> Result<Arc<Registry>> {
		self.registry.read().clone().ok_or(Error::NotConfigured)
	}
}
#[cfg(feature = "reqwest")]
impl Default for OAuthManager {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for OAuthManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthManager")
			.field("configured_providers", &self.configured_providers())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::ProviderConfig,
		error::{ConfigError, TransportError},
	};

	fn manager() -> OAuthManager {
		OAuthManager::with_http_client(provider::offline_transport())
	}

	fn google_config() -> OAuthConfig {
		OAuthConfig::new("https://host/cb")
			.with_provider(ProviderName::Google, ProviderConfig::new("c", "s"))
	}

	#[test]
	fn unconfigured_manager_rejects_every_lookup() {
		let manager = manager();

		assert!(matches!(manager.authorization_url("google", None), Err(Error::NotConfigured)));
		assert!(matches!(manager.authorization_url("myspace", None), Err(Error::NotConfigured)));
		assert!(manager.configured_providers().is_empty());
		assert!(manager.config().is_none());
	}

	#[test]
	fn unknown_and_unregistered_names_fail_after_configuration() {
		let manager = manager();

		manager.configure(google_config()).expect("Configuration should apply.");

		assert!(matches!(
			manager.authorization_url("github", None),
			Err(Error::UnknownProvider { provider }) if provider == "github"
		));
		assert!(matches!(
			manager.authorization_url("myspace", Some("s")),
			Err(Error::UnknownProvider { provider }) if provider == "myspace"
		));
	}

	#[test]
	fn null_entries_stay_inactive() {
		let manager = manager();
		let mut config = google_config();

		config.providers.insert(ProviderName::Github, None);
		manager.configure(config).expect("Configuration should apply.");

		assert_eq!(manager.configured_providers(), BTreeSet::from([ProviderName::Google]));
	}

	#[test]
	fn invalid_configuration_keeps_previous_registry() {
		let manager = manager();

		manager.configure(google_config()).expect("Configuration should apply.");

		let broken = OAuthConfig::new("not a url")
			.with_provider(ProviderName::Github, ProviderConfig::new("id", "secret"));
		let err = manager.configure(broken).expect_err("Relative redirect must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidRedirect { .. })));
		assert_eq!(manager.configured_providers(), BTreeSet::from([ProviderName::Google]));
		assert_eq!(manager.config().map(|c| c.redirect_uri), Some("https://host/cb".into()));
	}

	#[tokio::test]
	async fn callback_without_code_fails_before_any_request() {
		let manager = manager();

		manager.configure(google_config()).expect("Configuration should apply.");

		let err = manager
			.handle_callback("google", &OAuthRequest::from_url("/cb?state=x"))
			.await
			.expect_err("Missing code must fail.");

		assert!(matches!(err, Error::MissingCode));
	}

	#[tokio::test]
	async fn callback_checks_provider_before_code() {
		let manager = manager();
		let err = manager
			.handle_callback("google", &OAuthRequest::default())
			.await
			.expect_err("Unconfigured manager must fail.");

		assert!(matches!(err, Error::NotConfigured));

		manager.configure(google_config()).expect("Configuration should apply.");

		let err = manager
			.handle_callback("apple", &OAuthRequest::default())
			.await
			.expect_err("Unregistered provider must fail.");

		assert!(matches!(err, Error::UnknownProvider { .. }));
	}

	#[tokio::test]
	async fn transport_failures_surface_unchanged() {
		let manager = manager();

		manager.configure(google_config()).expect("Configuration should apply.");

		let err = manager
			.handle_callback("google", &OAuthRequest::default().with_query([("code", "c")]))
			.await
			.expect_err("Offline transport must fail.");

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	}
}
