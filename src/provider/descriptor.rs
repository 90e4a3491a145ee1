//! Static provider metadata and the per-instance context resolved from configuration.

// crates.io
use oauth2::{HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	config::{ProviderConfig, ProviderName},
	error::{ConfigError, DecodeError},
	http::{self, HttpTransport},
};

/// Built-in endpoints and scopes of a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Provider identifier.
	pub name: ProviderName,
	/// Authorization endpoint the end user is redirected to.
	pub authorization_endpoint: &'static str,
	/// Token endpoint used for the code exchange.
	pub token_endpoint: &'static str,
	/// User profile endpoint; `None` when profile data must come from elsewhere (ID token).
	pub user_profile_endpoint: Option<&'static str>,
	/// Scopes requested when the host does not override them.
	pub default_scopes: &'static [&'static str],
}

/// Endpoints after applying [`EndpointOverrides`](crate::config::EndpointOverrides).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Authorization endpoint.
	pub authorization: Url,
	/// Token endpoint.
	pub token: Url,
	/// User profile endpoint, if the provider has one.
	pub user_profile: Option<Url>,
}

/// Immutable state shared by every provider implementation.
///
/// Built once while the manager is configured: the redirect URI override has been applied,
/// endpoints are parsed, and scopes are resolved. Nothing in it changes afterwards.
#[derive(Clone)]
pub struct ProviderContext {
	/// Static metadata of the provider.
	pub descriptor: &'static ProviderDescriptor,
	/// Host-supplied configuration.
	pub config: ProviderConfig,
	/// Effective redirect URI (provider override, else the global one).
	pub redirect_uri: Url,
	/// Effective endpoints.
	pub endpoints: ProviderEndpoints,
	/// Effective scopes, in request order.
	pub scopes: Vec<String>,
	http_client: Arc<dyn HttpTransport>,
}
impl ProviderContext {
	/// Resolves `config` against `descriptor` and the global redirect URI.
	pub fn new(
		descriptor: &'static ProviderDescriptor,
		config: ProviderConfig,
		global_redirect_uri: &str,
		http_client: Arc<dyn HttpTransport>,
	) -> Result<Self, ConfigError> {
		let provider = descriptor.name;

		if config.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId { provider });
		}

		let redirect = config.redirect_uri.as_deref().unwrap_or(global_redirect_uri);
		let redirect_uri = Url::parse(redirect).map_err(|source| ConfigError::InvalidRedirect {
			provider,
			uri: redirect.to_owned(),
			source,
		})?;
		let overrides = &config.endpoints;
		let endpoints = ProviderEndpoints {
			authorization: parse_endpoint(
				provider,
				"authorization",
				overrides.authorization.as_deref().unwrap_or(descriptor.authorization_endpoint),
			)?,
			token: parse_endpoint(
				provider,
				"token",
				overrides.token.as_deref().unwrap_or(descriptor.token_endpoint),
			)?,
			user_profile: overrides
				.user_profile
				.as_deref()
				.or(descriptor.user_profile_endpoint)
				.map(|url| parse_endpoint(provider, "user profile", url))
				.transpose()?,
		};
		let scopes = config.scope.clone().unwrap_or_else(|| {
			descriptor.default_scopes.iter().map(|scope| (*scope).to_owned()).collect()
		});

		Ok(Self { descriptor, config, redirect_uri, endpoints, scopes, http_client })
	}

	/// Provider identifier.
	pub fn name(&self) -> ProviderName {
		self.descriptor.name
	}

	/// Builds the authorization redirect URL.
	///
	/// `extra` pairs are appended after the standard parameters and before `state`.
	pub fn authorization_url(&self, state: Option<&str>, extra: &[(&str, &str)]) -> Url {
		let mut url = self.endpoints.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("client_id", &self.config.client_id);
		pairs.append_pair("redirect_uri", self.redirect_uri.as_str());
		pairs.append_pair("response_type", "code");
		pairs.append_pair("scope", &self.scopes.join(" "));

		for (key, value) in extra {
			pairs.append_pair(key, value);
		}
		if let Some(state) = state {
			pairs.append_pair("state", state);
		}

		drop(pairs);

		url
	}

	/// Sends a request through the configured transport.
	pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
		Ok(self.http_client.execute(request).await?)
	}

	/// Sends a token request and parses the response.
	pub async fn request_token(&self, request: HttpRequest) -> Result<TokenResponse> {
		let response = self.send(request).await?;
		let status = response.status().as_u16();

		if !response.status().is_success() {
			return Err(Error::TokenExchangeFailed {
				provider: self.name(),
				status,
				body: http::body_text(&response),
			});
		}

		TokenResponse::from_body(self.name(), status, response.body())
	}

	/// Issues a bearer-authenticated GET and parses the JSON profile.
	pub async fn request_profile(&self, url: &Url, access_token: &str) -> Result<Value> {
		let response = self.send(http::bearer_get(url, access_token)?).await?;

		if !response.status().is_success() {
			return Err(Error::ProfileFetchFailed {
				provider: self.name(),
				status: response.status().as_u16(),
				body: http::body_text(&response),
			});
		}

		self.decode_json(&response)
	}

	/// Decodes a JSON body, reporting failures as profile decode errors.
	pub fn decode_json(&self, response: &HttpResponse) -> Result<Value> {
		let de = &mut serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(de).map_err(|source| {
			DecodeError::Profile {
				provider: self.name(),
				status: response.status().as_u16(),
				source,
			}
			.into()
		})
	}
}
impl Debug for ProviderContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderContext")
			.field("provider", &self.descriptor.name)
			.field("config", &self.config)
			.field("redirect_uri", &self.redirect_uri)
			.field("endpoints", &self.endpoints)
			.field("scopes", &self.scopes)
			.finish()
	}
}

fn parse_endpoint(
	provider: ProviderName,
	endpoint: &'static str,
	url: &str,
) -> Result<Url, ConfigError> {
	Url::parse(url).map_err(|source| ConfigError::InvalidEndpoint {
		provider,
		endpoint,
		url: url.to_owned(),
		source,
	})
}
