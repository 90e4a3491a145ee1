//! Crate-level error types shared by the manager, providers, and transports.

// self
use crate::{_prelude::*, config::ProviderName};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream body did not match the expected JSON shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The manager was used before [`configure`](crate::manager::OAuthManager::configure).
	#[error("OAuth manager is not configured; call `configure` first.")]
	NotConfigured,
	/// Provider name is unknown or has no registered instance.
	#[error("Provider `{provider}` is not configured or not supported.")]
	UnknownProvider {
		/// Provider name as supplied by the caller.
		provider: String,
	},
	/// Callback request carries no authorization code.
	#[error("Authorization code not found in the callback request.")]
	MissingCode,
	/// Token endpoint answered with a non-success status or an OAuth error document.
	#[error("Token exchange with {provider} failed with HTTP {status}: {body}.")]
	TokenExchangeFailed {
		/// Provider that issued the request.
		provider: ProviderName,
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Profile endpoint answered with a non-success status.
	#[error("Fetching the {provider} user profile failed with HTTP {status}: {body}.")]
	ProfileFetchFailed {
		/// Provider that issued the request.
		provider: ProviderName,
		/// HTTP status code returned by the profile endpoint.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Provider cannot perform the requested operation.
	#[error("The {provider} provider does not support {operation}: {reason}.")]
	UnsupportedOperation {
		/// Provider that rejected the operation.
		provider: ProviderName,
		/// Operation label.
		operation: &'static str,
		/// Why the operation is unavailable.
		reason: &'static str,
	},
	/// Profile lacks a field required to build a normalized user.
	#[error("The {provider} profile is missing the `{field}` field.")]
	MalformedProfile {
		/// Provider whose profile was rejected.
		provider: ProviderName,
		/// Missing field.
		field: &'static str,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint URL cannot be parsed.
	#[error("The {provider} {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Provider the endpoint belongs to.
		provider: ProviderName,
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed as an absolute URL.
	#[error("The {provider} redirect URI is invalid: {uri}.")]
	InvalidRedirect {
		/// Provider the redirect URI resolved for.
		provider: ProviderName,
		/// Offending redirect URI.
		uri: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider configuration has an empty client identifier.
	#[error("The {provider} configuration is missing a client identifier.")]
	MissingClientId {
		/// Provider with the incomplete configuration.
		provider: ProviderName,
	},
	/// Pinned PKCE verifier violates RFC 7636 length or charset rules.
	#[error("The {provider} PKCE verifier must be 43-128 unreserved characters.")]
	InvalidPkceVerifier {
		/// Provider with the invalid verifier.
		provider: ProviderName,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response bodies that could not be decoded.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Token endpoint responded with JSON that does not match the token shape.
	#[error("The {provider} token endpoint returned malformed JSON.")]
	TokenResponse {
		/// Provider that issued the request.
		provider: ProviderName,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Profile endpoint responded with a body that is not JSON.
	#[error("The {provider} profile endpoint returned malformed JSON.")]
	Profile {
		/// Provider that issued the request.
		provider: ProviderName,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
