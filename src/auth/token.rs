//! Token endpoint response model.

// self
use crate::{_prelude::*, config::ProviderName, error::DecodeError};

/// Redacted secret wrapper keeping token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Successful token endpoint response.
///
/// Produced by the code exchange and consumed right away by the profile fetch; nothing in the
/// crate stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Bearer token used for the profile request.
	pub access_token: TokenSecret,
	/// Token type, usually `bearer`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Lifetime of the access token in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	/// Refresh token, when the provider issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Granted scopes as returned by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// OpenID Connect identity token (never verified by this crate).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<TokenSecret>,
}
impl TokenResponse {
	/// Parses a 2xx token endpoint body.
	///
	/// Bodies that carry an OAuth `error` field instead of a token (GitHub answers bad codes
	/// with HTTP 200) are reported as [`Error::TokenExchangeFailed`].
	pub fn from_body(provider: ProviderName, status: u16, body: &[u8]) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_slice(body);

		match serde_path_to_error::deserialize::<_, Self>(de) {
			Ok(response) => Ok(response),
			Err(source) => {
				if serde_json::from_slice::<OAuthErrorBody>(body).is_ok() {
					return Err(Error::TokenExchangeFailed {
						provider,
						status,
						body: String::from_utf8_lossy(body).into_owned(),
					});
				}

				Err(DecodeError::TokenResponse { provider, status, source }.into())
			},
		}
	}
}

#[derive(Deserialize)]
struct OAuthErrorBody {
	#[allow(dead_code)]
	error: String,
}
