//! Provider-agnostic user profile.

// self
use crate::{_prelude::*, config::ProviderName};

/// Normalized user returned by every provider.
///
/// `id` and `name` are always non-empty, `provider` names the issuing provider, and `raw`
/// keeps the untouched upstream payload for host-specific extensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OAuthUser {
	/// Provider-scoped unique user identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Email address, when the provider shares one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Avatar URL, when the provider supplies one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// Issuing provider.
	pub provider: ProviderName,
	/// Original profile payload.
	pub raw: Value,
}
