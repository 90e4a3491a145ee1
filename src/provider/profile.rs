//! Field lookups shared by profile normalizers.

// self
use crate::{_prelude::*, config::ProviderName};

/// Reads `pointer` as a non-empty string; numbers are stringified.
pub(crate) fn string_at(profile: &Value, pointer: &str) -> Option<String> {
	match profile.pointer(pointer)? {
		Value::String(value) if !value.is_empty() => Some(value.clone()),
		Value::Number(value) => Some(value.to_string()),
		_ => None,
	}
}

/// Returns the first pointer that resolves to a value.
pub(crate) fn first_string_at(profile: &Value, pointers: &[&str]) -> Option<String> {
	pointers.iter().find_map(|pointer| string_at(profile, pointer))
}

/// Reads the provider-scoped user id, failing when it is absent.
pub(crate) fn require_id(
	provider: ProviderName,
	profile: &Value,
	pointer: &str,
	field: &'static str,
) -> Result<String> {
	string_at(profile, pointer).ok_or(Error::MalformedProfile { provider, field })
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn string_lookup_coerces_numbers_and_skips_empty_values() {
		let profile = json!({
			"id": 42,
			"name": "",
			"login": "octo",
			"nested": { "url": "u" },
			"flag": true
		});

		assert_eq!(string_at(&profile, "/id").as_deref(), Some("42"));
		assert_eq!(string_at(&profile, "/name"), None);
		assert_eq!(string_at(&profile, "/flag"), None);
		assert_eq!(string_at(&profile, "/nested/url").as_deref(), Some("u"));
		assert_eq!(first_string_at(&profile, &["/name", "/login"]).as_deref(), Some("octo"));
	}

	#[test]
	fn missing_ids_are_reported() {
		let err = require_id(ProviderName::Google, &json!({}), "/id", "id")
			.expect_err("Missing ids must fail.");

		assert!(matches!(
			err,
			Error::MalformedProfile { provider: ProviderName::Google, field: "id" }
		));
	}
}
