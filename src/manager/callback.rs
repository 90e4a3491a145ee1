//! Inbound callback projection and authorization-code extraction.

// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Base used to resolve relative callback URLs such as `/auth/callback?code=…`.
const RELATIVE_URL_BASE: &str = "http://localhost";

/// Read-only view over an inbound callback request.
///
/// Hosts fill whichever parts their framework exposes. The authorization code is looked up in
/// the query map, then the body map, then the `code` query parameter of `url`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthRequest {
	/// Decoded query parameters.
	pub query: Option<HashMap<String, String>>,
	/// Decoded body fields (`response_mode=form_post` delivers the code here).
	pub body: Option<HashMap<String, String>>,
	/// Absolute or relative request URL.
	pub url: Option<String>,
}
impl OAuthRequest {
	/// Creates a request that only carries the raw callback URL.
	pub fn from_url(url: impl Into<String>) -> Self {
		Self { url: Some(url.into()), ..Default::default() }
	}

	/// Sets the decoded query parameters.
	pub fn with_query<I, K, V>(mut self, query: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query = Some(collect_pairs(query));

		self
	}

	/// Sets the decoded body fields.
	pub fn with_body<I, K, V>(mut self, body: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.body = Some(collect_pairs(body));

		self
	}

	/// Parses an `application/x-www-form-urlencoded` payload into the body fields.
	pub fn with_form_body(mut self, body: impl AsRef<[u8]>) -> Self {
		self.body = Some(form_urlencoded::parse(body.as_ref()).into_owned().collect());

		self
	}

	/// Returns the authorization code, if any part of the request carries a non-empty one.
	///
	/// Malformed URLs count as "no code" and never fail.
	pub fn authorization_code(&self) -> Option<String> {
		field(self.query.as_ref())
			.or_else(|| field(self.body.as_ref()))
			.or_else(|| self.url.as_deref().and_then(code_from_url))
	}
}

fn collect_pairs<I, K, V>(pairs: I) -> HashMap<String, String>
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

fn field(map: Option<&HashMap<String, String>>) -> Option<String> {
	map.and_then(|m| m.get("code")).filter(|code| !code.is_empty()).cloned()
}

fn code_from_url(raw: &str) -> Option<String> {
	let base = Url::parse(RELATIVE_URL_BASE).ok()?;
	let url = base.join(raw).ok()?;

	url.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.filter(|code| !code.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_takes_precedence_over_body_and_url() {
		let request = OAuthRequest::from_url("https://app.example.com/cb?code=u")
			.with_query([("code", "q")])
			.with_body([("code", "b")]);

		assert_eq!(request.authorization_code().as_deref(), Some("q"));
	}

	#[test]
	fn body_is_used_when_query_has_no_code() {
		let request = OAuthRequest::default()
			.with_query([("state", "s")])
			.with_form_body("code=from%20form&state=s");

		assert_eq!(request.authorization_code().as_deref(), Some("from form"));
	}

	#[test]
	fn relative_and_absolute_urls_are_parsed() {
		assert_eq!(
			OAuthRequest::from_url("/auth/github/callback?code=abc&state=x")
				.authorization_code()
				.as_deref(),
			Some("abc")
		);
		assert_eq!(
			OAuthRequest::from_url("https://app.example.com/cb?state=x&code=def")
				.authorization_code()
				.as_deref(),
			Some("def")
		);
	}

	#[test]
	fn empty_codes_fall_through() {
		let request = OAuthRequest::from_url("/cb?code=fromurl")
			.with_query([("code", "")])
			.with_body([("code", "")]);

		assert_eq!(request.authorization_code().as_deref(), Some("fromurl"));
		assert!(OAuthRequest::from_url("/cb?code=").authorization_code().is_none());
	}

	#[test]
	fn only_the_first_url_code_counts() {
		assert!(OAuthRequest::from_url("/cb?code=&code=x").authorization_code().is_none());
		assert_eq!(
			OAuthRequest::from_url("/cb?code=a&code=b").authorization_code().as_deref(),
			Some("a")
		);
	}

	#[test]
	fn malformed_or_missing_sources_yield_none() {
		assert!(OAuthRequest::default().authorization_code().is_none());
		assert!(OAuthRequest::from_url("http://[::1").authorization_code().is_none());
		assert!(
			OAuthRequest::from_url("https://app.example.com/cb").authorization_code().is_none()
		);
	}
}
