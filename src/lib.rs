//! One client for many OAuth 2.0 identity providers. Configure Google, GitHub, Apple and
//! friends once, then turn every provider callback into the same normalized user.
//!
//! The crate is split into a provider contract ([`provider::OAuthProvider`]) with one
//! implementation per identity provider, and a caller-owned [`manager::OAuthManager`] that
//! registers configured providers, builds authorization URLs, and runs the
//! code → token → profile → user pipeline for callbacks.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use oauth2::{HttpRequest, HttpResponse, http::StatusCode};
	// self
	use crate::{
		config::OAuthConfig,
		error::TransportError,
		http::{HttpFuture, HttpTransport, ReqwestHttpClient},
		manager::OAuthManager,
	};

	/// Request captured by [`RecordingTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// HTTP method name.
		pub method: String,
		/// Absolute request URL.
		pub url: String,
		/// Header name/value pairs (lowercase names).
		pub headers: Vec<(String, String)>,
		/// Raw request body decoded as UTF-8.
		pub body: String,
	}
	impl RecordedRequest {
		/// Returns the first header value stored under `name`.
		pub fn header(&self, name: &str) -> Option<&str> {
			self.headers
				.iter()
				.find(|(key, _)| key.eq_ignore_ascii_case(name))
				.map(|(_, value)| value.as_str())
		}

		/// Decodes the body as an `application/x-www-form-urlencoded` map.
		pub fn form(&self) -> HashMap<String, String> {
			url::form_urlencoded::parse(self.body.as_bytes()).into_owned().collect()
		}
	}

	/// In-process transport that records every request and replays canned responses matched
	/// by URL prefix (longest prefix wins).
	#[derive(Clone, Default)]
	pub struct RecordingTransport {
		routes: Arc<Mutex<Vec<(String, u16, String)>>>,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl RecordingTransport {
		/// Registers a canned response for every URL starting with `prefix`.
		pub fn respond(&self, prefix: impl Into<String>, status: u16, body: impl Into<String>) {
			self.routes.lock().push((prefix.into(), status, body.into()));
		}

		/// Returns every request observed so far.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpTransport for RecordingTransport {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			let recorded = RecordedRequest {
				method: request.method().to_string(),
				url: request.uri().to_string(),
				headers: request
					.headers()
					.iter()
					.map(|(name, value)| {
						(name.as_str().to_owned(), value.to_str().unwrap_or_default().to_owned())
					})
					.collect(),
				body: String::from_utf8_lossy(request.body()).into_owned(),
			};
			let route = self
				.routes
				.lock()
				.iter()
				.filter(|(prefix, _, _)| recorded.url.starts_with(prefix.as_str()))
				.max_by_key(|(prefix, _, _)| prefix.len())
				.map(|(_, status, body)| (*status, body.clone()));

			self.requests.lock().push(recorded);

			Box::pin(async move {
				let (status, body) = route.unwrap_or((404, "{\"error\":\"no route\"}".into()));
				let mut response = HttpResponse::new(body.into_bytes());

				*response.status_mut() = StatusCode::from_u16(status)
					.map_err(|e| TransportError::network(std::io::Error::other(e)))?;

				Ok(response)
			})
		}
	}

	/// Builds a manager backed by `transport` and applies `config`.
	pub fn build_recording_manager(
		transport: &RecordingTransport,
		config: OAuthConfig,
	) -> OAuthManager {
		let manager = OAuthManager::with_http_client(Arc::new(transport.clone()));

		manager.configure(config).expect("Test configuration should be valid.");

		manager
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
