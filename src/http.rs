//! HTTP capability consumed by providers.
//!
//! The crate never talks to a concrete HTTP stack directly. Providers build plain
//! [`HttpRequest`] values (the `http` crate types re-exported by `oauth2`) and hand them to an
//! [`HttpTransport`], which owns connection pooling, TLS, timeouts, and cancellation. The
//! default [`ReqwestHttpClient`] lives behind the `reqwest` feature; custom transports only
//! need to implement [`HttpTransport::execute`].

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		HeaderValue, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// `User-Agent` sent with every provider request (GitHub rejects anonymous agents).
pub const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

/// Boxed future returned by [`HttpTransport::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to run provider requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// every provider a manager registers, and the returned future must be `Send` so callback
/// handling can hop executors. Non-2xx responses are *not* errors at this layer; providers
/// inspect the status themselves.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the full response (status, headers, body).
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let response = self.0.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Client authentication applied to form POSTs.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FormAuth<'a> {
	/// Credentials (if any) travel in the form body.
	Body,
	/// HTTP Basic with `client_id:client_secret`.
	Basic { client_id: &'a str, client_secret: &'a str },
}

/// Builds a form-encoded POST.
pub(crate) fn form_post(
	url: &Url,
	form: &[(&str, &str)],
	auth: FormAuth<'_>,
) -> Result<HttpRequest, ConfigError> {
	let body = Serializer::new(String::new()).extend_pairs(form).finish();
	let mut builder = Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, JSON_ACCEPT)
		.header(USER_AGENT, USER_AGENT_VALUE);

	if let FormAuth::Basic { client_id, client_secret } = auth {
		builder = builder.header(AUTHORIZATION, basic_authorization(client_id, client_secret)?);
	}

	Ok(builder.body(body.into_bytes())?)
}

/// Builds a bearer-authenticated GET.
pub(crate) fn bearer_get(url: &Url, access_token: &str) -> Result<HttpRequest, ConfigError> {
	let mut authorization = HeaderValue::try_from(format!("Bearer {access_token}"))
		.map_err(oauth2::http::Error::from)?;

	authorization.set_sensitive(true);

	Ok(Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(AUTHORIZATION, authorization)
		.header(ACCEPT, JSON_ACCEPT)
		.header(USER_AGENT, USER_AGENT_VALUE)
		.body(Vec::new())?)
}

fn basic_authorization(client_id: &str, client_secret: &str) -> Result<HeaderValue, ConfigError> {
	let credentials = STANDARD.encode(format!("{client_id}:{client_secret}"));
	let mut value = HeaderValue::try_from(format!("Basic {credentials}"))
		.map_err(oauth2::http::Error::from)?;

	value.set_sensitive(true);

	Ok(value)
}

/// Returns the body as lossy UTF-8 for error reporting.
pub(crate) fn body_text(response: &HttpResponse) -> String {
	String::from_utf8_lossy(response.body()).into_owned()
}
