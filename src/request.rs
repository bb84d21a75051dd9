//! Authenticated resource requests carrying the issued bearer token.

// self
use crate::{_prelude::*, http::ReqwestHttpClient, secret::TokenSecret};

/// Resource endpoint failures, mirroring the token exchange taxonomy.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Resource endpoint answered with a non-2xx status.
	#[error("Resource endpoint rejected the request with HTTP {status}: {body}")]
	Endpoint {
		/// HTTP status code of the rejection.
		status: u16,
		/// Raw response body, preserved verbatim for diagnostics.
		body: String,
	},
	/// Underlying HTTP client reported a failure before a response was received.
	#[error("Network error occurred while calling the resource endpoint.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: ReqwestError,
	},
}
impl From<ReqwestError> for RequestError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport { source: e }
	}
}

/// Performs one GET against `resource` with an `Authorization: Bearer <token>` header.
///
/// The response body is returned verbatim with no schema validation; a non-2xx status
/// is surfaced as [`RequestError`] with status and body intact. The request is neither
/// retried nor cached.
pub fn fetch_resource(
	client: &ReqwestHttpClient,
	resource: &Url,
	access_token: &TokenSecret,
) -> Result<String> {
	let response = client
		.get(resource.clone())
		.bearer_auth(access_token.expose())
		.send()
		.map_err(RequestError::from)?;
	let status = response.status();
	let body = response.text().map_err(RequestError::from)?;

	if !status.is_success() {
		return Err(RequestError::Endpoint { status: status.as_u16(), body }.into());
	}

	Ok(body)
}
