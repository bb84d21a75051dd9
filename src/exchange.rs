//! Token exchange: one POST trading a signed assertion for an access token.

// self
use crate::{_prelude::*, assertion::Assertion, http::ReqwestHttpClient, secret::TokenSecret};

/// RFC 7523 grant type identifier sent with every exchange.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Token endpoint failures: a rejection carrying the provider's diagnostics, or a
/// transport fault before any response arrived.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// Token endpoint answered with a non-2xx status.
	#[error("Token endpoint rejected the exchange with HTTP {status}: {body}")]
	Endpoint {
		/// HTTP status code of the rejection.
		status: u16,
		/// Raw response body, preserved verbatim for diagnostics.
		body: String,
	},
	/// Underlying HTTP client reported a failure before a response was received.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: ReqwestError,
	},
}
impl From<ReqwestError> for TokenExchangeError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport { source: e }
	}
}

/// Failures turning a 2xx token response into a [`TokenResponse`].
#[derive(Debug, ThisError)]
pub enum ResponseParseError {
	/// Body was not valid JSON or lacked a required field.
	#[error("Token endpoint returned a malformed token response (HTTP {status}).")]
	Json {
		/// HTTP status code the body arrived with.
		status: u16,
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// `instance_url` was present but does not parse as a URL.
	#[error("Token endpoint returned an invalid instance URL: {value}.")]
	BaseUrl {
		/// Offending field value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

#[derive(Deserialize)]
struct RawTokenResponse {
	access_token: String,
	instance_url: String,
}

/// Parsed token endpoint response.
///
/// Both credential fields are opaque to this crate; `raw_body` keeps the verbatim
/// endpoint payload because the process-output contract reports it alongside the
/// extracted token.
#[derive(Clone)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: TokenSecret,
	/// API base address subsequent requests are resolved against.
	pub instance_url: Url,
	/// Verbatim token endpoint response body.
	pub raw_body: String,
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &self.access_token)
			.field("instance_url", &self.instance_url.as_str())
			.field("raw_body", &"<redacted>")
			.finish()
	}
}

/// Performs one POST to the token endpoint with the fixed grant type and the assertion.
///
/// No retry and no timeout policy beyond transport defaults; a non-2xx response is
/// surfaced as [`TokenExchangeError`] with its status and body intact, and a 2xx
/// response that cannot be parsed as [`ResponseParseError`].
pub fn exchange_assertion(
	client: &ReqwestHttpClient,
	token_endpoint: &Url,
	assertion: &Assertion,
) -> Result<TokenResponse> {
	let form = [("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion.compact())];
	let response = client
		.post(token_endpoint.clone())
		.form(&form)
		.send()
		.map_err(TokenExchangeError::from)?;
	let status = response.status();
	let body = response.text().map_err(TokenExchangeError::from)?;

	if !status.is_success() {
		return Err(TokenExchangeError::Endpoint { status: status.as_u16(), body }.into());
	}

	parse_token_response(status.as_u16(), body).map_err(Into::into)
}

fn parse_token_response(status: u16, body: String) -> Result<TokenResponse, ResponseParseError> {
	let mut deserializer = serde_json::Deserializer::from_str(&body);
	let raw: RawTokenResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseParseError::Json { status, source })?;
	let instance_url = Url::parse(&raw.instance_url)
		.map_err(|source| ResponseParseError::BaseUrl { value: raw.instance_url.clone(), source })?;

	Ok(TokenResponse {
		access_token: TokenSecret::new(raw.access_token),
		instance_url,
		raw_body: body,
	})
}
