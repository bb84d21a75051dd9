//! The linear four-stage pipeline: load key, build assertion, exchange token, issue
//! request.
//!
//! The pipeline is strictly fail-fast: any stage error terminates the run and no stage
//! is ever retried or re-entered. One assertion is built per run and consumed by
//! exactly one exchange, which keeps the single-use expiry invariant by construction.

// self
use crate::{
	_prelude::*,
	assertion::Assertion,
	config::FlowConfig,
	error::ConfigError,
	exchange::{self, TokenResponse},
	http::ReqwestHttpClient,
	keystore::{KeyStore, SigningKey},
	obs::{self, StageKind, StageOutcome, StageSpan},
	request,
	secret::TokenSecret,
};

/// Outputs collected by a completed run, one per stage.
///
/// These are the four values the original one-shot program wrote to standard output;
/// printing is left to the caller.
#[derive(Clone, Debug)]
pub struct FlowReport {
	/// Compact signed assertion sent to the token endpoint.
	pub assertion: String,
	/// Verbatim token endpoint response body.
	pub token_raw_body: String,
	/// Extracted access token.
	pub access_token: TokenSecret,
	/// Resolved resource URL the authenticated request was issued against.
	pub resource_url: Url,
	/// Verbatim resource endpoint response body.
	pub resource_body: String,
}

/// Drives the JWT bearer grant from key material to an authenticated resource response.
///
/// The flow owns the HTTP client and configuration so each run is self-contained;
/// there is no shared mutable state across runs and no cross-run caching.
#[derive(Clone, Debug)]
pub struct BearerFlow {
	/// HTTP client used for both outbound calls.
	pub http_client: ReqwestHttpClient,
	/// Externalized flow configuration.
	pub config: FlowConfig,
}
impl BearerFlow {
	/// Creates a flow with the crate's default HTTP client.
	pub fn new(config: FlowConfig) -> Result<Self> {
		Ok(Self { http_client: ReqwestHttpClient::new()?, config })
	}

	/// Creates a flow that reuses a caller-provided HTTP client.
	pub fn with_http_client(config: FlowConfig, http_client: ReqwestHttpClient) -> Self {
		Self { http_client, config }
	}

	/// Executes the four stages in order: load key, build assertion, exchange token,
	/// issue request.
	pub fn run(&self) -> Result<FlowReport> {
		let key = self.stage(StageKind::LoadKey, || self.load_key())?;
		let assertion = self.stage(StageKind::BuildAssertion, || self.build_assertion(&key))?;
		let token = self.stage(StageKind::ExchangeToken, || {
			exchange::exchange_assertion(
				&self.http_client,
				&self.config.endpoints.token,
				&assertion,
			)
		})?;
		let resource_url = self.resource_url(&token)?;
		let resource_body = self.stage(StageKind::IssueRequest, || {
			request::fetch_resource(&self.http_client, &resource_url, &token.access_token)
		})?;

		Ok(FlowReport {
			assertion: assertion.compact().to_owned(),
			token_raw_body: token.raw_body,
			access_token: token.access_token,
			resource_url,
			resource_body,
		})
	}

	fn load_key(&self) -> Result<SigningKey> {
		let store = KeyStore::open(
			&self.config.key_store.path,
			self.config.key_store.password.clone(),
		)?;

		Ok(store.signing_key(&self.config.key_store.alias)?)
	}

	fn build_assertion(&self, key: &SigningKey) -> Result<Assertion> {
		let profile = &self.config.assertion;
		let assertion = Assertion::builder(&profile.issuer, &profile.subject, &profile.audience)
			.validity(self.config.validity())
			.include_assertion_id(profile.include_assertion_id)
			.sign(key)?;

		Ok(assertion)
	}

	fn resource_url(&self, token: &TokenResponse) -> Result<Url> {
		let path = &self.config.endpoints.resource_path;

		token.instance_url.join(path).map_err(|source| {
			ConfigError::InvalidResourcePath { path: path.clone(), source }.into()
		})
	}

	fn stage<T>(&self, kind: StageKind, op: impl FnOnce() -> Result<T>) -> Result<T> {
		let _guard = StageSpan::new(kind).entered();

		obs::record_stage_outcome(kind, StageOutcome::Attempt);

		let result = op();

		match &result {
			Ok(_) => obs::record_stage_outcome(kind, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(kind, StageOutcome::Failure),
		}

		result
	}
}
