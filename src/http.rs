//! Transport primitives shared by the token exchange and resource request stages.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around the blocking [`ReqwestClient`] so shared HTTP behavior lives in
/// one place. Token requests should not follow redirects, matching OAuth 2.0 guidance
/// that token endpoints return results directly instead of delegating to another URI;
/// configure any custom [`ReqwestClient`] accordingly before wrapping it.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the default client used by the flow: rustls TLS, redirects disabled,
	/// transport-default timeouts.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing blocking [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_client_builds() {
		ReqwestHttpClient::new().expect("Default HTTP client should build.");
	}
}
