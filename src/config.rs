//! Externalized flow configuration replacing in-source constants.
//!
//! Every input the original one-shot program hardcoded (store path, store password,
//! key alias, claim values, endpoints) lives in one serde document, loadable from a
//! JSON file or constructed in code. No global mutable state is involved.

// std
use std::fs;
// self
use crate::{_prelude::*, error::ConfigError, secret::StorePassword};

fn default_validity_secs() -> i64 {
	300
}

/// Key store locator: where the store lives, how to open it, which entry to use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyStoreConfig {
	/// Path of the key store document.
	pub path: PathBuf,
	/// Store password used to decrypt entries.
	pub password: StorePassword,
	/// Alias of the signing key entry.
	pub alias: String,
}

/// Assertion profile: the three claim inputs plus validity policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssertionProfile {
	/// Issuer claim, the OAuth client identifier.
	pub issuer: String,
	/// Subject claim, the user the token is requested for.
	pub subject: String,
	/// Audience claim, the identity provider's login host.
	pub audience: String,
	/// Validity window in seconds (defaults to 300).
	#[serde(default = "default_validity_secs")]
	pub validity_secs: i64,
	/// Whether to embed a unique assertion identifier (`jti`) claim.
	#[serde(default)]
	pub include_assertion_id: bool,
}

/// Endpoint section: where to exchange the assertion and what to fetch afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
	/// Absolute token endpoint URL.
	pub token: Url,
	/// Resource path resolved against the instance URL the exchange returns.
	/// Use an absolute-path form such as `/services/data/v37.0/sobjects/Account/`.
	pub resource_path: String,
}

/// Complete flow configuration document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowConfig {
	/// Key store locator.
	pub key_store: KeyStoreConfig,
	/// Assertion profile.
	pub assertion: AssertionProfile,
	/// Endpoint section.
	pub endpoints: EndpointConfig,
}
impl FlowConfig {
	/// Reads a configuration document from a JSON file.
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let path = path.into();
		let bytes = fs::read(&path)
			.map_err(|source| ConfigError::FileRead { path: path.clone(), source })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::FileParse { path, source })
	}

	/// Returns the assertion validity window as a [`Duration`].
	pub fn validity(&self) -> Duration {
		Duration::seconds(self.assertion.validity_secs)
	}
}
