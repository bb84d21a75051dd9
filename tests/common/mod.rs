//! Shared fixtures for the integration suites: a fixed RSA-2048 test key and a
//! throwaway key store writer.

#![allow(dead_code)]

// std
use std::{
	env, fs,
	path::PathBuf,
	process,
	sync::atomic::{AtomicU64, Ordering},
};
// crates.io
use pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
// self
use jwt_bearer_flow::keystore::SigningKey;

/// Unencrypted PKCS#8 PEM of the fixed test key.
pub const SIGNING_KEY_PEM: &str =
	include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/signing_key.pkcs8.pem"));

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn private_key() -> RsaPrivateKey {
	RsaPrivateKey::from_pkcs8_pem(SIGNING_KEY_PEM).expect("Embedded test key should parse.")
}

pub fn public_key() -> RsaPublicKey {
	private_key().to_public_key()
}

pub fn signing_key() -> SigningKey {
	SigningKey::from_pkcs8_pem(SIGNING_KEY_PEM).expect("Embedded test key should parse.")
}

/// Returns a unique path under the system temp directory.
pub fn temp_path(tag: &str) -> PathBuf {
	let unique = format!(
		"jwt_bearer_flow_{tag}_{}_{}.json",
		process::id(),
		TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
	);

	env::temp_dir().join(unique)
}

/// Writes a single-alias key store encrypted under `password` and returns its path.
pub fn write_key_store(tag: &str, alias: &str, password: &str) -> PathBuf {
	let pem = private_key()
		.to_pkcs8_encrypted_pem(&mut rand::thread_rng(), password.as_bytes(), LineEnding::LF)
		.expect("Test key should encrypt.");
	let document = serde_json::json!({
		"keys": {
			alias: {
				"algorithm": "RS256",
				"encrypted_pem": pem.to_string(),
			},
		},
	});
	let path = temp_path(tag);

	fs::write(&path, serde_json::to_vec_pretty(&document).expect("Store should serialize."))
		.expect("Store fixture should write.");

	path
}
