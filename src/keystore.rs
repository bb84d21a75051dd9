//! Password-protected key store holding private signing keys under named aliases.
//!
//! The store is a read-only JSON document mapping alias names to entries, where each
//! entry declares its signature algorithm and carries the key material as an encrypted
//! PKCS#8 (PBES2) PEM block. One store password decrypts every entry. The document is
//! read under scoped acquisition: opened, parsed, and released on every exit path.

// std
use std::{collections::HashMap, fs};
// crates.io
use pkcs8::DecodePrivateKey;
use rsa::{
	RsaPrivateKey,
	pkcs1v15::SigningKey as RsaSigningKey,
	signature::{SignatureEncoding, Signer},
};
use sha2::Sha256;
// self
use crate::{_prelude::*, secret::StorePassword};

/// Signature algorithms supported by key store entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
	/// RSASSA-PKCS1-v1_5 over SHA-256 (JOSE `RS256`).
	#[serde(rename = "RS256")]
	Rs256,
}
impl SignatureAlgorithm {
	/// Returns the JOSE identifier for the algorithm.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureAlgorithm::Rs256 => "RS256",
		}
	}
}
impl Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Errors raised while opening the store or extracting a key.
#[derive(Debug, ThisError)]
pub enum KeyAccessError {
	/// No file exists at the configured store path.
	#[error("Key store {} does not exist.", .path.display())]
	StoreMissing {
		/// Configured store path.
		path: PathBuf,
	},
	/// The store file exists but could not be read.
	#[error("Failed to read key store {}.", .path.display())]
	StoreRead {
		/// Configured store path.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The store file is not a valid key store document.
	#[error("Failed to parse key store {}.", .path.display())]
	Malformed {
		/// Configured store path.
		path: PathBuf,
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// No entry exists under the requested alias.
	#[error("Key store has no entry under alias `{alias}`.")]
	AliasNotFound {
		/// Requested alias.
		alias: String,
	},
	/// Entry decryption failed; the password is wrong or the entry is corrupt.
	#[error("Failed to decrypt key store entry `{alias}`.")]
	Decrypt {
		/// Alias of the entry that failed to decrypt.
		alias: String,
		/// Underlying PKCS#8 failure.
		#[source]
		source: pkcs8::Error,
	},
}

/// On-disk store entry: algorithm identifier plus encrypted PKCS#8 PEM key material.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyStoreEntry {
	/// Signature algorithm the key is provisioned for.
	pub algorithm: SignatureAlgorithm,
	/// Encrypted PKCS#8 private key in PEM form.
	pub encrypted_pem: String,
}
impl Debug for KeyStoreEntry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeyStoreEntry")
			.field("algorithm", &self.algorithm)
			.field("encrypted_pem", &"<redacted>")
			.finish()
	}
}

#[derive(Serialize, Deserialize)]
struct KeyStoreDocument {
	keys: HashMap<String, KeyStoreEntry>,
}

/// Parsed key store retaining the password for per-alias decryption.
pub struct KeyStore {
	path: PathBuf,
	password: StorePassword,
	entries: HashMap<String, KeyStoreEntry>,
}
impl KeyStore {
	/// Opens the store at the provided path, reading and parsing it eagerly.
	pub fn open(
		path: impl Into<PathBuf>,
		password: StorePassword,
	) -> Result<Self, KeyAccessError> {
		let path = path.into();

		if !path.exists() {
			return Err(KeyAccessError::StoreMissing { path });
		}

		let bytes = fs::read(&path)
			.map_err(|source| KeyAccessError::StoreRead { path: path.clone(), source })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let document: KeyStoreDocument = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| KeyAccessError::Malformed { path: path.clone(), source })?;

		Ok(Self { path, password, entries: document.keys })
	}

	/// Returns the path the store was opened from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Iterates over the aliases present in the store.
	pub fn aliases(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Decrypts the aliased entry and returns it as a ready-to-use [`SigningKey`].
	pub fn signing_key(&self, alias: &str) -> Result<SigningKey, KeyAccessError> {
		let entry = self
			.entries
			.get(alias)
			.ok_or_else(|| KeyAccessError::AliasNotFound { alias: alias.to_owned() })?;
		let private_key = RsaPrivateKey::from_pkcs8_encrypted_pem(
			&entry.encrypted_pem,
			self.password.expose().as_bytes(),
		)
		.map_err(|source| KeyAccessError::Decrypt { alias: alias.to_owned(), source })?;

		Ok(SigningKey::new(entry.algorithm, private_key))
	}
}
impl Debug for KeyStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeyStore")
			.field("path", &self.path)
			.field("aliases", &self.entries.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Private signing key plus its algorithm identifier.
///
/// The key is never serialized and never logged; it exists to sign exactly one
/// assertion per flow run and is dropped afterwards.
pub struct SigningKey {
	algorithm: SignatureAlgorithm,
	inner: RsaSigningKey<Sha256>,
}
impl SigningKey {
	pub(crate) fn new(algorithm: SignatureAlgorithm, private_key: RsaPrivateKey) -> Self {
		Self { algorithm, inner: RsaSigningKey::new(private_key) }
	}

	/// Wraps an unencrypted PKCS#8 PEM private key.
	///
	/// Provisioning paths that keep key material outside a store (CI fixtures, ad-hoc
	/// scripts) can construct the key directly; the store remains the production path.
	pub fn from_pkcs8_pem(pem: &str) -> Result<Self, pkcs8::Error> {
		let private_key = RsaPrivateKey::from_pkcs8_pem(pem)?;

		Ok(Self::new(SignatureAlgorithm::Rs256, private_key))
	}

	/// Returns the algorithm the key is provisioned for.
	pub fn algorithm(&self) -> SignatureAlgorithm {
		self.algorithm
	}

	/// Signs the provided message bytes with the key's algorithm.
	pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, rsa::signature::Error> {
		Ok(self.inner.try_sign(message)?.to_vec())
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningKey")
			.field("algorithm", &self.algorithm)
			.field("key", &"<redacted>")
			.finish()
	}
}
