//! Redacting wrappers for the secrets the flow handles.

// self
use crate::_prelude::*;

/// Redacted access token wrapper keeping the issued credential out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Redacted key store password.
///
/// The password outlives a single decryption because the store keeps it for later
/// [`signing_key`](crate::keystore::KeyStore::signing_key) calls, so the wrapper guards
/// every formatting path the same way [`TokenSecret`] does.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePassword(String);
impl StorePassword {
	/// Wraps a new store password.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner password. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for StorePassword {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("StorePassword").field(&"<redacted>").finish()
	}
}
impl Display for StorePassword {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn password_formatters_redact() {
		let password = StorePassword::new("hunter2");

		assert_eq!(format!("{password:?}"), "StorePassword(\"<redacted>\")");
		assert_eq!(format!("{password}"), "<redacted>");
		assert_eq!(password.expose(), "hunter2");
	}

	#[test]
	fn serde_round_trip_preserves_value() {
		let secret = TokenSecret::new("AT1");
		let json = serde_json::to_string(&secret).expect("Token secret should serialize.");

		assert_eq!(json, "\"AT1\"");

		let back: TokenSecret =
			serde_json::from_str(&json).expect("Token secret should deserialize.");

		assert_eq!(back, secret);
	}
}
