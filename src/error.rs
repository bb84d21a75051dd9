//! Flow-level error types shared across the four pipeline stages.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical flow error exposed by public APIs.
///
/// Every variant is terminal for the invocation that raised it: the pipeline never
/// retries a stage and never transitions back to an earlier one.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Key store access failure (missing store, bad password, unknown alias).
	#[error(transparent)]
	KeyAccess(#[from] crate::keystore::KeyAccessError),
	/// Assertion serialization or signing failure.
	#[error(transparent)]
	Signing(#[from] crate::assertion::SigningError),
	/// Token endpoint rejected the exchange or was unreachable.
	#[cfg(feature = "reqwest")]
	#[error(transparent)]
	TokenExchange(#[from] crate::exchange::TokenExchangeError),
	/// Token endpoint answered 2xx with an unusable body.
	#[cfg(feature = "reqwest")]
	#[error(transparent)]
	ResponseParse(#[from] crate::exchange::ResponseParseError),
	/// Resource endpoint rejected the authenticated request or was unreachable.
	#[cfg(feature = "reqwest")]
	#[error(transparent)]
	Request(#[from] crate::request::RequestError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns a stable label naming the pipeline stage the error belongs to.
	///
	/// Fail-fast propagation means the caller sees exactly one error per run; the label
	/// keeps the failing stage visible without unwrapping the variant.
	pub const fn stage(&self) -> &'static str {
		match self {
			Self::KeyAccess(_) => "load_key",
			Self::Signing(_) => "build_assertion",
			#[cfg(feature = "reqwest")]
			Self::TokenExchange(_) | Self::ResponseParse(_) => "exchange_token",
			#[cfg(feature = "reqwest")]
			Self::Request(_) => "issue_request",
			Self::Config(_) => "configuration",
		}
	}
}

/// Configuration and validation failures raised outside the four stages.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {}.", .path.display())]
	FileRead {
		/// Path of the configuration file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not a valid flow configuration document.
	#[error("Failed to parse configuration file {}.", .path.display())]
	FileParse {
		/// Path of the configuration file.
		path: PathBuf,
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Resource path cannot be joined onto the returned instance URL.
	#[error("Resource path {path} cannot be joined onto the instance URL.")]
	InvalidResourcePath {
		/// Configured resource path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
