//! OAuth 2.0 JWT bearer grant client—load a private signing key from a password-protected
//! store, mint a signed time-bounded assertion, exchange it at a token endpoint for an
//! access token, and issue one authenticated request against the returned API base.
//!
//! The crate exposes the four stages individually ([`keystore`], [`assertion`],
//! [`exchange`], [`request`]) and as a strict fail-fast pipeline ([`flow`]). There is no
//! retry, no caching, and no refresh handling: one assertion is built per exchange
//! attempt and any stage failure terminates the run.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod assertion;
pub mod config;
pub mod error;
#[cfg(feature = "reqwest")] pub mod exchange;
#[cfg(feature = "reqwest")] pub mod flow;
#[cfg(feature = "reqwest")] pub mod http;
pub mod keystore;
pub mod obs;
#[cfg(feature = "reqwest")] pub mod request;
pub mod secret;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		path::{Path, PathBuf},
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as ReqwestClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
