//! Signed, time-bounded bearer assertions for the JWT bearer grant.
//!
//! An assertion is three URL-safe unpadded base64 segments joined by `.`: the encoded
//! header, the encoded claim set, and the signature computed over exactly
//! `encoded_header ++ "." ++ encoded_claims`. Header and claims are explicit serde
//! records serialized to compact JSON; there is no template substitution anywhere.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
// self
use crate::{
	_prelude::*,
	keystore::{SignatureAlgorithm, SigningKey},
};

/// Separator between the header, claims, and signature segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Validity window applied when the builder does not override it.
const DEFAULT_VALIDITY: Duration = Duration::seconds(300);
/// Length of the generated unique assertion identifier.
const ASSERTION_ID_LEN: usize = 22;

/// Errors raised while serializing or signing an assertion.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Header or claim set could not be serialized to JSON.
	#[error("Failed to serialize the assertion {segment} segment.")]
	Serialize {
		/// Segment label (`header` or `claims`).
		segment: &'static str,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The underlying cryptographic operation failed.
	#[error("Failed to sign the assertion with the loaded key.")]
	Sign {
		/// Underlying signature failure.
		#[source]
		source: rsa::signature::Error,
	},
}

/// Header segment declaring the signature algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionHeader {
	/// Algorithm identifier, e.g. `RS256`.
	pub alg: SignatureAlgorithm,
}

/// Claim set asserting who requests access and on whose behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issuer, the OAuth client identifier the provider knows the caller by.
	pub iss: String,
	/// Subject the access token is requested for.
	pub sub: String,
	/// Audience, the identity provider expected to accept the assertion.
	pub aud: String,
	/// Expiry as a Unix timestamp in seconds.
	pub exp: i64,
	/// Unique assertion identifier; omitted unless the builder enables it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub jti: Option<String>,
}

/// Immutable signed assertion in compact three-segment form.
///
/// An assertion must never be exchanged after its embedded expiry: the pipeline builds
/// exactly one per exchange attempt, and [`is_expired_at`](Assertion::is_expired_at)
/// exposes the check for callers driving the stages manually.
#[derive(Clone)]
pub struct Assertion {
	compact: String,
	header: AssertionHeader,
	claims: AssertionClaims,
	expires_at: OffsetDateTime,
}
impl Assertion {
	/// Starts a builder for the provided issuer/subject/audience triple.
	pub fn builder(
		issuer: impl Into<String>,
		subject: impl Into<String>,
		audience: impl Into<String>,
	) -> AssertionBuilder {
		AssertionBuilder {
			issuer: issuer.into(),
			subject: subject.into(),
			audience: audience.into(),
			validity: DEFAULT_VALIDITY,
			include_assertion_id: false,
		}
	}

	/// Returns the compact `header.claims.signature` form sent to the token endpoint.
	pub fn compact(&self) -> &str {
		&self.compact
	}

	/// Returns the header the assertion was signed under.
	pub fn header(&self) -> &AssertionHeader {
		&self.header
	}

	/// Returns the embedded claim set.
	pub fn claims(&self) -> &AssertionClaims {
		&self.claims
	}

	/// Returns the instant the assertion stops being acceptable.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Returns true once the embedded expiry has passed at `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}
impl Debug for Assertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Assertion")
			.field("header", &self.header)
			.field("claims", &self.claims)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder producing a signed [`Assertion`] from the three claim inputs.
#[derive(Clone, Debug)]
pub struct AssertionBuilder {
	issuer: String,
	subject: String,
	audience: String,
	validity: Duration,
	include_assertion_id: bool,
}
impl AssertionBuilder {
	/// Overrides the validity window (defaults to 300 seconds).
	pub fn validity(mut self, window: Duration) -> Self {
		self.validity = window;

		self
	}

	/// Includes a generated unique assertion identifier (`jti`) in the claim set.
	///
	/// Off by default; some providers ignore the claim entirely, others require it for
	/// replay detection.
	pub fn include_assertion_id(mut self, include: bool) -> Self {
		self.include_assertion_id = include;

		self
	}

	/// Signs the assertion with expiry computed from the current wall clock.
	pub fn sign(self, key: &SigningKey) -> Result<Assertion, SigningError> {
		let now = OffsetDateTime::now_utc();

		self.sign_at(key, now)
	}

	/// Signs the assertion with expiry computed from an explicit build instant.
	///
	/// The expiry is `now + validity` with no clock skew compensation; it is computed
	/// once here and never refreshed.
	pub fn sign_at(self, key: &SigningKey, now: OffsetDateTime) -> Result<Assertion, SigningError> {
		let expires_at = now + self.validity;
		let header = AssertionHeader { alg: key.algorithm() };
		let claims = AssertionClaims {
			iss: self.issuer,
			sub: self.subject,
			aud: self.audience,
			exp: expires_at.unix_timestamp(),
			jti: self.include_assertion_id.then(new_assertion_id),
		};
		let encoded_header = encode_segment(&header, "header")?;
		let encoded_claims = encode_segment(&claims, "claims")?;
		let signing_input = format!("{encoded_header}{SEGMENT_SEPARATOR}{encoded_claims}");
		let signature =
			key.sign(signing_input.as_bytes()).map_err(|source| SigningError::Sign { source })?;
		let compact = format!(
			"{signing_input}{SEGMENT_SEPARATOR}{}",
			URL_SAFE_NO_PAD.encode(signature)
		);

		Ok(Assertion { compact, header, claims, expires_at })
	}
}

fn encode_segment<T>(value: &T, segment: &'static str) -> Result<String, SigningError>
where
	T: Serialize,
{
	let json = serde_json::to_string(value)
		.map_err(|source| SigningError::Serialize { segment, source })?;

	Ok(URL_SAFE_NO_PAD.encode(json))
}

fn new_assertion_id() -> String {
	thread_rng().sample_iter(&Alphanumeric).take(ASSERTION_ID_LEN).map(char::from).collect()
}
