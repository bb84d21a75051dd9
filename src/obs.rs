//! Optional observability helpers for the pipeline stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `jwt_bearer_flow.stage` with a
//!   `stage` field naming the pipeline stage being executed.
//! - Enable `metrics` to increment the `jwt_bearer_flow_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// Key material loading from the protected store.
	LoadKey,
	/// Assertion construction and signing.
	BuildAssertion,
	/// Assertion-for-token exchange at the token endpoint.
	ExchangeToken,
	/// Authenticated resource request.
	IssueRequest,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::LoadKey => "load_key",
			StageKind::BuildAssertion => "build_assertion",
			StageKind::ExchangeToken => "exchange_token",
			StageKind::IssueRequest => "issue_request",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(StageKind::LoadKey.as_str(), "load_key");
		assert_eq!(StageKind::IssueRequest.to_string(), "issue_request");
		assert_eq!(StageOutcome::Failure.as_str(), "failure");
	}
}
