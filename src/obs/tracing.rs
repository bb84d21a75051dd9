// self
use crate::{_prelude::*, obs::StageKind};

/// A span builder wrapped around each pipeline stage.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage kind.
	pub fn new(kind: StageKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("jwt_bearer_flow.stage", stage = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;

			Self {}
		}
	}

	/// Enters the span for the duration of the returned guard.
	///
	/// Every stage is synchronous, so holding the guard across the stage body is safe;
	/// there is no `.await` point for it to leak over.
	pub fn entered(self) -> StageSpanGuard {
		#[cfg(feature = "tracing")]
		{
			StageSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			StageSpanGuard {}
		}
	}
}

/// RAII guard returned by [`StageSpan::entered`].
pub struct StageSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}
