// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::_prelude::*;

/// Span wrapper used by acquisition flows.
#[derive(Clone, Debug)]
pub struct AcquireSpan {
	span: Span,
}
impl AcquireSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		let span = tracing::info_span!(
			"oauth_session_bridge.acquire",
			stage,
			path = tracing::field::Empty
		);

		Self { span }
	}

	/// Records the path the acquisition resolved to.
	pub fn record_path(&self, path: crate::obs::AcquirePath) {
		self.span.record("path", path.as_str());
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn in_span<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}
