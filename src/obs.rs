//! Optional observability helpers for handshake, refresh, and dispatch flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `xero_broker.flow` with the `flow` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `xero_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow`, `stage`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// First handshake leg (request token or authorize URL).
	BeginAuth,
	/// Callback leg exchanging the verifier or code.
	CompleteAuth,
	/// Silent access-token renewal.
	Refresh,
	/// Business request through the dispatcher.
	Dispatch,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::BeginAuth => "begin_auth",
			FlowKind::CompleteAuth => "complete_auth",
			FlowKind::Refresh => "refresh",
			FlowKind::Dispatch => "dispatch",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `f` inside a flow span, recording the attempt and its outcome.
pub(crate) fn observe<T, F>(kind: FlowKind, stage: &'static str, f: F) -> Result<T>
where
	F: FnOnce() -> Result<T>,
{
	let _guard = FlowSpan::new(kind, stage).entered();

	record_flow_outcome(kind, stage, FlowOutcome::Attempt);

	let result = f();

	match &result {
		Ok(_) => record_flow_outcome(kind, stage, FlowOutcome::Success),
		Err(_) => record_flow_outcome(kind, stage, FlowOutcome::Failure),
	}

	result
}
