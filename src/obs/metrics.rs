// self
use crate::obs::{FlowKind, FlowOutcome};

/// Bumps `xero_broker_flow_total{flow, stage, outcome}` when the `metrics` feature is on.
///
/// `stage` is the call site: `begin_auth`, `complete_auth`, `refresh_access`, or the
/// dispatcher verb (`find`, `create`, `update`, `remove`).
pub fn record_flow_outcome(kind: FlowKind, stage: &'static str, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"xero_broker_flow_total",
			"flow" => kind.as_str(),
			"stage" => stage,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, stage, outcome);
	}
}
