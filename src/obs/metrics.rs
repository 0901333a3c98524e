// self
use crate::{
	auth::Platform,
	obs::{CallOutcome, Operation},
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(platform: Platform, operation: Operation, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_sns_call_total",
			"platform" => platform.as_str(),
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (platform, operation, outcome);
	}
}
