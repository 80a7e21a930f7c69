//! # Estimate Subcommand
//!
//! Prints the consensus receive time for one telemetry sentence. The input
//! is either a `payload_telemetry` document (times taken from
//! `receivers.*.time_created`) or a plain `{"receiver": time}` map.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use habitat_views::{estimate_detailed, Estimate, ReceiverReports};

/// Arguments for the `habitat estimate` subcommand.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Telemetry document or receiver-time map (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the mean, standard deviation and outlier counts as JSON.
    #[arg(long)]
    pub detail: bool,
}

/// Receiver reports from either accepted input shape.
pub fn reports_from(input: &Value) -> Result<ReceiverReports> {
    if input.get("receivers").is_some() {
        return ReceiverReports::from_telemetry(input)
            .context("cannot read receivers from telemetry document");
    }
    serde_json::from_value(input.clone()).context("expected a map of receiver to numeric time")
}

/// Compute the estimate for `input`.
pub fn estimate_input(input: &Value) -> Result<Estimate> {
    let reports = reports_from(input)?;
    estimate_detailed(&reports).context("cannot estimate receive time")
}

/// Execute the estimate subcommand. Always returns exit code 0 on success.
pub fn run_estimate(args: &EstimateArgs) -> Result<u8> {
    let input = crate::read_json(&args.file)?;
    let estimate = estimate_input(&input)?;

    if estimate.discarded > 0 {
        tracing::info!(
            kept = estimate.kept,
            discarded = estimate.discarded,
            "discarded outlying receiver times"
        );
    }

    if args.detail {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("{}", estimate.time);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_map_input() {
        let e = estimate_input(&json!({"a": 0, "b": 0, "c": 0, "d": 1000})).unwrap();
        assert_eq!(e.time, 0.0);
        assert_eq!(e.discarded, 1);
    }

    #[test]
    fn telemetry_document_input() {
        let doc = json!({
            "type": "payload_telemetry",
            "receivers": {"A": {"time_created": 100}, "B": {"time_created": 102}}
        });
        assert_eq!(estimate_input(&doc).unwrap().time, 101.0);
    }

    #[test]
    fn empty_map_is_an_error() {
        assert!(estimate_input(&json!({})).is_err());
    }

    #[test]
    fn non_numeric_times_are_an_error() {
        assert!(estimate_input(&json!({"a": "soon"})).is_err());
    }

    #[test]
    fn run_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.json");
        std::fs::write(&path, r#"{"a": 100}"#).unwrap();
        let args = EstimateArgs {
            file: path,
            detail: true,
        };
        assert_eq!(run_estimate(&args).unwrap(), 0);
    }
}
