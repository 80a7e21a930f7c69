//! # Consensus Receive Time
//!
//! Several listeners usually receive the same telemetry sentence and each
//! reports when it did. Clocks disagree, and a listener with a badly wrong
//! clock should not drag the result. The estimate is:
//!
//! 1. population mean μ and population standard deviation σ of all times;
//! 2. keep the reports with |x − μ| ≤ σ;
//! 3. the mean of the kept reports, or μ if none were kept.
//!
//! This is one pass, not iterated to convergence. A single report has
//! σ = 0 and is its own estimate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors building or estimating over receiver reports.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    /// No reports to estimate from.
    #[error("cannot estimate a receive time from zero reports")]
    NoReports,

    /// The telemetry document has no `receivers` object.
    #[error("telemetry document has no receivers object")]
    MissingReceivers,

    /// A receiver entry lacks a numeric `time_created`.
    #[error("receiver {receiver:?} has no numeric time_created")]
    InvalidReceiverTime {
        /// The receiver's callsign.
        receiver: String,
    },
}

/// Receive times for one telemetry sentence, keyed by receiver callsign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiverReports(BTreeMap<String, f64>);

impl ReceiverReports {
    /// An empty report set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) one receiver's time.
    pub fn insert(&mut self, receiver: impl Into<String>, time: f64) {
        self.0.insert(receiver.into(), time);
    }

    /// Number of receivers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no receivers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate receivers and their times in callsign order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Extract `receivers.<callsign>.time_created` from a
    /// `payload_telemetry` document.
    ///
    /// # Errors
    ///
    /// [`ConsensusError::MissingReceivers`] if `receivers` is not an
    /// object; [`ConsensusError::InvalidReceiverTime`] if an entry has no
    /// numeric `time_created`.
    pub fn from_telemetry(document: &Value) -> Result<Self, ConsensusError> {
        let receivers = document
            .get("receivers")
            .and_then(Value::as_object)
            .ok_or(ConsensusError::MissingReceivers)?;
        let mut reports = Self::new();
        for (receiver, info) in receivers {
            let time = info
                .get("time_created")
                .and_then(Value::as_f64)
                .ok_or_else(|| ConsensusError::InvalidReceiverTime {
                    receiver: receiver.clone(),
                })?;
            reports.insert(receiver.as_str(), time);
        }
        Ok(reports)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ReceiverReports {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The estimate together with the statistics it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated received time.
    pub time: f64,
    /// Mean of all reports.
    pub mean: f64,
    /// Population standard deviation of all reports.
    pub std_dev: f64,
    /// Reports within one standard deviation of the mean.
    pub kept: usize,
    /// Reports rejected as outliers.
    pub discarded: usize,
}

/// Estimate the received time of one sentence.
///
/// # Errors
///
/// [`ConsensusError::NoReports`] when `reports` is empty.
pub fn estimate(reports: &ReceiverReports) -> Result<f64, ConsensusError> {
    estimate_detailed(reports).map(|e| e.time)
}

/// As [`estimate`], returning the intermediate statistics.
///
/// # Errors
///
/// [`ConsensusError::NoReports`] when `reports` is empty.
#[allow(clippy::cast_precision_loss)]
pub fn estimate_detailed(reports: &ReceiverReports) -> Result<Estimate, ConsensusError> {
    if reports.is_empty() {
        return Err(ConsensusError::NoReports);
    }
    let n = reports.len() as f64;
    let mean = reports.iter().map(|(_, t)| t).sum::<f64>() / n;
    let variance = reports
        .iter()
        .map(|(_, t)| (t - mean) * (t - mean))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    // NaN σ keeps nothing, which falls through to the plain mean.
    let kept: Vec<f64> = reports
        .iter()
        .map(|(_, t)| t)
        .filter(|t| (t - mean).abs() <= std_dev)
        .collect();

    let time = if kept.is_empty() {
        tracing::warn!(
            reports = reports.len(),
            mean,
            std_dev,
            "no report within one standard deviation; using unfiltered mean"
        );
        mean
    } else {
        kept.iter().sum::<f64>() / kept.len() as f64
    };

    Ok(Estimate {
        time,
        mean,
        std_dev,
        kept: kept.len(),
        discarded: reports.len() - kept.len(),
    })
}
