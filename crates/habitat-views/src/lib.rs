//! # habitat-views: Derived Read-Side Values
//!
//! Values computed from stored documents rather than checked on write:
//!
//! - [`consensus`]: the consensus receive time of a telemetry sentence
//!   from its receivers' reported times.
//! - [`payload_config`]: which flight (or sandbox) configuration applies to
//!   a payload at a given moment.
//! - [`telemetry`]: parsed telemetry rows keyed by flight, payload and
//!   consensus time.
//!
//! Nothing here mutates documents or consults the actor.

pub mod consensus;
pub mod payload_config;
pub mod telemetry;

pub use consensus::{estimate, estimate_detailed, ConsensusError, Estimate, ReceiverReports};
pub use payload_config::{config_keys, ConfigEpoch, PayloadConfigIndex, PayloadConfigRow};
pub use telemetry::{telemetry_row, TelemetryIndex, TelemetryRow};
