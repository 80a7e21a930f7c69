//! # habitat-validator: The Document Gate
//!
//! Ties access control, the store-wide kind gate, and the per-kind schemas
//! into [`Validator::validate`], the single decision point for every write.
//!
//! ```text
//! habitat-core ──┬── habitat-schema ──┐
//!                └── habitat-access ──┴── habitat-validator
//! ```
//!
//! [`ValidatorConfig`] names the service identity and administrator role;
//! it loads from the environment or a YAML file.

pub mod config;
pub mod revision;
pub mod validator;

pub use config::{ConfigError, ValidatorConfig, ADMIN_ROLE_VAR, SERVICE_IDENTITY_VAR};
pub use revision::check_revision;
pub use validator::{Accepted, Validator};

pub use habitat_access::AccessState;
pub use habitat_core::{ActorContext, Rejection, RejectionKind};
