//! # Document Gate
//!
//! One entry point decides whether a candidate document may be written.
//!
//! ## Pipeline
//!
//! ```text
//! candidate, previous, actor
//!   │
//!   ├─ access control      deletion gate, then priority-ordered states
//!   ├─ deletion            an authorised deletion is accepted here
//!   ├─ kind gate           "Cannot change document type." / "Invalid document type."
//!   ├─ schema              per-kind rules, first failure wins
//!   └─ revision            telemetry receivers may only be added
//! ```
//!
//! Each stage short-circuits with a [`Rejection`]. The validator holds no
//! mutable state and performs no I/O; one instance may be shared across
//! threads.

use serde::Serialize;
use serde_json::Value;

use habitat_access::{AccessPolicy, AccessState, Mutation};
use habitat_core::document::{is_deletion, KIND_FIELD};
use habitat_core::{ActorContext, DocumentKind, Rejection};
use habitat_schema::SchemaRegistry;

use crate::config::ValidatorConfig;
use crate::revision::check_revision;

/// A write the validator let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accepted {
    /// Kind of the accepted document. `None` only for a deletion stub that
    /// carries no recognised `type`.
    pub kind: Option<DocumentKind>,
    /// The access state that permitted the write.
    pub state: AccessState,
    /// Whether the write was a deletion.
    pub deletion: bool,
}

/// Access policy plus the schema for every document kind.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: AccessPolicy,
    registry: SchemaRegistry,
}

impl Validator {
    /// A validator trusting the identities named in `config`.
    pub fn new(config: &ValidatorConfig) -> Self {
        Self::with_policy(config.policy())
    }

    /// A validator using an explicit access policy.
    pub fn with_policy(policy: AccessPolicy) -> Self {
        Self {
            policy,
            registry: SchemaRegistry::new(),
        }
    }

    /// The access policy in force.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decide whether `actor` may write `candidate` over `previous`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when the actor may not perform the mutation at all.
    /// - `Forbidden` when the actor's state forbids this particular change,
    ///   the kind is missing, unknown or changed, a schema rule fails, or a
    ///   telemetry revision edits or drops a receiver.
    pub fn validate(
        &self,
        candidate: &Value,
        previous: Option<&Value>,
        actor: &ActorContext,
    ) -> Result<Accepted, Rejection> {
        let result = self.evaluate(candidate, previous, actor);
        match &result {
            Ok(accepted) => tracing::debug!(
                identity = %actor.identity,
                kind = ?accepted.kind,
                state = %accepted.state,
                deletion = accepted.deletion,
                "write accepted"
            ),
            Err(rejection) => tracing::info!(
                identity = %actor.identity,
                kind = %rejection.kind,
                reason = %rejection.message,
                "write rejected"
            ),
        }
        result
    }

    fn evaluate(
        &self,
        candidate: &Value,
        previous: Option<&Value>,
        actor: &ActorContext,
    ) -> Result<Accepted, Rejection> {
        let mutation = Mutation::new(candidate, previous);
        let state = self.policy.authorize(actor, &mutation)?;

        if mutation.is_deletion() {
            return Ok(Accepted {
                kind: mutation.candidate_kind().or(mutation.previous_kind()),
                state,
                deletion: true,
            });
        }

        let live_previous = previous.filter(|doc| !is_deletion(doc));
        let kind = check_kind(candidate, live_previous)?;
        self.registry.get(kind).validate(candidate)?;
        check_revision(kind, candidate, live_previous, state)?;

        Ok(Accepted {
            kind: Some(kind),
            state,
            deletion: false,
        })
    }
}

/// Store-wide kind gate: the `type` of a live document never changes, and
/// must name a known kind.
fn check_kind(candidate: &Value, previous: Option<&Value>) -> Result<DocumentKind, Rejection> {
    if let Some(previous) = previous {
        if candidate.get(KIND_FIELD) != previous.get(KIND_FIELD) {
            return Err(Rejection::forbidden("Cannot change document type."));
        }
    }
    DocumentKind::of(candidate).ok_or_else(|| Rejection::forbidden("Invalid document type."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitat_core::RejectionKind;
    use serde_json::json;

    fn admin() -> ActorContext {
        ActorContext::new("root").with_role("_admin")
    }

    fn service() -> ActorContext {
        ActorContext::new("habitat")
    }

    fn listener_info() -> Value {
        json!({
            "type": "listener_info",
            "time_created": 100,
            "time_uploaded": 101,
            "data": {"callsign": "M0RND"}
        })
    }

    // ── Kind gate ────────────────────────────────────────────────────

    #[test]
    fn test_missing_type_is_invalid() {
        let err = Validator::default()
            .validate(&json!({"data": {}}), None, &service())
            .unwrap_err();
        assert_eq!(err.kind, RejectionKind::Forbidden);
        assert_eq!(err.message, "Invalid document type.");
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let err = Validator::default()
            .validate(&json!({"type": "listener_telem"}), None, &service())
            .unwrap_err();
        assert_eq!(err.message, "Invalid document type.");
    }

    #[test]
    fn test_type_change_rejected() {
        let previous = json!({"type": "payload_telemetry"});
        let err = Validator::default()
            .validate(&listener_info(), Some(&previous), &service())
            .unwrap_err();
        assert_eq!(err.kind, RejectionKind::Forbidden);
        assert_eq!(err.message, "Cannot change document type.");
    }

    #[test]
    fn test_type_change_checked_before_validity() {
        let previous = json!({"type": "listener_info"});
        let err = Validator::default()
            .validate(&json!({"type": "bogus"}), Some(&previous), &service())
            .unwrap_err();
        assert_eq!(err.message, "Cannot change document type.");
    }

    #[test]
    fn test_recreating_over_deletion_may_change_type() {
        let tombstone = json!({"_deleted": true});
        let accepted = Validator::default()
            .validate(&listener_info(), Some(&tombstone), &service())
            .unwrap();
        assert_eq!(accepted.kind, Some(DocumentKind::ListenerInfo));
    }

    // ── Pipeline order ───────────────────────────────────────────────

    #[test]
    fn test_access_runs_before_kind_gate() {
        let err = Validator::default()
            .validate(&json!({"type": "bogus"}), None, &ActorContext::new("stranger"))
            .unwrap_err();
        assert_eq!(err.kind, RejectionKind::Unauthorized);
    }

    #[test]
    fn test_admin_deletion_skips_schema() {
        let stub = json!({"_id": "x", "_deleted": true});
        let previous = listener_info();
        let accepted = Validator::default()
            .validate(&stub, Some(&previous), &admin())
            .unwrap();
        assert!(accepted.deletion);
        assert_eq!(accepted.kind, Some(DocumentKind::ListenerInfo));
        assert_eq!(accepted.state, AccessState::Administrator);
    }

    #[test]
    fn test_schema_runs_last() {
        let mut doc = listener_info();
        doc["time_uploaded"] = json!(50);
        let err = Validator::default().validate(&doc, None, &service()).unwrap_err();
        assert_eq!(err.kind, RejectionKind::Forbidden);
        assert_eq!(err.message, "Document cannot be created after it was uploaded.");
    }

    #[test]
    fn test_payload_telemetry_shape_enforced() {
        let validator = Validator::default();
        for doc in [
            json!({"type": "payload_telemetry"}),
            json!({"type": "payload_telemetry", "data": {}, "receivers": {}}),
            json!({"type": "payload_telemetry", "data": {}, "receivers": {"A": {"time_created": "soon"}}}),
        ] {
            let err = validator.validate(&doc, None, &service()).unwrap_err();
            assert_eq!(err.kind, RejectionKind::Forbidden);
        }

        let doc = json!({"type": "payload_telemetry", "data": {}, "receivers": {"A": {"time_created": 1}}});
        let accepted = validator.validate(&doc, None, &service()).unwrap();
        assert_eq!(accepted.kind, Some(DocumentKind::PayloadTelemetry));
        assert_eq!(accepted.state, AccessState::ServiceIdentity);
    }

    #[test]
    fn test_telemetry_revision_keeps_existing_receivers() {
        let previous = json!({
            "type": "payload_telemetry",
            "data": {},
            "receivers": {"A": {"time_created": 1}, "B": {"time_created": 2}}
        });
        let rewrite = json!({
            "type": "payload_telemetry",
            "data": {},
            "receivers": {"A": {"time_created": 999}}
        });
        let err = Validator::default()
            .validate(&rewrite, Some(&previous), &service())
            .unwrap_err();
        assert_eq!(err.message, "May not edit or remove receivers.");

        let mut extended = previous.clone();
        extended["receivers"]["C"] = json!({"time_created": 3});
        assert!(Validator::default()
            .validate(&extended, Some(&previous), &service())
            .is_ok());
        assert!(Validator::default()
            .validate(&rewrite, Some(&previous), &admin())
            .is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = ValidatorConfig {
            service_identity: "ingest".to_string(),
            admin_role: "ops".to_string(),
        };
        let validator = Validator::new(&config);
        assert!(validator
            .validate(&listener_info(), None, &ActorContext::new("ingest"))
            .is_ok());
        let err = validator
            .validate(&listener_info(), None, &service())
            .unwrap_err();
        assert_eq!(err.kind, RejectionKind::Unauthorized);
        assert!(validator
            .validate(&json!({"type": "config"}), None, &ActorContext::new("x").with_role("ops"))
            .is_ok());
    }
}
