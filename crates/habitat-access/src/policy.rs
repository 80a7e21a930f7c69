//! # Mutation Access Policy
//!
//! Decides whether an actor may perform a mutation at all, independent of
//! whether the document is well-formed.
//!
//! ## States
//!
//! Evaluated in strict priority order; the first state the actor occupies
//! decides the outcome:
//!
//! ```text
//! Administrator ──▶ permitted (create, modify, delete)
//!       │ no
//!       ▼
//! ServiceIdentity ──▶ permitted, except flight/config kinds (Forbidden)
//!       │ no
//!       ▼
//! NamedEditor ──▶ identical editors set and no other change, else Forbidden
//!       │ no
//!       ▼
//! Outsider ──▶ Unauthorized
//! ```
//!
//! Deletion is rejected as `Unauthorized` for every state except
//! `Administrator`, before any state-specific check.
//!
//! ## Named Editors
//!
//! A flight lists identities allowed limited edits in `editors`. The edit
//! policy beyond the editors list itself has not been defined, so an
//! editor may resubmit the flight unchanged and nothing else. Store
//! metadata (`_id`, `_rev`, and any other `_`-prefixed key) is ignored when
//! comparing revisions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use habitat_core::document::is_deletion;
use habitat_core::{ActorContext, DocumentKind, Identity, Rejection, Role};

/// Identity the backend services authenticate as.
pub const DEFAULT_SERVICE_IDENTITY: &str = "habitat";

/// Role granting administrator rights.
pub const DEFAULT_ADMIN_ROLE: &str = "_admin";

/// Flight field listing named editors.
pub const EDITORS_FIELD: &str = "editors";

// ─── States ──────────────────────────────────────────────────────────

/// Which access state an actor occupies for one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessState {
    /// Holds the administrator role.
    Administrator,
    /// Is the backend service identity.
    ServiceIdentity,
    /// Is listed in the previous flight revision's `editors`.
    NamedEditor,
    /// None of the above.
    Outsider,
}

impl std::fmt::Display for AccessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::ServiceIdentity => "SERVICE_IDENTITY",
            Self::NamedEditor => "NAMED_EDITOR",
            Self::Outsider => "OUTSIDER",
        };
        f.write_str(s)
    }
}

// ─── Mutation ────────────────────────────────────────────────────────

/// One attempted write: the candidate and the revision it replaces.
#[derive(Debug, Clone, Copy)]
pub struct Mutation<'a> {
    /// The submitted document (or deletion stub).
    pub candidate: &'a Value,
    /// The current stored revision, if any.
    pub previous: Option<&'a Value>,
}

impl<'a> Mutation<'a> {
    /// A write of `candidate` over `previous`.
    pub fn new(candidate: &'a Value, previous: Option<&'a Value>) -> Self {
        Self {
            candidate,
            previous,
        }
    }

    /// Whether the candidate is a deletion stub.
    pub fn is_deletion(&self) -> bool {
        is_deletion(self.candidate)
    }

    /// Kind of the candidate, if recognised.
    pub fn candidate_kind(&self) -> Option<DocumentKind> {
        DocumentKind::of(self.candidate)
    }

    /// Kind of the previous revision, if any and recognised.
    pub fn previous_kind(&self) -> Option<DocumentKind> {
        self.previous.and_then(DocumentKind::of)
    }

    /// Whether either revision is of a kind only administrators may write.
    fn touches_admin_only_kind(&self) -> Option<DocumentKind> {
        [self.candidate_kind(), self.previous_kind()]
            .into_iter()
            .flatten()
            .find(DocumentKind::is_admin_only)
    }
}

// ─── Policy ──────────────────────────────────────────────────────────

/// Who counts as administrator and as the service identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    service_identity: Identity,
    admin_role: Role,
}

impl AccessPolicy {
    /// A policy with explicit service identity and administrator role.
    pub fn new(service_identity: impl Into<String>, admin_role: impl Into<String>) -> Self {
        Self {
            service_identity: Identity::new(service_identity),
            admin_role: Role::new(admin_role),
        }
    }

    /// The service identity name.
    pub fn service_identity(&self) -> &Identity {
        &self.service_identity
    }

    /// The administrator role name.
    pub fn admin_role(&self) -> &Role {
        &self.admin_role
    }

    /// Which state `actor` occupies for `mutation`, in priority order.
    pub fn classify(&self, actor: &ActorContext, mutation: &Mutation<'_>) -> AccessState {
        self.standing(actor, mutation).state()
    }

    fn standing<'a>(&self, actor: &ActorContext, mutation: &Mutation<'a>) -> Standing<'a> {
        if actor.has_role(self.admin_role.as_str()) {
            Standing::Administrator
        } else if actor.identity == self.service_identity {
            Standing::ServiceIdentity
        } else if let Some(flight) = mutation.previous.filter(|p| is_named_editor(actor, p)) {
            Standing::NamedEditor { flight }
        } else {
            Standing::Outsider
        }
    }

    /// Decide whether `actor` may perform `mutation`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for deletions by non-administrators and for
    ///   outsiders.
    /// - `Forbidden` when the service identity writes a flight or config
    ///   document, or a named editor changes anything.
    pub fn authorize(
        &self,
        actor: &ActorContext,
        mutation: &Mutation<'_>,
    ) -> Result<AccessState, Rejection> {
        let standing = self.standing(actor, mutation);
        let state = standing.state();
        tracing::debug!(identity = %actor.identity, %state, "classified actor");

        if mutation.is_deletion() && state != AccessState::Administrator {
            return Err(Rejection::unauthorized(
                "Only administrators may delete documents.",
            ));
        }

        match standing {
            Standing::Administrator => Ok(state),
            Standing::ServiceIdentity => match mutation.touches_admin_only_kind() {
                Some(kind) => Err(Rejection::forbidden(format!(
                    "Only administrators may create or modify {kind} documents."
                ))),
                None => Ok(state),
            },
            Standing::NamedEditor { flight } => {
                check_editor_revision(mutation.candidate, flight)?;
                Ok(state)
            }
            Standing::Outsider => Err(Rejection::unauthorized(
                "Only administrators, the service identity, and a flight's editors may modify documents.",
            )),
        }
    }
}

/// An [`AccessState`] together with the revision that earned it.
#[derive(Debug, Clone, Copy)]
enum Standing<'a> {
    Administrator,
    ServiceIdentity,
    NamedEditor { flight: &'a Value },
    Outsider,
}

impl Standing<'_> {
    fn state(&self) -> AccessState {
        match self {
            Self::Administrator => AccessState::Administrator,
            Self::ServiceIdentity => AccessState::ServiceIdentity,
            Self::NamedEditor { .. } => AccessState::NamedEditor,
            Self::Outsider => AccessState::Outsider,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_IDENTITY, DEFAULT_ADMIN_ROLE)
    }
}

// ─── Named editors ───────────────────────────────────────────────────

/// The `editors` list as a set, or `None` if it is absent or not an array
/// of strings.
fn editor_set(document: &Value) -> Option<BTreeSet<&str>> {
    document
        .get(EDITORS_FIELD)?
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect()
}

fn is_named_editor(actor: &ActorContext, previous: &Value) -> bool {
    if DocumentKind::of(previous) != Some(DocumentKind::Flight) {
        return false;
    }
    editor_set(previous).is_some_and(|editors| editors.contains(actor.identity.as_str()))
}

/// Content fields of a revision, without `editors` and store metadata.
fn content_fields(document: &Value) -> Map<String, Value> {
    document
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(k, _)| k.as_str() != EDITORS_FIELD && !k.starts_with('_'))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn check_editor_revision(candidate: &Value, previous: &Value) -> Result<(), Rejection> {
    if editor_set(candidate) != editor_set(previous) {
        return Err(Rejection::forbidden(
            "Named editors may not change the editors of a flight.",
        ));
    }
    if content_fields(candidate) != content_fields(previous) {
        return Err(Rejection::forbidden(
            "Editing a flight as a named editor is not supported yet.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> AccessPolicy {
        AccessPolicy::default()
    }

    fn admin() -> ActorContext {
        ActorContext::new("root").with_role(DEFAULT_ADMIN_ROLE)
    }

    fn service() -> ActorContext {
        ActorContext::new(DEFAULT_SERVICE_IDENTITY)
    }

    fn flight(editors: Value) -> Value {
        json!({
            "_id": "f1",
            "_rev": "1-a",
            "type": "flight",
            "name": "Test",
            "editors": editors
        })
    }

    fn authorize(actor: &ActorContext, candidate: &Value, previous: Option<&Value>) -> Result<AccessState, Rejection> {
        policy().authorize(actor, &Mutation::new(candidate, previous))
    }

    // ── Administrator ────────────────────────────────────────────────

    #[test]
    fn test_admin_may_write_config() {
        let doc = json!({"type": "config"});
        assert_eq!(authorize(&admin(), &doc, None), Ok(AccessState::Administrator));
    }

    #[test]
    fn test_admin_may_delete() {
        let stub = json!({"_id": "x", "_deleted": true});
        let old = json!({"type": "flight"});
        assert_eq!(authorize(&admin(), &stub, Some(&old)), Ok(AccessState::Administrator));
    }

    #[test]
    fn test_admin_role_beats_service_identity() {
        let actor = service().with_role(DEFAULT_ADMIN_ROLE);
        let doc = json!({"type": "flight"});
        assert_eq!(authorize(&actor, &doc, None), Ok(AccessState::Administrator));
    }

    // ── Service identity ─────────────────────────────────────────────

    #[test]
    fn test_service_may_write_telemetry() {
        let doc = json!({"type": "payload_telemetry"});
        assert_eq!(authorize(&service(), &doc, None), Ok(AccessState::ServiceIdentity));
    }

    #[test]
    fn test_service_may_not_write_config() {
        let doc = json!({"type": "config"});
        let err = authorize(&service(), &doc, None).unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(err.message, "Only administrators may create or modify config documents.");
    }

    #[test]
    fn test_service_may_not_write_flight() {
        let doc = json!({"type": "flight"});
        assert!(authorize(&service(), &doc, None).unwrap_err().is_forbidden());
    }

    #[test]
    fn test_service_may_not_retype_a_flight() {
        let old = json!({"type": "flight"});
        let doc = json!({"type": "sandbox"});
        assert!(authorize(&service(), &doc, Some(&old)).unwrap_err().is_forbidden());
    }

    #[test]
    fn test_service_may_not_delete() {
        let stub = json!({"_deleted": true});
        let old = json!({"type": "payload_telemetry"});
        let err = authorize(&service(), &stub, Some(&old)).unwrap_err();
        assert!(err.is_unauthorized());
    }

    // ── Named editor ─────────────────────────────────────────────────

    #[test]
    fn test_editor_unchanged_resubmission_permitted() {
        let old = flight(json!(["alice", "bob"]));
        let mut new = flight(json!(["bob", "alice"]));
        new["_rev"] = json!("2-b");
        assert_eq!(
            authorize(&ActorContext::new("alice"), &new, Some(&old)),
            Ok(AccessState::NamedEditor)
        );
    }

    #[test]
    fn test_editor_adding_editor_forbidden() {
        let old = flight(json!(["alice"]));
        let new = flight(json!(["alice", "mallory"]));
        let err = authorize(&ActorContext::new("alice"), &new, Some(&old)).unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(err.message, "Named editors may not change the editors of a flight.");
    }

    #[test]
    fn test_editor_removing_editors_field_forbidden() {
        let old = flight(json!(["alice"]));
        let mut new = flight(json!(["alice"]));
        new.as_object_mut().unwrap().remove("editors");
        assert!(authorize(&ActorContext::new("alice"), &new, Some(&old))
            .unwrap_err()
            .is_forbidden());
    }

    #[test]
    fn test_editor_other_change_forbidden() {
        let old = flight(json!(["alice"]));
        let mut new = flight(json!(["alice"]));
        new["name"] = json!("Renamed");
        let err = authorize(&ActorContext::new("alice"), &new, Some(&old)).unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(err.message, "Editing a flight as a named editor is not supported yet.");
    }

    #[test]
    fn test_editor_may_not_delete() {
        let old = flight(json!(["alice"]));
        let stub = json!({"_deleted": true});
        assert!(authorize(&ActorContext::new("alice"), &stub, Some(&old))
            .unwrap_err()
            .is_unauthorized());
    }

    #[test]
    fn test_editor_of_non_flight_is_outsider() {
        let old = json!({"type": "sandbox", "editors": ["alice"]});
        let actor = ActorContext::new("alice");
        let mutation = Mutation::new(&old, Some(&old));
        assert_eq!(policy().classify(&actor, &mutation), AccessState::Outsider);
    }

    #[test]
    fn test_editor_creating_a_flight_is_outsider() {
        let new = flight(json!(["alice"]));
        let actor = ActorContext::new("alice");
        assert_eq!(
            policy().classify(&actor, &Mutation::new(&new, None)),
            AccessState::Outsider
        );
        assert!(authorize(&actor, &new, None).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_editor_listed_only_in_candidate_is_outsider() {
        let old = flight(json!([]));
        let new = flight(json!(["eve"]));
        let err = authorize(&ActorContext::new("eve"), &new, Some(&old)).unwrap_err();
        assert!(err.is_unauthorized());
    }

    // ── Outsider ─────────────────────────────────────────────────────

    #[test]
    fn test_outsider_creation_unauthorized() {
        for kind in DocumentKind::all() {
            let doc = json!({"type": kind.as_str()});
            let err = authorize(&ActorContext::new("stranger"), &doc, None).unwrap_err();
            assert!(err.is_unauthorized(), "kind {kind}");
        }
    }

    #[test]
    fn test_non_admin_role_is_outsider() {
        let actor = ActorContext::new("carol").with_role("manager");
        let doc = json!({"type": "listener_info"});
        assert!(authorize(&actor, &doc, None).unwrap_err().is_unauthorized());
    }

    // ── Configuration ────────────────────────────────────────────────

    #[test]
    fn test_custom_service_identity_and_role() {
        let policy = AccessPolicy::new("backend", "wizard");
        let doc = json!({"type": "payload_telemetry"});
        let mutation = Mutation::new(&doc, None);
        assert_eq!(
            policy.classify(&ActorContext::new("backend"), &mutation),
            AccessState::ServiceIdentity
        );
        assert_eq!(
            policy.classify(&ActorContext::new("x").with_role("wizard"), &mutation),
            AccessState::Administrator
        );
        assert_eq!(
            policy.classify(&service(), &mutation),
            AccessState::Outsider
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(AccessState::NamedEditor.to_string(), "NAMED_EDITOR");
        assert_eq!(AccessState::Outsider.to_string(), "OUTSIDER");
    }
}
