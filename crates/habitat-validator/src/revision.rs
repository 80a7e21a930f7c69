//! # Revision Rules
//!
//! Checks that depend on the revision being replaced rather than on the
//! candidate alone. They run after the schema has accepted the candidate
//! and do not apply to administrators.
//!
//! `payload_telemetry` documents are built up by listeners reporting the
//! same sentence: a new document carries exactly one receiver, and a later
//! revision may add receivers but never edit or remove existing ones.

use serde_json::{Map, Value};

use habitat_access::AccessState;
use habitat_core::{DocumentKind, Rejection};
use habitat_schema::RECEIVERS_FIELD;

fn receivers(document: &Value) -> Option<&Map<String, Value>> {
    document.get(RECEIVERS_FIELD).and_then(Value::as_object)
}

/// Apply the revision rules for `kind`.
///
/// `previous` is the live revision being replaced, if any.
///
/// # Errors
///
/// Returns a `Forbidden` [`Rejection`] when a telemetry document is created
/// with other than one receiver, or a revision edits or drops a receiver.
pub fn check_revision(
    kind: DocumentKind,
    candidate: &Value,
    previous: Option<&Value>,
    state: AccessState,
) -> Result<(), Rejection> {
    if state == AccessState::Administrator || kind != DocumentKind::PayloadTelemetry {
        return Ok(());
    }
    let Some(added_to) = receivers(candidate) else {
        return Ok(());
    };
    match previous {
        None => {
            if added_to.len() == 1 {
                Ok(())
            } else {
                Err(Rejection::forbidden(
                    "New telemetry documents must have exactly one receiver.",
                ))
            }
        }
        Some(previous) => {
            let kept = receivers(previous)
                .into_iter()
                .flatten()
                .all(|(callsign, report)| added_to.get(callsign) == Some(report));
            if kept {
                Ok(())
            } else {
                Err(Rejection::forbidden("May not edit or remove receivers."))
            }
        }
    }
}
