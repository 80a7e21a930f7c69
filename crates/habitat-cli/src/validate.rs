//! # Validate Subcommand
//!
//! Runs one candidate document, and optionally the revision it replaces,
//! through the same gate the store applies on write.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use habitat_core::ActorContext;
use habitat_validator::Validator;

/// Arguments for the `habitat validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Candidate document (JSON).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Currently stored revision the candidate replaces (JSON).
    #[arg(long, value_name = "PATH")]
    pub previous: Option<PathBuf>,

    /// Identity of the user performing the write.
    #[arg(long, default_value = "")]
    pub user: String,

    /// Role held by the user. May be repeated.
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,
}

impl ValidateArgs {
    fn actor(&self) -> ActorContext {
        self.roles
            .iter()
            .fold(ActorContext::new(self.user.as_str()), |actor, role| {
                actor.with_role(role.as_str())
            })
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when accepted, 1 when rejected. Unreadable input
/// or configuration is an error.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config)?;
    let validator = Validator::new(&config);

    let candidate = crate::read_json(&args.document)?;
    let previous = args
        .previous
        .as_deref()
        .map(crate::read_json)
        .transpose()?;

    match validator.validate(&candidate, previous.as_ref(), &args.actor()) {
        Ok(accepted) => {
            let kind = accepted.kind.map_or("-", |k| k.as_str());
            if accepted.deletion {
                println!("ACCEPTED: deletion of {kind} ({})", accepted.state);
            } else {
                println!("ACCEPTED: {kind} ({})", accepted.state);
            }
            Ok(0)
        }
        Err(rejection) => {
            println!("REJECTED: {rejection}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn args(document: PathBuf, user: &str, roles: &[&str]) -> ValidateArgs {
        ValidateArgs {
            document,
            previous: None,
            user: user.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    const LISTENER: &str = r#"{
        "type": "listener_info",
        "time_created": 100,
        "time_uploaded": 101,
        "data": {"callsign": "M0RND"}
    }"#;

    #[test]
    fn accepted_document_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write(dir.path(), "doc.json", LISTENER);
        assert_eq!(run_validate(&args(doc, "habitat", &[]), None).unwrap(), 0);
    }

    #[test]
    fn rejected_document_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write(dir.path(), "doc.json", LISTENER);
        assert_eq!(run_validate(&args(doc, "mallory", &[]), None).unwrap(), 1);
    }

    #[test]
    fn roles_are_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write(dir.path(), "doc.json", r#"{"type": "config"}"#);
        assert_eq!(run_validate(&args(doc.clone(), "root", &["_admin"]), None).unwrap(), 0);
        assert_eq!(run_validate(&args(doc, "habitat", &[]), None).unwrap(), 1);
    }

    #[test]
    fn previous_revision_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write(dir.path(), "doc.json", LISTENER);
        let old = write(dir.path(), "old.json", r#"{"type": "payload_telemetry"}"#);
        let mut a = args(doc, "habitat", &[]);
        a.previous = Some(old);
        assert_eq!(run_validate(&a, None).unwrap(), 1);
    }

    #[test]
    fn config_file_changes_service_identity() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write(dir.path(), "doc.json", LISTENER);
        let cfg = write(dir.path(), "habitat.yaml", "service_identity: ingest\n");
        assert_eq!(run_validate(&args(doc.clone(), "ingest", &[]), Some(&cfg)).unwrap(), 0);
        assert_eq!(run_validate(&args(doc, "habitat", &[]), Some(&cfg)).unwrap(), 1);
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(run_validate(&args(missing, "habitat", &[]), None).is_err());

        let bad = write(dir.path(), "bad.json", "{not json");
        let err = run_validate(&args(bad, "habitat", &[]), None).unwrap_err();
        assert!(format!("{err:#}").contains("invalid JSON"));
    }
}
