//! # habitat-access: Mutation Access Control
//!
//! A small priority-ordered state machine deciding whether an actor may
//! create, modify, or delete a document, before any schema check runs.
//!
//! - **Administrator**: anything.
//! - **Service identity**: anything but deletions and `flight` / `config`
//!   documents.
//! - **Named editor**: an unchanged resubmission of a flight that lists
//!   them in `editors`.
//! - **Outsider**: nothing.
//!
//! See [`policy`] for the full decision table.

pub mod policy;

pub use policy::{
    AccessPolicy, AccessState, Mutation, DEFAULT_ADMIN_ROLE, DEFAULT_SERVICE_IDENTITY,
    EDITORS_FIELD,
};
