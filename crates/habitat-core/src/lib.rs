//! # habitat-core: Foundational Types for the Document Gate
//!
//! Every other crate in the workspace depends on `habitat-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Typed field paths.** Documents arrive as loosely-typed JSON. All
//!    field access goes through [`FieldPath::resolve`], which returns `None`
//!    for an absent leaf or ancestor instead of panicking or coercing.
//!
//! 2. **Closed value kinds.** [`ValueKind`] classifies a `serde_json::Value`
//!    with an exhaustive `match`. Arrays and objects are distinct kinds.
//!
//! 3. **Single `DocumentKind` enum.** The six document types accepted by the
//!    store are one definition, matched exhaustively by every consumer.
//!
//! 4. **Explicit actor context.** [`ActorContext`] is passed as a parameter
//!    to every entry point; nothing reads an ambient user.
//!
//! 5. **Rejection is a value.** [`Rejection`] carries a
//!    [`RejectionKind`] (`Forbidden` or `Unauthorized`) and a message naming
//!    the offending field or condition.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `habitat-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod identity;
pub mod kind;
pub mod path;
pub mod temporal;

pub use document::DocumentKind;
pub use error::{PathError, Rejection, RejectionKind};
pub use identity::{ActorContext, Identity, Role};
pub use kind::ValueKind;
pub use path::{FieldPath, Segment};
pub use temporal::{describe_epoch, LAUNCH_WINDOW_MIN_SECS, YEAR_2000_EPOCH, YEAR_3000_EPOCH};
