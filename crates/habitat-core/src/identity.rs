//! # Actor Identity
//!
//! Newtypes for the identity and roles supplied by the external identity
//! provider. The gate never derives either; it only compares them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The name an actor is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

/// A role granted to an actor (e.g. `_admin`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub String);

impl Identity {
    /// Wrap an identity name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identity name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Role {
    /// Wrap a role name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is attempting a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Authenticated identity.
    pub identity: Identity,
    /// Roles held by the identity.
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl ActorContext {
    /// An actor with no roles.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(identity),
            roles: BTreeSet::new(),
        }
    }

    /// Add a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(Role::new(role));
        self
    }

    /// Whether the actor holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    /// Whether the actor is authenticated as `name`.
    pub fn is(&self, name: &str) -> bool {
        self.identity.as_str() == name
    }
}
