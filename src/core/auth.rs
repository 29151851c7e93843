//! Shop administration checks.
//!
//! An operator may manage the catalog if they hold the guild's administrator
//! capability or any role listed in the configured admin role set.

use crate::errors::{Error, Result};
use std::collections::HashSet;

/// Role ids allowed to manage the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRoles(HashSet<String>);

impl AdminRoles {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains(&self, role_id: &str) -> bool {
        self.0.contains(role_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The person driving a command, reduced to what authorization needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operator {
    /// Whether the member has the guild administrator permission
    pub has_admin_capability: bool,
    /// Role ids the member holds
    pub role_ids: Vec<String>,
}

/// Checks that `operator` may manage the shop.
///
/// # Errors
/// Returns [`Error::Unauthorized`] when the operator is neither a guild administrator
/// nor holds any configured admin role.
pub fn authorize(operator: &Operator, admin_roles: &AdminRoles) -> Result<()> {
    if operator.has_admin_capability
        || operator
            .role_ids
            .iter()
            .any(|role| admin_roles.contains(role))
    {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}
