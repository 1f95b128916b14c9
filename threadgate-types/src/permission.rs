//! The set of scopes a user grants.
//!
//! A [`PermissionSet`] is not a flat collection. It tracks the required scope group as a single
//! unit next to the set of optional scopes, so no operation can drop one required scope while
//! keeping the others. Either all of [`Scope::REQUIRED`] are present or none of them are.
//!
//! On the wire and in storage, the set is a JSON array of scope names:
//!
//! ```
//! use threadgate_types::{PermissionSet, Scope};
//!
//! let set: PermissionSet = serde_json::from_str(
//!     r#"["threads_basic", "threads_read_replies", "threads_keyword_search", "user_media"]"#,
//! )
//! .unwrap();
//!
//! assert!(set.has_required());
//! assert!(set.contains(Scope::UserMedia));
//! assert!(!set.contains(Scope::UserProfile));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Error returned when a list of scopes cannot form a [`PermissionSet`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPermissionSetError {
    /// Only part of the required group was listed.
    #[error("incomplete required scopes: missing {0:?}")]
    PartialRequired(Vec<Scope>),
}

/// A set of granted scopes with the required group tracked as one unit.
///
/// Equality is order-independent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "Vec<Scope>", into = "Vec<Scope>")]
pub struct PermissionSet {
    required: bool,
    optional: BTreeSet<Scope>,
}

impl PermissionSet {
    /// Creates a set containing the whole catalog.
    pub fn all() -> Self {
        Self {
            required: true,
            optional: Scope::OPTIONAL.into_iter().collect(),
        }
    }

    /// Creates a set containing only the required group.
    pub fn required_only() -> Self {
        Self {
            required: true,
            optional: BTreeSet::new(),
        }
    }

    /// Creates an empty set with the required group withheld.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the required group is granted.
    pub fn has_required(&self) -> bool {
        self.required
    }

    /// Returns `true` if the given scope is part of this set.
    pub fn contains(&self, scope: Scope) -> bool {
        if scope.is_required() {
            self.required
        } else {
            self.optional.contains(&scope)
        }
    }

    /// Returns the number of scopes in this set.
    pub fn len(&self) -> usize {
        let required = if self.required {
            Scope::REQUIRED.len()
        } else {
            0
        };
        required + self.optional.len()
    }

    /// Returns `true` if no scope is granted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the contained scopes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        Scope::ALL.into_iter().filter(|scope| self.contains(*scope))
    }

    /// Flips membership of an optional scope.
    ///
    /// Returns `false` without changing anything if `scope` is required.
    pub fn toggle(&mut self, scope: Scope) -> bool {
        if scope.is_required() {
            return false;
        }

        if !self.optional.remove(&scope) {
            self.optional.insert(scope);
        }
        true
    }

    /// Withdraws every scope, including the required group.
    pub fn clear(&mut self) {
        self.required = false;
        self.optional.clear();
    }
}

impl TryFrom<Vec<Scope>> for PermissionSet {
    type Error = InvalidPermissionSetError;

    fn try_from(scopes: Vec<Scope>) -> Result<Self, Self::Error> {
        let (required, optional): (BTreeSet<_>, BTreeSet<_>) =
            scopes.into_iter().partition(|scope| scope.is_required());

        let missing: Vec<_> = Scope::REQUIRED
            .into_iter()
            .filter(|scope| !required.contains(scope))
            .collect();

        if !required.is_empty() && !missing.is_empty() {
            return Err(InvalidPermissionSetError::PartialRequired(missing));
        }

        Ok(Self {
            required: !required.is_empty(),
            optional,
        })
    }
}

impl From<PermissionSet> for Vec<Scope> {
    fn from(set: PermissionSet) -> Self {
        set.iter().collect()
    }
}
