//! The permission selection screen.
//!
//! A [`PermissionSelector`] starts out with the whole catalog selected. Optional scopes can be
//! toggled freely; required scopes ignore toggles. [`PermissionSelector::deselect_all`] withdraws
//! the entire selection, required group included, after which [`PermissionSelector::confirm`]
//! refuses to proceed until the required group is selected again.

use serde::Serialize;
use thiserror::Error;
use threadgate_types::{PermissionSet, Scope, ScopeInfo};

use crate::error::Result;
use crate::storage::ClientStorage;

/// Validation failures shown to the user when confirming a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing is selected.
    #[error("Select at least one permission.")]
    Empty,

    /// Optional scopes are selected but the required group is not.
    #[error("The required Threads permissions must be granted to continue.")]
    MissingRequired,

    /// The stored selection cannot be read and must be made again.
    #[error("Your permission selection could not be read. Select permissions again.")]
    Unreadable,
}

/// One row of the selection screen.
#[derive(Debug, Serialize)]
pub struct ScopeEntry {
    /// The scope identifier.
    pub scope: Scope,
    /// Presentation details.
    pub info: &'static ScopeInfo,
    /// Whether the scope belongs to the required group.
    pub required: bool,
    /// Whether the scope is currently selected.
    pub selected: bool,
}

/// Snapshot of the selection screen.
#[derive(Debug, Serialize)]
pub struct SelectorView {
    /// Every catalog scope in display order.
    pub scopes: Vec<ScopeEntry>,
    /// Number of selected scopes.
    pub selected: usize,
    /// Size of the catalog.
    pub total: usize,
    /// Whether [`PermissionSelector::confirm`] would succeed.
    pub can_confirm: bool,
}

/// In-progress permission selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionSelector {
    selection: PermissionSet,
}

impl Default for PermissionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionSelector {
    /// Starts a selection with every scope selected.
    pub fn new() -> Self {
        Self {
            selection: PermissionSet::all(),
        }
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &PermissionSet {
        &self.selection
    }

    /// Flips an optional scope. Toggling a required scope does nothing.
    pub fn toggle(&mut self, scope: Scope) {
        if !self.selection.toggle(scope) {
            tracing::debug!(%scope, "ignoring toggle of required scope");
        }
    }

    /// Selects the whole catalog.
    pub fn select_all(&mut self) {
        self.selection = PermissionSet::all();
    }

    /// Clears the selection, including the required group.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Checks whether the current selection may be confirmed.
    pub fn validate(&self) -> Result<&PermissionSet, SelectionError> {
        if self.selection.is_empty() {
            return Err(SelectionError::Empty);
        }
        if !self.selection.has_required() {
            return Err(SelectionError::MissingRequired);
        }
        Ok(&self.selection)
    }

    /// Validates the selection and hands it to the login step through session storage.
    ///
    /// Nothing is written if validation fails.
    pub async fn confirm(&self, storage: &ClientStorage) -> Result<PermissionSet> {
        let selection = self.validate()?.clone();
        storage.save_selection(&selection).await?;
        tracing::info!(scopes = selection.len(), "permission selection confirmed");
        Ok(selection)
    }

    /// Renders the selection screen.
    pub fn view(&self) -> SelectorView {
        let scopes = Scope::ALL
            .into_iter()
            .map(|scope| ScopeEntry {
                scope,
                info: scope.info(),
                required: scope.is_required(),
                selected: self.selection.contains(scope),
            })
            .collect();

        SelectorView {
            scopes,
            selected: self.selection.len(),
            total: Scope::ALL.len(),
            can_confirm: self.validate().is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::InMemoryBackend;
    use crate::error::ServiceError;

    use super::*;

    fn storage() -> (ClientStorage, InMemoryBackend) {
        let session = InMemoryBackend::new("session");
        let storage = ClientStorage::from_backends(
            Box::new(InMemoryBackend::new("local")),
            Box::new(session.clone()),
        );
        (storage, session)
    }

    #[test]
    fn starts_with_full_catalog() {
        let selector = PermissionSelector::new();
        assert_eq!(selector.selection(), &PermissionSet::all());
        assert_eq!(selector.view().selected, 5);
    }

    #[derive(Clone, Copy, Debug)]
    enum Action {
        Toggle(Scope),
        SelectAll,
        DeselectAll,
    }

    fn actions() -> Vec<Action> {
        let mut actions: Vec<_> = Scope::ALL.into_iter().map(Action::Toggle).collect();
        actions.extend([Action::SelectAll, Action::DeselectAll]);
        actions
    }

    #[test]
    fn confirmable_selections_always_hold_required_scopes() {
        const MAX_LEN: u32 = 4;
        let actions = actions();
        let base = actions.len();

        // Walks every sequence of up to MAX_LEN actions, encoded as digits in base `base`.
        for len in 0..=MAX_LEN {
            for mut code in 0..base.pow(len) {
                let mut selector = PermissionSelector::new();
                let mut sequence = Vec::new();

                for _ in 0..len {
                    let action = actions[code % base];
                    code /= base;
                    sequence.push(action);

                    match action {
                        Action::Toggle(scope) => selector.toggle(scope),
                        Action::SelectAll => selector.select_all(),
                        Action::DeselectAll => selector.deselect_all(),
                    }

                    if let Ok(confirmed) = selector.validate() {
                        for required in Scope::REQUIRED {
                            assert!(
                                confirmed.contains(required),
                                "{required} missing after {sequence:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn deselect_all_blocks_confirm() {
        let mut selector = PermissionSelector::new();
        selector.deselect_all();
        assert_eq!(selector.validate(), Err(SelectionError::Empty));
        assert!(!selector.view().can_confirm);

        // Re-adding an optional scope is not enough.
        selector.toggle(Scope::UserMedia);
        assert_eq!(selector.validate(), Err(SelectionError::MissingRequired));

        selector.select_all();
        assert_eq!(selector.validate(), Ok(&PermissionSet::all()));
    }

    #[tokio::test]
    async fn confirm_empty_writes_nothing() {
        let (storage, session) = storage();
        let mut selector = PermissionSelector::new();
        selector.deselect_all();

        let err = selector.confirm(&storage).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Selection(SelectionError::Empty)
        ));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn confirm_stores_selection() {
        let (storage, _session) = storage();
        let mut selector = PermissionSelector::new();
        selector.toggle(Scope::UserProfile);
        selector.toggle(Scope::UserMedia);

        let confirmed = selector.confirm(&storage).await.unwrap();
        assert_eq!(confirmed, PermissionSet::required_only());
        assert_eq!(
            storage.load_selection().await.unwrap(),
            Some(PermissionSet::required_only())
        );
    }
}
