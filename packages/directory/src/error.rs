use std::fmt;

use store::{StoreError, TransportError};
use thiserror::Error;

use crate::form::ValidationError;

/// Wrong selection (or missing edit target) for the requested action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No employees selected")]
    Empty,
    #[error("Please select exactly one employee to send email.")]
    ExpectedExactlyOne { selected: usize },
    #[error("No employee is being edited")]
    NoEditTarget,
}

/// The remote call that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    Load,
    Add,
    Update,
    Delete,
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteAction::Load => "load employees",
            RemoteAction::Add => "add employee",
            RemoteAction::Update => "update employee",
            RemoteAction::Delete => "delete employees",
        })
    }
}

/// Every way a dispatcher operation can fail. All of them leave the local
/// snapshot untouched and the in-flight flag released.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("failed to {action}: {source}")]
    Remote {
        action: RemoteAction,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Another mutating operation is still in flight.
    #[error("another operation is in progress")]
    Busy,
}

impl ActionError {
    pub(crate) fn remote(action: RemoteAction) -> impl FnOnce(StoreError) -> Self {
        move |source| ActionError::Remote { action, source }
    }
}
