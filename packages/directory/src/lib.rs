//! Client-side sync engine for the employee directory.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `dispatcher` | [`Dispatcher`]: user intents to store and webhook calls |
//! | `relay` | Change-feed following for [`Dispatcher`] |
//! | `collection` | Snapshot, selection and edit target with their invariants |
//! | `projection` | Search filter and column sort over the snapshot |
//! | `form` | Add/edit form inputs and validation |
//! | `activity` | User-visible notices |
//! | `busy` | The single in-flight flag |
//! | `confirm` | Yes/no prompt before destructive actions |
//!
//! The engine is generic over [`store::EmployeeStore`] and
//! [`store::EmailTrigger`]; the `api` crate provides the HTTP backends and
//! `store::MemoryStore` an in-process one.

pub mod activity;
pub mod busy;
pub mod collection;
pub mod confirm;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod projection;
mod relay;

#[cfg(test)]
mod testing;

pub use activity::{ActivityLog, LogLevel, Notice};
pub use collection::Collection;
#[cfg(target_arch = "wasm32")]
pub use confirm::BrowserConfirm;
pub use confirm::Confirm;
pub use dispatcher::{Controls, DeleteOutcome, DirectoryState, Dispatcher, SubmitOutcome};
pub use error::{ActionError, RemoteAction, SelectionError};
pub use form::{EmployeeForm, ValidationError};
pub use projection::{collate, project, SortDirection, SortState, ViewQuery};
