//! # Remote store client contract
//!
//! [`EmployeeStore`] is the seam between the directory client and whatever
//! holds the authoritative employee table. The client never talks to a
//! backend directly; it is handed a store at construction time, so the same
//! synchronisation logic runs against [`crate::MemoryStore`] in tests and
//! against the hosted REST backend in production.
//!
//! ## Contract
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`list`](EmployeeStore::list) | Full table, ordered by `created_at` descending. |
//! | [`insert`](EmployeeStore::insert) | Persists a draft and returns the stored record with its assigned id. |
//! | [`update`](EmployeeStore::update) | Applies a partial update to one record by id. |
//! | [`delete_many`](EmployeeStore::delete_many) | Removes every listed id in a single call. |
//! | [`subscribe`](EmployeeStore::subscribe) | Opens a change feed; dropping the returned stream unsubscribes. |
//!
//! Futures are not required to be `Send`: the client runs on a single logical
//! thread (the browser event loop, or a current-thread runtime natively).

use futures::stream::LocalBoxStream;

use crate::error::StoreError;
use crate::models::{ChangeEvent, Employee, EmployeeDraft, EmployeeId, EmployeePatch};

/// Stream of server-side change notifications.
pub type ChangeFeed = LocalBoxStream<'static, ChangeEvent>;

/// Async interface to the authoritative employee table.
pub trait EmployeeStore {
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Employee>, StoreError>>;
    fn insert(
        &self,
        draft: &EmployeeDraft,
    ) -> impl std::future::Future<Output = Result<Employee, StoreError>>;
    fn update(
        &self,
        id: &EmployeeId,
        patch: &EmployeePatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn delete_many(
        &self,
        ids: &[EmployeeId],
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn subscribe(&self) -> ChangeFeed;
}
