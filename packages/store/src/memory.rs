use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::StreamExt;

use crate::error::StoreError;
use crate::models::{ChangeEvent, ChangeKind, Employee, EmployeeDraft, EmployeeId, EmployeePatch};
use crate::repo::{ChangeFeed, EmployeeStore};

/// In-memory EmployeeStore for testing and offline use.
///
/// Clones share the same table, so two clients built from clones of one
/// store observe each other's changes through their feeds.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    // Creation order, oldest first.
    records: Vec<Employee>,
    subscribers: Vec<UnboundedSender<ChangeEvent>>,
    offline: bool,
}

impl Inner {
    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unreachable("memory store is offline".into()))
        } else {
            Ok(())
        }
    }

    fn broadcast(&mut self, event: ChangeEvent) {
        self.subscribers
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with existing records, given oldest first.
    pub fn seeded(records: Vec<Employee>) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().records = records;
        store
    }

    /// Make every subsequent call fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    /// Number of live change feeds.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }
}

impl EmployeeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_online()?;
        let mut records: Vec<Employee> = inner.records.iter().rev().cloned().collect();
        // Stable: equal timestamps keep latest-inserted first.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        let now = Utc::now();
        let employee = Employee {
            id: EmployeeId::new(uuid::Uuid::new_v4().to_string()),
            name: draft.name.clone(),
            email: draft.email.clone(),
            emp_num: draft.emp_num.clone(),
            phone_no: draft.phone_no.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        inner.records.push(employee.clone());
        inner.broadcast(ChangeEvent::row(ChangeKind::Insert, employee.id.clone()));
        tracing::debug!("memory store: inserted {}", employee.id);
        Ok(employee)
    }

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        let record = inner
            .records
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.apply(patch);
        inner.broadcast(ChangeEvent::row(ChangeKind::Update, id.clone()));
        Ok(())
    }

    async fn delete_many(&self, ids: &[EmployeeId]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        let mut removed = Vec::new();
        inner.records.retain(|e| {
            if ids.contains(&e.id) {
                removed.push(e.id.clone());
                false
            } else {
                true
            }
        });
        for id in removed {
            inner.broadcast(ChangeEvent::row(ChangeKind::Delete, id));
        }
        Ok(())
    }

    fn subscribe(&self) -> ChangeFeed {
        let (tx, rx) = mpsc::unbounded();
        self.inner.lock().unwrap().subscribers.push(tx);
        rx.boxed_local()
    }
}
