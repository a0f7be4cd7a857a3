//! Test doubles shared by the dispatcher and relay tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures::StreamExt;
use store::{
    ChangeFeed, Dispatched, EmailRequest, EmailTrigger, Employee, EmployeeDraft, EmployeeField,
    EmployeeId, EmployeePatch, EmployeeStore, MemoryStore, StoreError, TransportError,
};

use crate::confirm::Confirm;
use crate::dispatcher::Dispatcher;

/// A record whose id doubles as its age: higher ids are newer.
pub(crate) fn employee(id: &str, name: &str) -> Employee {
    let n: u32 = id.parse().unwrap_or(0);
    Employee {
        id: EmployeeId::new(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        emp_num: format!("EMP{id}"),
        phone_no: format!("555-01{id:0>2}"),
        created_at: Some(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + chrono::Duration::days(n.into()),
        ),
        updated_at: None,
    }
}

pub(crate) fn valid_form<S: EmployeeStore, M: EmailTrigger>(d: &Dispatcher<S, M>, name: &str) {
    d.set_field(EmployeeField::Name, name);
    d.set_field(
        EmployeeField::Email,
        format!("{}@example.com", name.to_lowercase()),
    );
    d.set_field(EmployeeField::EmpNum, "EMP100");
    d.set_field(EmployeeField::PhoneNo, "555-0100");
}

pub(crate) fn dispatcher(store: MemoryStore) -> Dispatcher<CountingStore, RecordingMailer> {
    dispatcher_with(store, |_: &str| true)
}

pub(crate) fn dispatcher_with(
    store: MemoryStore,
    confirm: impl Confirm + 'static,
) -> Dispatcher<CountingStore, RecordingMailer> {
    Dispatcher::new(
        CountingStore::new(store),
        RecordingMailer::default(),
        confirm,
    )
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Calls {
    pub list: usize,
    pub insert: usize,
    pub update: usize,
    pub deletes: Vec<Vec<EmployeeId>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.list + self.insert + self.update + self.deletes.len()
    }
}

/// Wraps a [`MemoryStore`], counting every call and optionally delaying it.
pub(crate) struct CountingStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Calls>>,
    delay: Option<Duration>,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Arc::default(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl EmployeeStore for CountingStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        self.calls.lock().unwrap().list += 1;
        self.pause().await;
        self.inner.list().await
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        self.calls.lock().unwrap().insert += 1;
        self.pause().await;
        self.inner.insert(draft).await
    }

    async fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError> {
        self.calls.lock().unwrap().update += 1;
        self.pause().await;
        self.inner.update(id, patch).await
    }

    async fn delete_many(&self, ids: &[EmployeeId]) -> Result<(), StoreError> {
        self.calls.lock().unwrap().deletes.push(ids.to_vec());
        self.pause().await;
        self.inner.delete_many(ids).await
    }

    fn subscribe(&self) -> ChangeFeed {
        self.inner.subscribe()
    }
}

/// Records every request instead of sending it.
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<EmailRequest>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl EmailTrigger for RecordingMailer {
    async fn send(&self, request: &EmailRequest) -> Result<Dispatched, TransportError> {
        if self.fail {
            return Err(TransportError("connection refused".into()));
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(Dispatched::now())
    }
}

/// Answers each `list()` with the next scripted listing after its own delay,
/// so concurrent listings can be made to complete in a chosen order.
#[derive(Debug, Default)]
pub(crate) struct ScriptedStore {
    listings: Mutex<VecDeque<(u64, Vec<Employee>)>>,
}

impl ScriptedStore {
    pub fn new(listings: impl IntoIterator<Item = (u64, Vec<Employee>)>) -> Self {
        Self {
            listings: Mutex::new(listings.into_iter().collect()),
        }
    }
}

impl EmployeeStore for ScriptedStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let next = self.listings.lock().unwrap().pop_front();
        let (millis, records) = next.unwrap_or_default();
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(records)
    }

    async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        Ok(Employee {
            id: EmployeeId::new("new"),
            name: draft.name.clone(),
            email: draft.email.clone(),
            emp_num: draft.emp_num.clone(),
            phone_no: draft.phone_no.clone(),
            created_at: Some(Utc::now()),
            updated_at: None,
        })
    }

    async fn update(&self, _id: &EmployeeId, _patch: &EmployeePatch) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete_many(&self, _ids: &[EmployeeId]) -> Result<(), StoreError> {
        Ok(())
    }

    fn subscribe(&self) -> ChangeFeed {
        futures::stream::empty().boxed_local()
    }
}
