//! # Action dispatcher
//!
//! [`Dispatcher`] owns the client-side state of the employee directory and
//! turns user intents into calls on the injected [`EmployeeStore`] and
//! [`EmailTrigger`].
//!
//! ## State
//!
//! One [`DirectoryState`] behind a mutex: the [`Collection`] (snapshot,
//! selection, edit target), the [`EmployeeForm`] inputs, the [`ViewQuery`]
//! (search + sort) and the [`ActivityLog`] of notices. The lock is never held
//! across an `.await`.
//!
//! ## Operations
//!
//! | Method | Gated | Remote calls on success |
//! |--------|-------|-------------------------|
//! | [`load`](Dispatcher::load) | yes | `list` |
//! | [`refresh`](Dispatcher::refresh) | no | `list` |
//! | [`add`](Dispatcher::add) | yes | `insert`, then `list` |
//! | [`update`](Dispatcher::update) | yes | `update`, then `list` |
//! | [`delete_selected`](Dispatcher::delete_selected) | yes | one batched `delete_many`, then `list` |
//! | [`send_email`](Dispatcher::send_email) | yes | one webhook `send` |
//!
//! Gated operations take the [`BusyFlag`]; a call made while another one is
//! in flight fails with [`ActionError::Busy`] instead of queueing. Validation
//! and selection checks run before any remote call. Every failure is returned
//! to the caller and also recorded as a notice, and leaves the snapshot as it
//! was.
//!
//! `refresh` is deliberately ungated: change-feed refreshes may interleave
//! with a pending mutation, and whichever `list()` completes last wins.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use store::{
    Dispatched, EmailRequest, EmailTrigger, Employee, EmployeeField, EmployeeId, EmployeePatch,
    EmployeeStore,
};

use crate::activity::{ActivityLog, LogLevel};
use crate::busy::BusyFlag;
use crate::collection::Collection;
use crate::confirm::Confirm;
use crate::error::{ActionError, RemoteAction, SelectionError};
use crate::form::EmployeeForm;
use crate::projection::{project, SortState, ViewQuery};

/// Everything the view renders from.
#[derive(Clone, Debug, Default)]
pub struct DirectoryState {
    pub collection: Collection,
    pub form: EmployeeForm,
    pub query: ViewQuery,
    pub activity: ActivityLog,
}

/// What the action buttons and summary lines should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls {
    pub busy: bool,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub delete_label: String,
    pub delete_enabled: bool,
    pub send_email_enabled: bool,
    pub total_label: String,
    pub selected_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Added(Employee),
    Updated(EmployeeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

/// "1 employee", "3 employees".
pub(crate) fn employees(n: usize) -> String {
    format!("{n} employee{}", if n == 1 { "" } else { "s" })
}

pub(crate) fn delete_prompt(n: usize) -> String {
    format!(
        "Are you sure you want to delete {}? This action cannot be undone.",
        employees(n)
    )
}

pub struct Dispatcher<S, M> {
    store: S,
    mailer: M,
    confirm: Box<dyn Confirm>,
    origin: String,
    state: Mutex<DirectoryState>,
    busy: BusyFlag,
}

impl<S, M> Dispatcher<S, M>
where
    S: EmployeeStore,
    M: EmailTrigger,
{
    pub fn new(store: S, mailer: M, confirm: impl Confirm + 'static) -> Self {
        Self {
            store,
            mailer,
            confirm: Box::new(confirm),
            origin: "unknown".to_string(),
            state: Mutex::new(DirectoryState::default()),
            busy: BusyFlag::default(),
        }
    }

    /// Builder method to set the `triggered_from` tag sent with emails.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    fn state(&self) -> MutexGuard<'_, DirectoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&DirectoryState) -> R) -> R {
        f(&self.state())
    }

    fn notify(&self, level: LogLevel, title: &str, message: &str) {
        self.state().activity.push(level, title, message);
    }

    /// Record a notice for `err` and return it.
    fn fail<T>(&self, err: ActionError) -> Result<T, ActionError> {
        let (title, message) = match &err {
            ActionError::Validation(e) => ("Validation Error", e.to_string()),
            ActionError::Selection(e) => ("Selection Error", e.to_string()),
            ActionError::Remote { action, source } => match action {
                RemoteAction::Load if source.is_connection() => (
                    "Connection Error",
                    "Unable to connect to database. Please ensure the store is configured."
                        .to_string(),
                ),
                RemoteAction::Load => (
                    "Error",
                    "Failed to load employees. Please check your store configuration.".to_string(),
                ),
                RemoteAction::Add => ("Error", "Failed to add employee. Please try again.".into()),
                RemoteAction::Update => (
                    "Error",
                    "Failed to update employee. Please try again.".into(),
                ),
                RemoteAction::Delete => (
                    "Error",
                    "Failed to delete employees. Please try again.".into(),
                ),
            },
            ActionError::Transport(_) => (
                "Error",
                "Failed to send email. Please check the webhook URL and try again.".into(),
            ),
            ActionError::Busy => (
                "Busy",
                "Please wait for the current operation to finish.".into(),
            ),
        };
        let level = match err {
            ActionError::Busy => LogLevel::Warning,
            _ => LogLevel::Error,
        };
        tracing::debug!("operation failed: {err}");
        self.notify(level, title, &message);
        Err(err)
    }

    // ----- read side -----

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn snapshot(&self) -> Vec<Employee> {
        self.read(|s| s.collection.snapshot().to_vec())
    }

    pub fn selection(&self) -> Vec<EmployeeId> {
        self.read(|s| s.collection.selection().to_vec())
    }

    pub fn edit_target(&self) -> Option<Employee> {
        self.read(|s| s.collection.edit_target().cloned())
    }

    pub fn form(&self) -> EmployeeForm {
        self.read(|s| s.form.clone())
    }

    pub fn sort_state(&self) -> SortState {
        self.read(|s| s.query.sort)
    }

    pub fn activity(&self) -> ActivityLog {
        self.read(|s| s.activity.clone())
    }

    /// Rows to display, filtered and sorted.
    pub fn visible_rows(&self) -> Vec<Employee> {
        self.read(|s| {
            project(s.collection.snapshot(), &s.query)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// True when there is at least one visible row and every visible row is
    /// selected.
    pub fn all_visible_selected(&self) -> bool {
        self.read(|s| {
            let rows = project(s.collection.snapshot(), &s.query);
            !rows.is_empty() && rows.iter().all(|e| s.collection.is_selected(&e.id))
        })
    }

    pub fn controls(&self) -> Controls {
        let busy = self.is_busy();
        self.read(|s| {
            let selected = s.collection.selection().len();
            Controls {
                busy,
                submit_label: if s.collection.edit_target().is_some() {
                    "Update Employee"
                } else {
                    "Add Row"
                },
                submit_enabled: !busy,
                delete_label: format!("Delete Row ({selected})"),
                delete_enabled: selected > 0 && !busy,
                send_email_enabled: selected == 1 && !busy,
                total_label: format!("{} total", employees(s.collection.len())),
                selected_label: (selected > 0)
                    .then(|| format!("{} selected", employees(selected))),
            }
        })
    }

    // ----- local intents -----

    pub fn set_field(&self, field: EmployeeField, value: impl Into<String>) {
        self.state().form.set(field, value);
    }

    /// Load a snapshot record into the form as the edit target, replacing any
    /// previous target and its unsaved input. Returns false if the id is not
    /// in the snapshot.
    pub fn begin_edit(&self, id: &EmployeeId) -> bool {
        let mut state = self.state();
        let Some(employee) = state.collection.get(id).cloned() else {
            return false;
        };
        state.form = EmployeeForm::from_employee(&employee);
        state.collection.set_edit_target(Some(employee));
        true
    }

    pub fn cancel_edit(&self) {
        let mut state = self.state();
        state.collection.set_edit_target(None);
        state.form.clear();
    }

    pub fn set_selected(&self, id: &EmployeeId, checked: bool) {
        self.state().collection.set_selected(id, checked);
    }

    /// Header checkbox: select every visible row, or clear the selection.
    pub fn select_all_visible(&self, checked: bool) {
        let mut state = self.state();
        if checked {
            let ids: Vec<EmployeeId> = project(state.collection.snapshot(), &state.query)
                .into_iter()
                .map(|e| e.id.clone())
                .collect();
            state.collection.set_selection(ids);
        } else {
            state.collection.clear_selection();
        }
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.state().query.search = search.into();
    }

    /// Column header click.
    pub fn sort_by(&self, field: EmployeeField) {
        self.state().query.sort.toggle(field);
    }

    // ----- remote operations -----

    /// Initial or user-requested load. Gated by the in-flight flag.
    pub async fn load(&self) -> Result<usize, ActionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return self.fail(ActionError::Busy);
        };
        self.refresh().await
    }

    /// Replace the snapshot with the store's current listing. Returns the
    /// number of records.
    pub async fn refresh(&self) -> Result<usize, ActionError> {
        let records = match self.store.list().await {
            Ok(records) => records,
            Err(e) => return self.fail(ActionError::remote(RemoteAction::Load)(e)),
        };

        let count = records.len();
        let mut state = self.state();
        if state.collection.replace_snapshot(records) {
            state.activity.push(
                LogLevel::Warning,
                "Record removed",
                "The employee being edited no longer exists.",
            );
        }
        tracing::debug!("snapshot replaced ({count} records)");
        Ok(count)
    }

    /// Form submit: update when an edit target is set, add otherwise.
    pub async fn submit(&self) -> Result<SubmitOutcome, ActionError> {
        let editing = self.read(|s| s.collection.edit_target().is_some());
        if editing {
            self.update().await.map(SubmitOutcome::Updated)
        } else {
            self.add().await.map(SubmitOutcome::Added)
        }
    }

    pub async fn add(&self) -> Result<Employee, ActionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return self.fail(ActionError::Busy);
        };
        let draft = match self.read(|s| s.form.validate()) {
            Ok(draft) => draft,
            Err(e) => return self.fail(e.into()),
        };

        let inserted = match self.store.insert(&draft).await {
            Ok(employee) => employee,
            Err(e) => return self.fail(ActionError::remote(RemoteAction::Add)(e)),
        };

        self.notify(LogLevel::Success, "Success", "Employee added successfully!");
        {
            let mut state = self.state();
            state.collection.set_edit_target(None);
            state.form.clear();
        }
        // The insert stands even if the listing fails; refresh reports it.
        let _ = self.refresh().await;
        Ok(inserted)
    }

    pub async fn update(&self) -> Result<EmployeeId, ActionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return self.fail(ActionError::Busy);
        };
        let prepared = self.read(|s| {
            let target = s
                .collection
                .edit_target()
                .ok_or(SelectionError::NoEditTarget)?;
            let draft = s.form.validate()?;
            Ok::<_, ActionError>((target.id.clone(), draft))
        });
        let (id, draft) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => return self.fail(e),
        };

        let patch = EmployeePatch::from_draft(draft, Utc::now());
        if let Err(e) = self.store.update(&id, &patch).await {
            return self.fail(ActionError::remote(RemoteAction::Update)(e));
        }

        self.notify(LogLevel::Success, "Success", "Employee updated successfully!");
        {
            let mut state = self.state();
            state.collection.set_edit_target(None);
            state.form.clear();
        }
        let _ = self.refresh().await;
        Ok(id)
    }

    /// Delete every selected record in one call, after confirmation.
    pub async fn delete_selected(&self) -> Result<DeleteOutcome, ActionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return self.fail(ActionError::Busy);
        };
        let ids = self.selection();
        if ids.is_empty() {
            return self.fail(SelectionError::Empty.into());
        }

        if !self.confirm.confirm(&delete_prompt(ids.len())) {
            tracing::debug!("delete of {} declined", ids.len());
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = self.store.delete_many(&ids).await {
            return self.fail(ActionError::remote(RemoteAction::Delete)(e));
        }

        self.notify(
            LogLevel::Success,
            "Success",
            &format!("{} deleted successfully!", employees(ids.len())),
        );
        {
            let mut state = self.state();
            state.collection.clear_selection();
            if state.collection.edit_target().is_some() {
                state.collection.set_edit_target(None);
                state.form.clear();
            }
        }
        let _ = self.refresh().await;
        Ok(DeleteOutcome::Deleted(ids.len()))
    }

    /// Trigger the email webhook for the single selected record.
    ///
    /// `Ok` means the request was dispatched, not that it was delivered.
    pub async fn send_email(&self) -> Result<Dispatched, ActionError> {
        let Some(_guard) = self.busy.try_acquire() else {
            return self.fail(ActionError::Busy);
        };
        let selected: Vec<Employee> = self.read(|s| {
            s.collection
                .selected_records()
                .into_iter()
                .cloned()
                .collect()
        });
        let [employee] = selected.as_slice() else {
            return self.fail(
                SelectionError::ExpectedExactlyOne {
                    selected: selected.len(),
                }
                .into(),
            );
        };

        let request = EmailRequest::for_employee(employee, Utc::now(), &self.origin);
        match self.mailer.send(&request).await {
            Ok(receipt) => {
                self.notify(
                    LogLevel::Success,
                    "Email Sent",
                    &format!(
                        "Email request sent for {}. Please check your automation workflow to confirm delivery.",
                        employee.name
                    ),
                );
                Ok(receipt)
            }
            Err(e) => self.fail(e.into()),
        }
    }
}
