//! # Domain models for the employee directory
//!
//! Defines the records exchanged with the remote store and mirrored in the
//! client's local snapshot. Every type is `Serialize + Deserialize` so it can
//! cross the HTTP boundary unchanged.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Employee`] | A persisted record. Always carries a server-assigned [`EmployeeId`]; records without an id never reach the snapshot. |
//! | [`EmployeeDraft`] | The insert payload: the four editable text fields and nothing else. |
//! | [`EmployeePatch`] | A partial update. Only present fields are serialised, plus a fresh `updated_at` stamp. |
//! | [`EmployeeField`] | Column selector used by search, sort and form editing. |
//! | [`ChangeEvent`] | One server-side change notification delivered by a change feed. |

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, server-assigned record identity.
///
/// The hosted backend may key rows by integer or by UUID; both deserialise
/// into the same string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => EmployeeId(s),
            RawId::Int(n) => EmployeeId(n.to_string()),
        })
    }
}

/// An employee record as held by the remote store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub emp_num: String,
    pub phone_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// Text rendering of a column, as used for searching and sorting.
    /// Missing timestamps render as the empty string.
    pub fn text(&self, field: EmployeeField) -> Cow<'_, str> {
        match field {
            EmployeeField::Name => Cow::Borrowed(&self.name),
            EmployeeField::Email => Cow::Borrowed(&self.email),
            EmployeeField::EmpNum => Cow::Borrowed(&self.emp_num),
            EmployeeField::PhoneNo => Cow::Borrowed(&self.phone_no),
            EmployeeField::CreatedAt => timestamp_text(self.created_at),
            EmployeeField::UpdatedAt => timestamp_text(self.updated_at),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &EmployeePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(emp_num) = &patch.emp_num {
            self.emp_num = emp_num.clone();
        }
        if let Some(phone_no) = &patch.phone_no {
            self.phone_no = phone_no.clone();
        }
        if patch.updated_at.is_some() {
            self.updated_at = patch.updated_at;
        }
    }

    /// The editable part of the record.
    pub fn draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            emp_num: self.emp_num.clone(),
            phone_no: self.phone_no.clone(),
        }
    }
}

fn timestamp_text(ts: Option<DateTime<Utc>>) -> Cow<'static, str> {
    match ts {
        Some(ts) => Cow::Owned(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
        None => Cow::Borrowed(""),
    }
}

/// A record that has not been persisted yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub emp_num: String,
    pub phone_no: String,
}

/// Partial update sent for an existing record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emp_num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmployeePatch {
    /// Replace all four text fields and stamp `updated_at`.
    pub fn from_draft(draft: EmployeeDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: Some(draft.name),
            email: Some(draft.email),
            emp_num: Some(draft.emp_num),
            phone_no: Some(draft.phone_no),
            updated_at: Some(updated_at),
        }
    }
}

/// Column selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    Name,
    Email,
    EmpNum,
    PhoneNo,
    CreatedAt,
    UpdatedAt,
}

impl EmployeeField {
    /// Fields matched by the free-text search box.
    pub const SEARCHABLE: [EmployeeField; 4] = [
        EmployeeField::Name,
        EmployeeField::Email,
        EmployeeField::EmpNum,
        EmployeeField::PhoneNo,
    ];

    /// Column name in the backing table.
    pub fn column(self) -> &'static str {
        match self {
            EmployeeField::Name => "name",
            EmployeeField::Email => "email",
            EmployeeField::EmpNum => "emp_num",
            EmployeeField::PhoneNo => "phone_no",
            EmployeeField::CreatedAt => "created_at",
            EmployeeField::UpdatedAt => "updated_at",
        }
    }
}

/// What kind of change a feed observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Something changed but the feed cannot say what (e.g. a polling feed).
    Resync,
}

/// A server-side change notification. Consumers treat every event as
/// "refetch the full list"; the payload is informational.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: Option<EmployeeId>,
}

impl ChangeEvent {
    pub fn row(kind: ChangeKind, id: EmployeeId) -> Self {
        Self { kind, id: Some(id) }
    }

    pub fn resync() -> Self {
        Self {
            kind: ChangeKind::Resync,
            id: None,
        }
    }
}
