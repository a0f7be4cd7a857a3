//! # Local collection state
//!
//! [`Collection`] is the client's mirror of the remote table: the last
//! snapshot returned by `list()`, the ids the user has ticked, and the record
//! (if any) currently loaded into the form for editing.
//!
//! The snapshot is only ever replaced wholesale. On every replacement the
//! selection is intersected with the new snapshot's ids, and an edit target
//! whose record disappeared is dropped, so nothing here can point at a
//! record that no longer exists.

use std::collections::HashSet;

use store::{Employee, EmployeeId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    snapshot: Vec<Employee>,
    // Insertion order, no duplicates.
    selection: Vec<EmployeeId>,
    edit_target: Option<Employee>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[Employee] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&Employee> {
        self.snapshot.iter().find(|e| &e.id == id)
    }

    /// Swap in a fresh snapshot.
    ///
    /// Returns true when the edit target was dropped because its record is
    /// gone.
    pub fn replace_snapshot(&mut self, records: Vec<Employee>) -> bool {
        let ids: HashSet<&EmployeeId> = records.iter().map(|e| &e.id).collect();
        self.selection.retain(|id| ids.contains(id));

        let edit_lost = matches!(&self.edit_target, Some(t) if !ids.contains(&t.id));
        if edit_lost {
            self.edit_target = None;
        }

        self.snapshot = records;
        edit_lost
    }

    pub fn selection(&self) -> &[EmployeeId] {
        &self.selection
    }

    /// Selected records, in selection order.
    pub fn selected_records(&self) -> Vec<&Employee> {
        self.selection.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn is_selected(&self, id: &EmployeeId) -> bool {
        self.selection.contains(id)
    }

    /// Replace the selection. Ids not in the snapshot are ignored, duplicates
    /// collapse.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = EmployeeId>,
    {
        self.selection.clear();
        for id in ids {
            if self.get(&id).is_some() && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Tick or untick a single row.
    pub fn set_selected(&mut self, id: &EmployeeId, checked: bool) {
        if checked {
            if self.get(id).is_some() && !self.is_selected(id) {
                self.selection.push(id.clone());
            }
        } else {
            self.selection.retain(|s| s != id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn edit_target(&self) -> Option<&Employee> {
        self.edit_target.as_ref()
    }

    /// Replace the edit target; `None` clears it.
    pub fn set_edit_target(&mut self, target: Option<Employee>) {
        self.edit_target = target;
    }
}
