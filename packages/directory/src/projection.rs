//! # View projection: search and sort
//!
//! Derives the rows actually displayed from a snapshot, a search string and a
//! sort state. The snapshot is borrowed, never reordered: [`project`] returns
//! references in display order.
//!
//! ## Search
//!
//! Case-insensitive substring match against name, email, employee number and
//! phone number; a row is kept when any of the four matches. The empty
//! string keeps every row.
//!
//! ## Sort
//!
//! Rows are ordered by [`collate`] on the chosen column's text (missing
//! values compare as the empty string). The sort is stable and descending
//! order reverses the comparator rather than the output, so rows with equal
//! keys keep their snapshot order in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use store::{Employee, EmployeeField};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column and direction. Defaults to name, ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: EmployeeField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: EmployeeField::Name,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Clicking the active column flips direction; any other column starts
    /// ascending.
    pub fn toggle(&mut self, field: EmployeeField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    /// Direction indicator for a column header, if it is the active one.
    pub fn indicator(&self, field: EmployeeField) -> Option<SortDirection> {
        (self.field == field).then_some(self.direction)
    }
}

/// Everything the projection depends on besides the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortState,
}

impl ViewQuery {
    pub fn matches(&self, employee: &Employee) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        EmployeeField::SEARCHABLE
            .iter()
            .any(|&field| employee.text(field).to_lowercase().contains(&needle))
    }

    pub fn compare(&self, a: &Employee, b: &Employee) -> Ordering {
        let ord = collate(&a.text(self.sort.field), &b.text(self.sort.field));
        match self.sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Filter and sort `records` for display.
pub fn project<'a>(records: &'a [Employee], query: &ViewQuery) -> Vec<&'a Employee> {
    let mut rows: Vec<&Employee> = records.iter().filter(|e| query.matches(e)).collect();
    rows.sort_by(|a, b| query.compare(a, b));
    rows
}

/// Locale-style string comparison.
///
/// Compares accent- and case-folded text first, then accents, then case with
/// lowercase ahead of uppercase, and finally raw code points. At the first
/// level whitespace sorts before punctuation, punctuation before symbols,
/// symbols before digits and digits before letters.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(base_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

/// ASCII punctuation and symbols in root collation order.
const ASCII_MARKS: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn base_key(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(primary_weight)
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(rank) = ASCII_MARKS.find(c) {
        (1, rank as u32)
    } else if c.is_numeric() {
        (3, c.to_digit(10).unwrap_or(c as u32))
    } else if c.is_alphabetic() {
        (4, c as u32)
    } else {
        (2, c as u32)
    }
}

fn accent_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}
