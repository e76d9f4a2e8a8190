use std::collections::BTreeSet;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Session category, read from the comma-separated suffix of a cell's first
/// line ("wyk", "lab", ...). Anything unrecognized lands in `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Lecture,
    Lab,
    Project,
    Practical,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekParity {
    Odd,
    Even,
    Every,
}

/// One structured session decoded from a positioned grid cell.
///
/// The derived equality (and hash) over all fields is the content equality
/// used for reconciliation — the source grid has no stable identifiers, so
/// two facts with the same fields are the same course. `teachers` and `rooms`
/// are sets; ordering never participates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseFact {
    pub schedule_id: String,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub name: String,
    pub category: Category,
    pub teachers: BTreeSet<String>,
    pub rooms: BTreeSet<String>,
    pub day_of_week: Weekday,
    pub week_parity: WeekParity,
    pub note: Option<String>,
}

/// A course as held by the caller's storage layer: a fact plus the
/// storage-assigned id. The id is deliberately outside content equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCourse {
    pub id: i64,
    #[serde(flatten)]
    pub fact: CourseFact,
}

/// Ephemeral instruction set for one schedule: create these, delete those,
/// touch nothing else. Never persisted itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub to_create: Vec<CourseFact>,
    pub to_delete: Vec<StoredCourse>,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}
