//! # Pie Records
//!
//! The single entity served by this crate. A pie has a repository-assigned
//! numeric id and an arbitrary set of client-supplied fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier assigned by the repository at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieId(u64);

impl PieId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is used up.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(PieId)
    }
}

/// Client-supplied descriptive fields of a pie.
///
/// Any `id` key is dropped on construction; identity belongs to the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct PieFields(Map<String, Value>);

impl PieFields {
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite this record's fields key by key with `changes`.
    pub fn merge(&mut self, changes: PieFields) {
        for (key, value) in changes.0 {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for PieFields {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// A stored pie: `{ "id": 1, "name": "Apple", ... }` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pie {
    pub id: PieId,
    #[serde(flatten)]
    pub fields: PieFields,
}

impl Pie {
    pub fn new(id: PieId, fields: PieFields) -> Self {
        Self { id, fields }
    }

    /// The `name` field, when present as a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

/// Search criteria taken from `?id=&name=`.
///
/// `id` matches by numeric equality; `name` is a case-insensitive substring
/// match. Absent or blank criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PieFilter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PieFilter {
    pub fn matches(&self, pie: &Pie) -> bool {
        self.matches_id(pie) && self.matches_name(pie)
    }

    fn matches_id(&self, pie: &Pie) -> bool {
        match non_blank(&self.id) {
            None => true,
            Some(raw) => raw.parse::<PieId>().map(|id| id == pie.id).unwrap_or(false),
        }
    }

    fn matches_name(&self, pie: &Pie) -> bool {
        match non_blank(&self.name) {
            None => true,
            Some(needle) => pie
                .name()
                .map(|name| name.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
