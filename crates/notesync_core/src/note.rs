//! The note record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a note, unique within a collection.
///
/// Clients author ids; the server only compares them. JSON numbers and
/// strings are accepted, and `1` and `"1"` are different ids. Numbers are
/// keyed by value: `1.0` and `1` are the same id and serialize as `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NoteId {
    /// An integer id.
    Int(i64),
    /// Any other numeric id: a fraction, or an integer beyond `i64`.
    Number(Number),
    /// A string id (typically a UUID).
    Text(String),
}

impl NoteId {
    fn from_number(n: Number) -> Self {
        if let Some(i) = n.as_i64() {
            return NoteId::Int(i);
        }
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
            // i64/u64 bounds are powers of two, so these casts are exact
            if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                return NoteId::Int(f as i64);
            }
            if f >= 0.0 && f < u64::MAX as f64 {
                return NoteId::Number(Number::from(f as u64));
            }
        }
        NoteId::Number(n)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(NoteId::from_number(n)),
            Value::String(s) => Ok(NoteId::Text(s)),
            other => Err(serde::de::Error::custom(format!(
                "note id must be a number or a string, got {other}"
            ))),
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Int(n) => write!(f, "{n}"),
            NoteId::Number(n) => write!(f, "{n}"),
            NoteId::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        NoteId::Int(id)
    }
}

impl From<i32> for NoteId {
    fn from(id: i32) -> Self {
        NoteId::Int(i64::from(id))
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        NoteId::Text(id.to_owned())
    }
}

impl From<String> for NoteId {
    fn from(id: String) -> Self {
        NoteId::Text(id)
    }
}

/// The `updatedAt` value of a note.
///
/// The value is kept exactly as the client sent it so it round-trips
/// unchanged; only [`UpdatedAt::recency_cmp`] interprets it.
///
/// # Recency order
///
/// - `Missing` and `Other` rank lowest and equal to each other
/// - any `Number` ranks above them, compared numerically
/// - any `Text` ranks above every number, compared bytewise
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UpdatedAt {
    /// The field was absent.
    #[default]
    Missing,
    /// A JSON number (epoch milliseconds, in practice).
    Number(Number),
    /// A JSON string (an ISO-8601 timestamp, in practice).
    Text(String),
    /// Any other JSON value, including `null`. Never compares as recent.
    Other(Value),
}

impl UpdatedAt {
    /// Returns true if the field was absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, UpdatedAt::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            UpdatedAt::Missing | UpdatedAt::Other(_) => 0,
            UpdatedAt::Number(_) => 1,
            UpdatedAt::Text(_) => 2,
        }
    }

    /// Compares two timestamps by recency.
    pub fn recency_cmp(&self, other: &UpdatedAt) -> Ordering {
        match (self, other) {
            (UpdatedAt::Number(a), UpdatedAt::Number(b)) => compare_numbers(a, b),
            (UpdatedAt::Text(a), UpdatedAt::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Returns true if `self` is strictly more recent than `other`.
    pub fn is_newer_than(&self, other: &UpdatedAt) -> bool {
        self.recency_cmp(other) == Ordering::Greater
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or_default();
    let y = b.as_f64().unwrap_or_default();
    x.total_cmp(&y)
}

impl From<Value> for UpdatedAt {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => UpdatedAt::Number(n),
            Value::String(s) => UpdatedAt::Text(s),
            other => UpdatedAt::Other(other),
        }
    }
}

impl From<i64> for UpdatedAt {
    fn from(millis: i64) -> Self {
        UpdatedAt::Number(Number::from(millis))
    }
}

impl From<i32> for UpdatedAt {
    fn from(millis: i32) -> Self {
        UpdatedAt::from(i64::from(millis))
    }
}

impl From<&str> for UpdatedAt {
    fn from(stamp: &str) -> Self {
        UpdatedAt::Text(stamp.to_owned())
    }
}

impl Serialize for UpdatedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UpdatedAt::Missing => serializer.serialize_none(),
            UpdatedAt::Number(n) => n.serialize(serializer),
            UpdatedAt::Text(s) => serializer.serialize_str(s),
            UpdatedAt::Other(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for UpdatedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(UpdatedAt::from)
    }
}

/// A note as synchronized between clients and the server.
///
/// Only `id` and `updatedAt` are interpreted. Every other field lands in
/// `payload` and is written back untouched, so clients can add fields
/// without a server upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note identity.
    pub id: NoteId,
    /// Last modification time, as authored by the client.
    #[serde(
        rename = "updatedAt",
        default,
        skip_serializing_if = "UpdatedAt::is_missing"
    )]
    pub updated_at: UpdatedAt,
    /// All remaining fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Note {
    /// Creates a note with an empty payload.
    pub fn new(id: impl Into<NoteId>, updated_at: impl Into<UpdatedAt>) -> Self {
        Self {
            id: id.into(),
            updated_at: updated_at.into(),
            payload: Map::new(),
        }
    }

    /// Creates a note without an `updatedAt` field.
    pub fn without_timestamp(id: impl Into<NoteId>) -> Self {
        Self::new(id, UpdatedAt::Missing)
    }

    /// Adds a payload field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Returns a payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}
