//! Note collections.

use crate::note::{Note, NoteId};
use serde::{Deserialize, Serialize};

/// A set of notes held by one party at one point in time.
///
/// Serialized as a plain JSON array. Collections produced by
/// [`reconcile`](crate::reconcile) have unique ids; collections built from
/// client or disk input are not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    notes: Vec<Note>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if there are no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Iterates over the notes.
    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    /// Returns the first note with the given id.
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// Iterates over the ids in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &NoteId> {
        self.notes.iter().map(|note| &note.id)
    }

    /// Returns the notes as a slice.
    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    /// Consumes the collection, returning the notes.
    pub fn into_vec(self) -> Vec<Note> {
        self.notes
    }
}

impl From<Vec<Note>> for Collection {
    fn from(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

impl FromIterator<Note> for Collection {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Note;
    type IntoIter = std::vec::IntoIter<Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_array() {
        let collection = Collection::from(vec![Note::new(1, 5), Note::new("b", 6)]);
        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!([{"id": 1, "updatedAt": 5}, {"id": "b", "updatedAt": 6}])
        );
    }

    #[test]
    fn deserialize_rejects_object() {
        assert!(serde_json::from_value::<Collection>(json!({"id": 1})).is_err());
    }

    #[test]
    fn lookup_by_id() {
        let collection: Collection = vec![Note::new(1, 5), Note::new(2, 6)].into_iter().collect();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(&NoteId::Int(2)).unwrap().updated_at, 6.into());
        assert!(collection.get(&NoteId::Int(3)).is_none());
        assert_eq!(
            collection.ids().cloned().collect::<Vec<_>>(),
            vec![NoteId::Int(1), NoteId::Int(2)]
        );
    }

    #[test]
    fn empty_collection() {
        let collection = Collection::new();
        assert!(collection.is_empty());
        assert_eq!(serde_json::to_string(&collection).unwrap(), "[]");
    }
}
