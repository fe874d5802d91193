//! A BSON document represented as an insertion-ordered map.

use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    iter::FromIterator,
};

use crate::bson::Bson;

/// A BSON document: an ordered collection of unique string keys mapped to [`Bson`] values.
///
/// Iteration follows insertion order. Overwriting an existing key keeps its position; inserting a
/// new key appends it.
#[derive(Clone, Default)]
pub struct Document {
    entries: Vec<(String, Bson)>,
    index: HashMap<String, usize>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Document {
        Document::default()
    }

    /// Returns the number of elements in the document.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document contains no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Bson> {
        self.index
            .get(key.as_ref())
            .map(|&position| &self.entries[position].1)
    }

    /// Gets a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut Bson> {
        match self.index.get(key.as_ref()) {
            Some(&position) => Some(&mut self.entries[position].1),
            None => None,
        }
    }

    /// Returns true if the document contains a value for the specified key.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.index.contains_key(key.as_ref())
    }

    /// Sets the value of the entry with the key, returning the previous value if there was one.
    ///
    /// An existing key keeps its position in the document; a new key is appended.
    pub fn insert<KT: Into<String>, BT: Into<Bson>>(&mut self, key: KT, val: BT) -> Option<Bson> {
        let key = key.into();
        let val = val.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, val)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, val));
                None
            }
        }
    }

    /// Removes the entry with the key, returning its value. The remaining entries keep their
    /// relative order.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Bson> {
        let position = self.index.remove(key.as_ref())?;
        let (_, value) = self.entries.remove(position);
        for (_, shifted) in self.index.iter_mut() {
            if *shifted > position {
                *shifted -= 1;
            }
        }
        Some(value)
    }

    /// Overwrites the entries of this document with the entries of `other`, key by key.
    pub fn merge(&mut self, other: Document) {
        self.extend(other);
    }

    /// Gets an iterator over the keys in insertion order.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.entries.iter(),
        }
    }

    /// Gets an iterator over the values in insertion order.
    pub fn values(&self) -> Values<'_> {
        Values {
            inner: self.entries.iter(),
        }
    }

    /// Gets an iterator over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns the first key of the document, if any.
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(key, _)| key.as_str())
    }

    /// Returns the string value for the key, if present and a string.
    pub fn get_str(&self, key: impl AsRef<str>) -> Option<&str> {
        match self.get(key) {
            Some(Bson::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the embedded document for the key, if present and a document.
    pub fn get_document(&self, key: impl AsRef<str>) -> Option<&Document> {
        match self.get(key) {
            Some(Bson::Document(doc)) => Some(doc),
            _ => None,
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Document(")?;
        f.debug_map().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Bson::Document(self.clone()).into_relaxed_extjson())
    }
}

impl<K: Into<String>, V: Into<Bson>> Extend<(K, V)> for Document {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<Bson>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = std::vec::IntoIter<(String, Bson)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Bson);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over a document's entries.
#[derive(Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Bson)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a String, &'a Bson);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// An iterator over a document's keys.
#[derive(Clone)]
pub struct Keys<'a> {
    inner: std::slice::Iter<'a, (String, Bson)>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

/// An iterator over a document's values.
#[derive(Clone)]
pub struct Values<'a> {
    inner: std::slice::Iter<'a, (String, Bson)>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Bson;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
