use crate::entry::Entry;
use std::slice;

/// Ordered sequence of directory entries.
///
/// A list holds entries in directory read order until
/// [`sort_by_name`](Self::sort_by_name) is called. The merge-join downstream
/// walks two lists linearly with one cursor each, so both sides must have
/// been sorted with the same comparison before they meet; the differ itself
/// never reorders a list.
#[derive(Debug, Default)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry in amortized constant time.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Sorts entries in place by byte-wise lexicographic file name.
    ///
    /// The standard library sort is a stable merge sort. Names are unique
    /// within one directory listing, so ties cannot occur in practice.
    pub fn sort_by_name(&mut self) {
        self.entries
            .sort_by(|a, b| a.name().as_encoded_bytes().cmp(b.name().as_encoded_bytes()));
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in their current order.
    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Releases all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
