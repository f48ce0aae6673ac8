//! Ordered registration list shared by the filter and sort stages.
//!
//! Entries keep insertion order and may repeat. Lookup and removal go through
//! `PartialEq`, which for callable handles is reference identity.

#[derive(Debug, Clone)]
pub struct Registry<E> {
    entries: Vec<E>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Registry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: E) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entries
    }
}

impl<E: PartialEq> Registry<E> {
    pub fn contains(&self, entry: &E) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Remove the first matching entry. Returns whether one was found.
    pub fn remove_first(&mut self, entry: &E) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }
}
