//! Growable ordered container backing every list in a suite tree.

use std::ops::{Deref, DerefMut};

/// Number of slots allocated by a freshly created array.
pub const INITIAL_CAPACITY: usize = 4;

/// An ordered, growable array with geometric growth.
///
/// Capacity starts at [`INITIAL_CAPACITY`] and doubles whenever a push finds the
/// array full, so a sequence of pushes costs amortized constant time. Allocation
/// failure is not recoverable: the global allocator aborts the process.
///
/// Read access (indexing, iteration, `len`) goes through the slice the array
/// dereferences to.
#[derive(Clone)]
pub struct DynArray<T> {
    values: Vec<T>,
    capacity: usize,
}

impl<T> DynArray<T> {
    /// Creates an empty array with the initial capacity.
    pub fn new() -> Self {
        Self {
            values: Vec::with_capacity(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
        }
    }

    /// Appends an item to the end of the array, doubling capacity if full.
    ///
    /// # Arguments
    ///
    /// * `item` - The item to append.
    pub fn push(&mut self, item: T) -> &mut Self {
        if self.values.len() == self.capacity {
            self.capacity = self.capacity.saturating_mul(2);
            self.values.reserve_exact(self.capacity - self.values.len());
        }

        self.values.push(item);
        self
    }

    /// Removes and returns the last item, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.values.pop()
    }

    /// Returns a reference to the last item without removing it.
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// Returns the number of items the array can hold before it grows again.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_array_has_default_capacity() {
        let arr: DynArray<&str> = DynArray::new();
        assert_eq!(arr.capacity(), 4);
        assert_eq!(arr.len(), 0);
        assert!(arr.is_empty());
    }

    #[test]
    fn push_appends_to_the_end() {
        let mut arr = DynArray::new();
        arr.push("foo").push("bar");
        assert_eq!(arr.as_slice(), &["foo", "bar"]);
    }

    #[test]
    fn last_peeks_without_removing() {
        let mut arr = DynArray::new();
        arr.push("foo");
        assert_eq!(arr.last(), Some(&"foo"));
        assert_eq!(arr.len(), 1);
    }

    #[test]
    fn pop_removes_from_the_end() {
        let mut arr = DynArray::new();
        arr.push("foo").push("bar");
        assert_eq!(arr.pop(), Some("bar"));
        assert_eq!(arr.last(), Some(&"foo"));
    }

    #[test]
    fn pop_and_last_on_empty_array() {
        let mut arr: DynArray<u32> = DynArray::new();
        assert_eq!(arr.pop(), None);
        assert_eq!(arr.last(), None);
    }

    #[test]
    fn capacity_doubles_when_full() {
        let mut arr = DynArray::new();
        for item in ["1", "2", "3", "4"] {
            arr.push(item);
        }
        assert_eq!(arr.capacity(), 4);

        arr.push("5");
        assert_eq!(arr.capacity(), 8);
        assert_eq!(arr.len(), 5);

        arr.extend(["6", "7", "8", "9"]);
        assert_eq!(arr.capacity(), 16);
    }

    #[test]
    fn collects_from_iterator() {
        let arr: DynArray<u32> = (1..=3).collect();
        assert_eq!(arr.iter().sum::<u32>(), 6);
        assert_eq!(arr.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
