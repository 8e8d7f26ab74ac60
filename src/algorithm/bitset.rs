use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset of prototype indices still possible at one cell
///
/// Indices are 0-based prototype ids. Membership tests and updates are O(1);
/// out-of-range ids are never members and are ignored on update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSet {
    bits: BitVec,
}

impl OptionSet {
    /// Create a set with no prototypes present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Create a set containing every prototype
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: bitvec![1; capacity],
        }
    }

    /// Create a set holding only `prototype`
    pub fn singleton(capacity: usize, prototype: usize) -> Self {
        let mut set = Self::new(capacity);
        set.insert(prototype);
        set
    }

    /// Number of prototypes this set can describe
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Add a prototype
    pub fn insert(&mut self, prototype: usize) {
        if prototype < self.bits.len() {
            self.bits.set(prototype, true);
        }
    }

    /// Remove a prototype, returning whether it was present
    pub fn remove(&mut self, prototype: usize) -> bool {
        let present = self.contains(prototype);
        if present {
            self.bits.set(prototype, false);
        }
        present
    }

    /// Test prototype membership
    pub fn contains(&self, prototype: usize) -> bool {
        self.bits.get(prototype).as_deref() == Some(&true)
    }

    /// Replace the contents with exactly `prototype`
    pub fn collapse_to(&mut self, prototype: usize) {
        self.bits.fill(false);
        self.insert(prototype);
    }

    /// Test if no prototypes are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count prototypes in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// The only member, if the set holds exactly one prototype
    pub fn single(&self) -> Option<usize> {
        let mut ones = self.bits.iter_ones();
        match (ones.next(), ones.next()) {
            (Some(prototype), None) => Some(prototype),
            _ => None,
        }
    }

    /// Iterate members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all members as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionSet({} options: {:?})", self.count(), self.to_vec())
    }
}
