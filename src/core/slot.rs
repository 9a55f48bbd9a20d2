// This module defines how the planner addresses scalars. A transform of size 2^p works on
// two arrays of the same length: the caller's input array and a scratch array that ends up
// holding the unscaled coefficients. Each recursion level reads one of them and writes the
// other, so the roles alternate with depth (ping-pong). Buffer names the array, Slot is a
// (buffer, index) pair, and SlotSet is a compact bitset of indices used for liveness.

//! Slots, buffers and slot sets.

use std::fmt;

/// One of the two ping-pong arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Buffer {
    /// Caller supplied input array (`X`). Also used as scratch.
    Input,
    /// Work array (`Y`). Holds the unscaled coefficients once a plan has run.
    Work,
}

impl Buffer {
    /// The other buffer.
    pub fn flip(self) -> Self {
        match self {
            Buffer::Input => Buffer::Work,
            Buffer::Work => Buffer::Input,
        }
    }

    /// Conventional array name used by the emitters.
    pub fn name(self) -> &'static str {
        match self {
            Buffer::Input => "X",
            Buffer::Work => "Y",
        }
    }
}

/// A single scalar location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub buffer: Buffer,
    pub index: usize,
}

impl Slot {
    pub const fn new(buffer: Buffer, index: usize) -> Self {
        Self { buffer, index }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.buffer.name(), self.index)
    }
}

/// Bitset over slot indices of a single buffer.
#[derive(Clone, Default)]
pub struct SlotSet {
    words: Vec<u64>,
}

impl SlotSet {
    /// Create an empty set able to hold indices below `capacity` without growing.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
        }
    }

    /// Build a set from indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = Self::default();
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Insert an index, growing as needed. Returns true if it was not present.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / 64, index % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    /// Check membership.
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|w| w & (1u64 << (index % 64)) != 0)
    }

    /// Number of indices in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Set union with another set.
    pub fn union_with(&mut self, other: &SlotSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= *src;
        }
    }

    /// Copy of this set with every index moved up by `offset`.
    pub fn shifted(&self, offset: usize) -> SlotSet {
        self.iter().map(|index| index + offset).collect()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + bit)
            })
        })
    }

    /// Indices collected into a vector, ascending.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Debug for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Equality ignores trailing capacity.
impl PartialEq for SlotSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for SlotSet {}

impl FromIterator<usize> for SlotSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}
