//! Indexed max-heap keyed by file name.

use std::collections::HashMap;

use serde::Serialize;

use crate::rank::error::{RankError, RankResult};

/// A file name and its ranking key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry<K> {
    pub name: String,
    pub key: K,
}

/// Max-heap over `(name, key)` pairs with O(log n) update by name.
///
/// `slots` maps every name to its position in `heap` and is kept in step
/// with every swap. Entries with equal keys come out in whatever order the
/// heap holds them.
#[derive(Debug, Clone)]
pub struct RankIndex<K> {
    heap: Vec<RankEntry<K>>,
    slots: HashMap<String, usize>,
}

impl<K: Ord + Clone> RankIndex<K> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Current key for `name`.
    pub fn get(&self, name: &str) -> Option<&K> {
        self.slots.get(name).map(|&slot| &self.heap[slot].key)
    }

    /// Insert `name` with `key`, or move an existing entry to `key`.
    pub fn upsert(&mut self, name: &str, key: K) {
        match self.slots.get(name).copied() {
            Some(slot) => {
                self.heap[slot].key = key;
                let slot = sift_up(&mut self.heap, &mut self.slots, slot);
                sift_down(&mut self.heap, &mut self.slots, slot);
            }
            None => {
                let slot = self.heap.len();
                self.heap.push(RankEntry {
                    name: name.to_string(),
                    key,
                });
                self.slots.insert(name.to_string(), slot);
                sift_up(&mut self.heap, &mut self.slots, slot);
            }
        }
    }

    /// Remove `name` and return its key. Absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<K> {
        let slot = self.slots.remove(name)?;
        let last = self.heap.len() - 1;
        if slot != last {
            self.heap.swap(slot, last);
            self.slots.moved(&self.heap[slot].name, slot);
        }
        let removed = self.heap.pop()?;

        if slot < self.heap.len() {
            let slot = sift_up(&mut self.heap, &mut self.slots, slot);
            sift_down(&mut self.heap, &mut self.slots, slot);
        }
        Some(removed.key)
    }

    /// The `k` entries with the largest keys, largest first.
    ///
    /// Works on a copy of the heap; the index itself is left untouched.
    /// Asking for more entries than exist is an error rather than a clamp.
    pub fn top_k(&self, k: usize) -> RankResult<Vec<RankEntry<K>>> {
        if k > self.heap.len() {
            return Err(RankError::KExceedsSize {
                requested: k,
                available: self.heap.len(),
            });
        }

        let mut scratch = self.heap.clone();
        let mut out = Vec::with_capacity(k);
        for _ in 0..k {
            let last = scratch.len() - 1;
            scratch.swap(0, last);
            if let Some(top) = scratch.pop() {
                out.push(top);
            }
            sift_down(&mut scratch, &mut (), 0);
        }
        Ok(out)
    }

    /// Every entry, largest key first.
    pub fn all(&self) -> Vec<RankEntry<K>> {
        // k == len never exceeds the size
        self.top_k(self.len()).unwrap_or_default()
    }

    /// Check the heap order and the slot map. Used by tests.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.heap.len(), self.slots.len());
        for (slot, entry) in self.heap.iter().enumerate() {
            assert_eq!(self.slots.get(&entry.name), Some(&slot));
            if slot > 0 {
                assert!(self.heap[parent(slot)].key >= entry.key);
            }
        }
    }
}

impl<K: Ord + Clone> Default for RankIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives slot changes as entries move inside the heap.
trait SlotTracker {
    fn moved(&mut self, name: &str, slot: usize);
}

impl SlotTracker for HashMap<String, usize> {
    fn moved(&mut self, name: &str, slot: usize) {
        if let Some(s) = self.get_mut(name) {
            *s = slot;
        }
    }
}

// scratch heaps in `top_k` have nothing to track
impl SlotTracker for () {
    fn moved(&mut self, _name: &str, _slot: usize) {}
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn swap<K, T: SlotTracker>(heap: &mut [RankEntry<K>], slots: &mut T, a: usize, b: usize) {
    heap.swap(a, b);
    slots.moved(&heap[a].name, a);
    slots.moved(&heap[b].name, b);
}

/// Move the entry at `i` towards the root; returns where it ended up.
fn sift_up<K: Ord, T: SlotTracker>(
    heap: &mut [RankEntry<K>],
    slots: &mut T,
    mut i: usize,
) -> usize {
    while i > 0 {
        let p = parent(i);
        if heap[i].key <= heap[p].key {
            break;
        }
        swap(heap, slots, i, p);
        i = p;
    }
    i
}

/// Move the entry at `i` towards the leaves; returns where it ended up.
fn sift_down<K: Ord, T: SlotTracker>(
    heap: &mut [RankEntry<K>],
    slots: &mut T,
    mut i: usize,
) -> usize {
    loop {
        let left = 2 * i + 1;
        let right = left + 1;
        let mut largest = i;

        if left < heap.len() && heap[left].key > heap[largest].key {
            largest = left;
        }
        if right < heap.len() && heap[right].key > heap[largest].key {
            largest = right;
        }
        if largest == i {
            return i;
        }
        swap(heap, slots, i, largest);
        i = largest;
    }
}
