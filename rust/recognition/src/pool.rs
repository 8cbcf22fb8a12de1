// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate storage with stable keys.
//!
//! Merging and span resolution remove candidates while iterating over them.
//! The pool hands out generational keys that stay valid across removals, so
//! loops hold keys instead of indices and never shift under themselves.
//! Iteration follows insertion order.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key for a candidate in a [`CandidatePool`].
    pub struct CandidateKey;
}

/// Insertion-ordered arena of candidates
#[derive(Debug, Clone)]
pub struct CandidatePool<T> {
    items: SlotMap<CandidateKey, T>,
    order: Vec<CandidateKey>,
}

impl<T> Default for CandidatePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CandidatePool<T> {
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> CandidateKey {
        let key = self.items.insert(item);
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: CandidateKey) -> Option<T> {
        let item = self.items.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(item)
    }

    pub fn get(&self, key: CandidateKey) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: CandidateKey) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    pub fn contains(&self, key: CandidateKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Live keys in insertion order, detached from the pool so the caller
    /// may remove while walking them.
    pub fn keys(&self) -> Vec<CandidateKey> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateKey, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |k| self.items.get(*k).map(|item| (*k, item)))
    }

    /// Remaining candidates in insertion order.
    pub fn into_vec(mut self) -> Vec<T> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|k| self.items.remove(k))
            .collect()
    }
}

impl<T> FromIterator<T> for CandidatePool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pool = Self::new();
        for item in iter {
            pool.insert(item);
        }
        pool
    }
}
