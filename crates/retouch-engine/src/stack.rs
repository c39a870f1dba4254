//! Ordered list of applied effects.
//!
//! The vector is authoritative for render order. A key index maps each
//! [`EffectKey`] to its position so an effect is applied at most once; the
//! index is rebuilt after every structural change.
//!
//! ```rust
//! use retouch_engine::{EffectKey, EffectStack};
//!
//! let mut stack = EffectStack::new();
//! stack.upsert(EffectKey::new("colors", "hue"), Some(30.0));
//! stack.upsert(EffectKey::new("filters", "blur"), Some(5.0));
//! stack.upsert(EffectKey::new("colors", "hue"), Some(-10.0));
//!
//! assert_eq!(stack.len(), 2);
//! assert_eq!(stack.get(0).unwrap().value, Some(-10.0));
//! ```

use crate::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of an effect: category id plus effect id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectKey {
    /// Category id.
    pub category: String,
    /// Effect id.
    pub effect: String,
}

impl EffectKey {
    /// Creates a key.
    pub fn new(category: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            effect: effect.into(),
        }
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.effect)
    }
}

/// One effect in the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    /// Which effect.
    pub key: EffectKey,
    /// Stored parameter; `None` for triggers.
    pub value: Option<f32>,
}

/// Ordered applied effects, at most one per key.
#[derive(Debug, Clone, Default)]
pub struct EffectStack {
    entries: Vec<AppliedEffect>,
    index: HashMap<EffectKey, usize>,
}

impl PartialEq for EffectStack {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl EffectStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a stack from entries in order. Later duplicates overwrite the
    /// value of the first occurrence.
    pub fn from_entries(entries: impl IntoIterator<Item = AppliedEffect>) -> Self {
        let mut stack = Self::new();
        for entry in entries {
            stack.upsert(entry.key, entry.value);
        }
        stack
    }

    /// Sets the value of `key`, appending it if absent. Returns its position.
    pub fn upsert(&mut self, key: EffectKey, value: Option<f32>) -> usize {
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].value = value;
            return pos;
        }
        let pos = self.entries.len();
        self.index.insert(key.clone(), pos);
        self.entries.push(AppliedEffect { key, value });
        pos
    }

    /// Rearranges entries so that new position `i` holds old entry `permutation[i]`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPermutation`] if `permutation` is not a
    /// permutation of `0..len`; the stack is left untouched.
    pub fn reorder(&mut self, permutation: &[usize]) -> EngineResult<()> {
        let len = self.entries.len();
        if permutation.len() != len {
            return Err(EngineError::InvalidPermutation(format!(
                "expected {} positions, got {}",
                len,
                permutation.len()
            )));
        }
        let mut seen = vec![false; len];
        for &p in permutation {
            if p >= len {
                return Err(EngineError::InvalidPermutation(format!(
                    "position {p} out of range for stack of {len}"
                )));
            }
            if std::mem::replace(&mut seen[p], true) {
                return Err(EngineError::InvalidPermutation(format!(
                    "position {p} appears twice"
                )));
            }
        }

        let mut old: Vec<Option<AppliedEffect>> = self.entries.drain(..).map(Some).collect();
        self.entries = permutation
            .iter()
            .filter_map(|&p| old[p].take())
            .collect();
        self.rebuild_index();
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// [`EngineError::IndexOutOfRange`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> EngineResult<AppliedEffect> {
        let len = self.entries.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        let removed = self.entries.remove(index);
        self.rebuild_index();
        Ok(removed)
    }

    /// Position of `key`, if present.
    pub fn position(&self, key: &EffectKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Stored value of `key`. Outer `None` means absent.
    pub fn value_of(&self, key: &EffectKey) -> Option<Option<f32>> {
        self.position(key).map(|pos| self.entries[pos].value)
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&AppliedEffect> {
        self.entries.get(index)
    }

    /// Entries in render order.
    pub fn iter(&self) -> std::slice::Iter<'_, AppliedEffect> {
        self.entries.iter()
    }

    /// Entries in render order.
    pub fn entries(&self) -> &[AppliedEffect] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.key.clone(), pos);
        }
    }
}

impl<'a> IntoIterator for &'a EffectStack {
    type Item = &'a AppliedEffect;
    type IntoIter = std::slice::Iter<'a, AppliedEffect>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
