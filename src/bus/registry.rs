//! Registry mapping a message kind to its handlers.
//!
//! The registry itself enforces no cardinality; the command and event bus
//! builders decide how many handlers a kind may have. Once a builder is
//! turned into a bus the registry is only ever read.

use std::collections::HashMap;
use std::hash::Hash;

/// Kind → handlers mapping.
#[derive(Debug)]
pub struct Registry<K, H> {
    entries: HashMap<K, Vec<H>>,
}

impl<K: Eq + Hash + Copy, H> Registry<K, H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Records a handler under a kind.
    pub fn subscribe(&mut self, kind: K, handler: H) {
        self.entries.entry(kind).or_default().push(handler);
    }

    /// Returns the handlers registered for a kind, empty if there are none.
    pub fn resolve(&self, kind: &K) -> &[H] {
        self.entries.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds with at least one handler.
    pub fn kinds(&self) -> Vec<K> {
        self.entries.keys().copied().collect()
    }

    /// Total number of registered handlers across all kinds.
    pub fn handler_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Copy, H> Default for Registry<K, H> {
    fn default() -> Self {
        Self::new()
    }
}
