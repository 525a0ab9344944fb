// In-memory comic store.
// A number-keyed map with whole-store JSON serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::comic::types::Comic;

/// In-memory cache of comics keyed by number.
///
/// Serializes as a single JSON object mapping each number to its comic, so
/// the persisted form is exactly the in-memory contents. The map only ever
/// mutates through one owner; during a build pass that owner is the
/// aggregation loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComicStore {
    comics: BTreeMap<u32, Comic>,
}

impl ComicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a comic. An absent number is a normal miss, not an error.
    pub fn get(&self, num: u32) -> Option<&Comic> {
        self.comics.get(&num)
    }

    /// Insert a comic under its own number, returning any displaced entry.
    pub fn insert(&mut self, comic: Comic) -> Option<Comic> {
        self.comics.insert(comic.num, comic)
    }

    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }

    /// Iterate comics in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = &Comic> {
        self.comics.values()
    }

    /// Comics whose title or transcript contains `term`, case-insensitively,
    /// in ascending number order.
    pub fn search(&self, term: &str) -> Vec<&Comic> {
        let needle = term.to_lowercase();
        self.comics
            .values()
            .filter(|comic| {
                comic.title.to_lowercase().contains(&needle)
                    || comic.transcript.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Serialize the whole store to JSON bytes.
    pub fn serialize(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Reconstruct a store from bytes produced by [`ComicStore::serialize`].
    pub fn deserialize(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
