//! Pattern cache: bounded, insertion-ordered store of synthesis results.
//!
//! Growth is hysteretic: the cache may reach `soft_ceiling` entries, and the
//! insert that crosses it trims the oldest entries down to `trim_target` in
//! one pass. Insertion order lives in a slot ring of `(sequence, key)`
//! pairs; a hash index maps each key to its live sequence, so a re-put key
//! leaves a stale slot behind that is skipped and compacted lazily.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCacheEntry {
    pub key: String,
    pub synthesis_type: String,
    pub payload: Value,
}

#[derive(Debug, Default)]
struct CacheInner {
    slots: VecDeque<(u64, String)>,
    index: HashMap<String, (u64, PatternCacheEntry)>,
    next_seq: u64,
}

impl CacheInner {
    fn is_live(&self, seq: u64, key: &str) -> bool {
        self.index.get(key).is_some_and(|(live, _)| *live == seq)
    }

    fn trim_to(&mut self, target: usize) -> usize {
        let mut removed = 0;
        while self.index.len() > target {
            let Some((seq, key)) = self.slots.pop_front() else {
                break;
            };
            if self.is_live(seq, &key) {
                self.index.remove(&key);
                removed += 1;
            }
        }
        removed
    }

    fn compact(&mut self) {
        let index = &self.index;
        self.slots
            .retain(|(seq, key)| index.get(key).is_some_and(|(live, _)| live == seq));
    }

    fn newest_first(&self) -> impl Iterator<Item = &PatternCacheEntry> {
        self.slots
            .iter()
            .rev()
            .filter_map(|(seq, key)| match self.index.get(key) {
                Some((live, entry)) if live == seq => Some(entry),
                _ => None,
            })
    }
}

#[derive(Debug)]
pub struct PatternCache {
    inner: Mutex<CacheInner>,
    soft_ceiling: usize,
    trim_target: usize,
}

impl PatternCache {
    pub fn new(soft_ceiling: usize, trim_target: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            soft_ceiling,
            trim_target: trim_target.min(soft_ceiling),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Insert at the newest end. Re-putting a key moves it to the newest end.
    pub fn put(&self, key: impl Into<String>, synthesis_type: impl Into<String>, payload: Value) {
        let key = key.into();
        let entry = PatternCacheEntry {
            key: key.clone(),
            synthesis_type: synthesis_type.into(),
            payload,
        };

        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.index.insert(key.clone(), (seq, entry));
        inner.slots.push_back((seq, key));

        if inner.index.len() > self.soft_ceiling {
            let removed = inner.trim_to(self.trim_target);
            tracing::debug!(removed, remaining = inner.index.len(), "pattern_cache.trim");
        }
        if inner.slots.len() > inner.index.len().saturating_mul(2) + 16 {
            inner.compact();
        }
    }

    /// Up to `limit` payloads, newest first, optionally restricted to one
    /// synthesis type.
    pub fn get_recent(&self, synthesis_type: Option<&str>, limit: usize) -> Vec<Value> {
        let inner = self.lock();
        inner
            .newest_first()
            .filter(|entry| synthesis_type.is_none_or(|t| entry.synthesis_type == t))
            .take(limit)
            .map(|entry| entry.payload.clone())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<PatternCacheEntry> {
        self.lock().index.get(key).map(|(_, entry)| entry.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
