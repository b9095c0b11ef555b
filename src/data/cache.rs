//! Memoized dataset loading.
//!
//! Normalized tables are keyed by the SHA-256 of the uploaded bytes together
//! with the config fields that shape loading (column mapping, binary columns
//! and labels, delimiter).  The same upload under the same config is parsed
//! once; a change in either is a new key.
//! Capacity is bounded; the least recently used entry goes first.
//!
//! The cache belongs to one session and is used from one thread.  Sharing it
//! between sessions would need a lock around it, or one cache per session.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config::PipelineConfig;

use super::loader::{LoadError, Upload, load_bytes};
use super::model::Table;

const DEFAULT_CAPACITY: usize = 4;

struct CachedTable {
    table: Arc<Table>,
    name: String,
    last_used: u64,
}

pub struct DatasetCache {
    entries: HashMap<String, CachedTable>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DatasetCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Hex SHA-256 of the raw bytes and the load-relevant config.
    pub fn fingerprint(bytes: &[u8], config: &PipelineConfig) -> String {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, bytes);
        hasher.update((config.column_mapping.len() as u64).to_le_bytes());
        for (raw, label) in &config.column_mapping {
            update_field(&mut hasher, raw.as_bytes());
            update_field(&mut hasher, label.as_bytes());
        }
        hasher.update((config.binary_columns.len() as u64).to_le_bytes());
        for column in &config.binary_columns {
            update_field(&mut hasher, column.as_bytes());
        }
        update_field(&mut hasher, config.binary_labels.yes.as_bytes());
        update_field(&mut hasher, config.binary_labels.no.as_bytes());
        hasher.update(u32::from(config.delimiter).to_le_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Return the cached table for `upload`, loading it on a miss.
    ///
    /// `None` is not cached; it always gives back a fresh empty table.
    /// A failed load leaves the cache untouched.
    pub fn get_or_load(
        &mut self,
        upload: Option<&Upload>,
        config: &PipelineConfig,
    ) -> Result<Arc<Table>, LoadError> {
        let Some(upload) = upload else {
            return Ok(Arc::new(Table::empty()));
        };
        let key = Self::fingerprint(&upload.bytes, config);
        self.clock += 1;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.clock;
            self.hits += 1;
            log::debug!("dataset cache hit for {} ({})", upload.name, &key[..8]);
            return Ok(Arc::clone(&entry.table));
        }

        self.misses += 1;
        log::debug!("dataset cache miss for {} ({})", upload.name, &key[..8]);
        let table = Arc::new(load_bytes(&upload.bytes, config)?);

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            CachedTable {
                table: Arc::clone(&table),
                name: upload.name.clone(),
                last_used: self.clock,
            },
        );
        Ok(table)
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest_key) = self
            .entries
            .iter()
            .min_by_key(|(_, v)| v.last_used)
            .map(|(k, _)| k.clone())
        {
            if let Some(evicted) = self.entries.remove(&oldest_key) {
                log::debug!("dataset cache evicted {} ({})", evicted.name, &oldest_key[..8]);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop one entry.  Returns whether it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
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

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Length-prefixed so adjacent fields cannot run into each other.
fn update_field(hasher: &mut Sha256, field: &[u8]) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, body: &str) -> Upload {
        Upload::new(name, body.as_bytes())
    }

    #[test]
    fn same_bytes_hit_the_cache() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::new(2);
        let a = cache.get_or_load(Some(&upload("a.csv", "uf\nSP\n")), &cfg).unwrap();
        let b = cache.get_or_load(Some(&upload("renamed.csv", "uf\nSP\n")), &cfg).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn different_bytes_are_reloaded() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::new(2);
        let a = cache.get_or_load(Some(&upload("a.csv", "uf\nSP\n")), &cfg).unwrap();
        let b = cache.get_or_load(Some(&upload("a.csv", "uf\nRJ\n")), &cfg).unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn config_change_is_a_new_key() {
        let defaults = PipelineConfig::default();
        let mut english = PipelineConfig::default();
        english.binary_labels.yes = "Yes".to_string();
        english.binary_labels.no = "No".to_string();

        let mut cache = DatasetCache::new(2);
        let up = upload("s.csv", "esola_sistema_s\n1\n0\n");
        let pt = cache.get_or_load(Some(&up), &defaults).unwrap();
        let en = cache.get_or_load(Some(&up), &english).unwrap();

        assert_eq!(pt.value(0, "Escola Sistema S"), Some(&"Sim".into()));
        assert_eq!(en.value(0, "Escola Sistema S"), Some(&"Yes".into()));
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
        assert_ne!(
            DatasetCache::fingerprint(&up.bytes, &defaults),
            DatasetCache::fingerprint(&up.bytes, &english)
        );
    }

    #[test]
    fn unrelated_config_fields_share_a_key() {
        let defaults = PipelineConfig::default();
        let mut smaller = PipelineConfig::default();
        smaller.cache_capacity = 1;
        smaller.region_column = "Regiao".to_string();
        assert_eq!(
            DatasetCache::fingerprint(b"uf\nSP\n", &defaults),
            DatasetCache::fingerprint(b"uf\nSP\n", &smaller)
        );
    }

    #[test]
    fn evicts_least_recently_used() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::new(2);
        let first = upload("1.csv", "n\n1\n");
        let second = upload("2.csv", "n\n2\n");
        let third = upload("3.csv", "n\n3\n");
        cache.get_or_load(Some(&first), &cfg).unwrap();
        cache.get_or_load(Some(&second), &cfg).unwrap();
        cache.get_or_load(Some(&first), &cfg).unwrap();
        cache.get_or_load(Some(&third), &cfg).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&DatasetCache::fingerprint(&first.bytes, &cfg)));
        assert!(!cache.contains(&DatasetCache::fingerprint(&second.bytes, &cfg)));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::default();
        let bad = upload("bad.csv", "a;b\n1\n");
        assert!(cache.get_or_load(Some(&bad), &cfg).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn absent_upload_is_empty_and_uncached() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::default();
        let t = cache.get_or_load(None, &cfg).unwrap();
        assert!(t.is_empty());
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 0);
    }

    #[test]
    fn invalidate_and_clear() {
        let cfg = PipelineConfig::default();
        let mut cache = DatasetCache::default();
        let up = upload("a.csv", "uf\nSP\n");
        cache.get_or_load(Some(&up), &cfg).unwrap();
        let key = DatasetCache::fingerprint(&up.bytes, &cfg);
        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        cache.get_or_load(Some(&up), &cfg).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
