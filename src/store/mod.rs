mod entry;

use entry::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Bucket count of a freshly created table.
pub const INITIAL_CAPACITY: usize = 128;

/// `len / capacity` ratio at which an insert of a new key doubles the table.
pub const LOAD_FACTOR_LIMIT: f64 = 0.8;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a. Deterministic across runs; not collision resistant.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Separate-chaining hash table keyed by raw bytes.
///
/// Entries live in one contiguous pool. Each bucket holds the pool index of
/// its chain head and each entry holds the index of its successor, so chains
/// are singly linked without any raw pointers.
#[derive(Debug)]
pub struct HashTable<V> {
    buckets: Vec<Option<usize>>,
    entries: Vec<Entry<V>>,
}

/// The value store served over the wire.
pub type Store = HashTable<Vec<u8>>;

/// The store as shared by every connection task.
pub type SharedStore = Arc<RwLock<Store>>;

pub fn new_shared_store(initial_capacity: usize) -> SharedStore {
    Arc::new(RwLock::new(HashTable::with_capacity(initial_capacity)))
}

impl<V> HashTable<V> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a table with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        HashTable {
            buckets: vec![None; capacity.max(1)],
            entries: Vec::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Look up `key`, scanning its bucket chain.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.find(key.as_ref()).map(|idx| &self.entries[idx].value)
    }

    /// Insert or overwrite `key`. Returns the previous value, if any.
    ///
    /// A brand-new key that would bring the load factor to the limit first
    /// doubles the bucket array.
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(idx) = self.find(&key) {
            return Some(std::mem::replace(&mut self.entries[idx].value, value));
        }

        if (self.len() + 1) as f64 / self.capacity() as f64 >= LOAD_FACTOR_LIMIT {
            self.resize(self.capacity() * 2);
        }

        let bucket = self.bucket_index(&key);
        let idx = self.entries.len();
        self.entries.push(Entry::new(key, value, self.buckets[bucket]));
        self.buckets[bucket] = Some(idx);
        None
    }

    /// Remove `key`. Returns its value, or `None` if it was absent.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let key = key.as_ref();
        let bucket = self.bucket_index(key);
        let mut prev: Option<usize> = None;
        let mut cursor = self.buckets[bucket];

        while let Some(idx) = cursor {
            let next = self.entries[idx].next;
            if self.entries[idx].key == key {
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.entries[p].next = next,
                }
                return Some(self.remove_unlinked(idx));
            }
            prev = cursor;
            cursor = next;
        }

        None
    }

    pub(crate) fn bucket_index(&self, key: &[u8]) -> usize {
        (fnv1a64(key) % self.buckets.len() as u64) as usize
    }

    fn find(&self, key: &[u8]) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_index(key)];
        while let Some(idx) = cursor {
            let entry = &self.entries[idx];
            if entry.key == key {
                return Some(idx);
            }
            cursor = entry.next;
        }
        None
    }

    /// Drop an entry that no chain references any more.
    ///
    /// The pool is compacted with `swap_remove`, so the last entry moves into
    /// `idx` and the one link pointing at it is patched.
    fn remove_unlinked(&mut self, idx: usize) -> V {
        let last = self.entries.len() - 1;
        if idx != last {
            let bucket = self.bucket_index(&self.entries[last].key);
            self.repoint(bucket, last, idx);
        }
        self.entries.swap_remove(idx).value
    }

    fn repoint(&mut self, bucket: usize, from: usize, to: usize) {
        if self.buckets[bucket] == Some(from) {
            self.buckets[bucket] = Some(to);
            return;
        }
        let mut cursor = self.buckets[bucket];
        while let Some(idx) = cursor {
            if self.entries[idx].next == Some(from) {
                self.entries[idx].next = Some(to);
                return;
            }
            cursor = self.entries[idx].next;
        }
    }

    /// Rehash every chain into a bucket array of `new_capacity`. Entries stay
    /// where they are in the pool; only links change.
    fn resize(&mut self, new_capacity: usize) {
        let mut buckets: Vec<Option<usize>> = vec![None; new_capacity];

        for head in std::mem::take(&mut self.buckets) {
            let mut cursor = head;
            while let Some(idx) = cursor {
                let entry = &mut self.entries[idx];
                cursor = entry.next;
                let slot = (fnv1a64(&entry.key) % new_capacity as u64) as usize;
                entry.next = buckets[slot];
                buckets[slot] = Some(idx);
            }
        }

        self.buckets = buckets;
        debug!(capacity = new_capacity, len = self.len(), "hash table resized");
    }

    /// Keys in one bucket chain, head first.
    #[cfg(test)]
    fn chain_keys(&self, bucket: usize) -> Vec<&[u8]> {
        let mut keys = Vec::new();
        let mut cursor = self.buckets[bucket];
        while let Some(idx) = cursor {
            keys.push(self.entries[idx].key.as_slice());
            cursor = self.entries[idx].next;
        }
        keys
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
