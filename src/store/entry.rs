/// A node in a bucket chain.
///
/// `next` is an index into the table's entry pool, not a pointer, so entries
/// can be relinked during a resize without moving them.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub key: Vec<u8>,
    pub value: V,
    pub next: Option<usize>,
}

impl<V> Entry<V> {
    pub fn new(key: Vec<u8>, value: V, next: Option<usize>) -> Self {
        Entry { key, value, next }
    }
}
