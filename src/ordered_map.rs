//! A minimal insertion-order-preserving map.
//!
//! `serde_yaml::Mapping` already preserves order for YAML-shaped values, but
//! several scope accumulators (§3 `inputs_workflow`, `inputs_file_workflow`)
//! need to carry plain Rust payloads before they are turned into YAML at the
//! end of a frame. A `HashMap` would silently break the step-order-preservation
//! invariant, so small linear-scan storage is used instead.

#[derive(Debug, Clone, Default)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn extend(&mut self, other: OrderedMap<V>) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut m = OrderedMap::new();
        m.insert("c", 1);
        m.insert("a", 2);
        m.insert("b", 3);
        let keys: Vec<_> = m.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn reinsertion_updates_value_not_position() {
        let mut m = OrderedMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("a", 99);
        let keys: Vec<_> = m.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(*m.get("a").unwrap(), 99);
    }

    #[test]
    fn remove_and_contains() {
        let mut m: OrderedMap<i32> = OrderedMap::new();
        m.insert("x", 1);
        assert!(m.contains_key("x"));
        assert_eq!(m.remove("x"), Some(1));
        assert!(!m.contains_key("x"));
        assert_eq!(m.remove("x"), None);
    }

    #[test]
    fn extend_preserves_order_and_overwrites() {
        let mut a = OrderedMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = OrderedMap::new();
        b.insert("y", 99);
        b.insert("z", 3);
        a.extend(b);
        let keys: Vec<_> = a.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(*a.get("y").unwrap(), 99);
    }
}
