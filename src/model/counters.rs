//! Ordered name → value map used for domain records, sums and deltas.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Counters keyed by field name, kept in schema order.
///
/// Field names always come from the static schema tables, so keys are
/// `&'static str`. Lookups are linear; a schema has fewer than fifty fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterMap<V> {
    entries: Vec<(&'static str, V)>,
}

impl<V> Default for CounterMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> CounterMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name` to `value`, keeping the existing position if present.
    pub fn insert(&mut self, name: &'static str, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(&'static str, V)> for CounterMap<V> {
    fn from_iter<I: IntoIterator<Item = (&'static str, V)>>(iter: I) -> Self {
        let mut map = CounterMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

// Serialized as a JSON object in field order.
impl<V: Serialize> Serialize for CounterMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut map = CounterMap::new();
        map.insert("a", 1u64);
        map.insert("b", 2);
        map.insert("a", 10);

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&10));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let map: CounterMap<i64> = [("zeta", 1), ("alpha", -2)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":-2}"#);
    }
}
