//! Ordered request parameters

use crate::error::{RestError, RestResult};

/// Flat key/value parameters ready to transmit
///
/// Keys are unique and keep their first insertion position; inserting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any existing value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set `key` only when a value is present
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Apply every entry of `other` on top of this set
    pub fn merge(&mut self, other: ParameterSet) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URL-encode as `key=value&...` in insertion order
    pub fn encode(&self) -> RestResult<String> {
        serde_urlencoded::to_string(&self.entries)
            .map_err(|e| RestError::InvalidParameter(e.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = ParameterSet::new().with("pair", "XBTUSD").with("volume", "1");
        params.insert("pair", "ETHUSD");
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["pair", "volume"]);
        assert_eq!(params.get("pair"), Some("ETHUSD"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = ParameterSet::new().with("a", "1").with("b", "2");
        base.merge(ParameterSet::new().with("b", "3").with("c", "4"));
        assert_eq!(
            base.iter().collect::<Vec<_>>(),
            vec![("a", "1"), ("b", "3"), ("c", "4")]
        );
    }

    #[test]
    fn test_encode_escapes() {
        let params: ParameterSet = [("price2", "+10.5"), ("close[ordertype]", "limit")]
            .into_iter()
            .collect();
        assert_eq!(
            params.encode().unwrap(),
            "price2=%2B10.5&close%5Bordertype%5D=limit"
        );
    }

    #[test]
    fn test_remove_and_insert_opt() {
        let mut params = ParameterSet::new();
        params.insert_opt::<u32>("count", None);
        assert!(params.is_empty());
        params.insert_opt("count", Some(5));
        assert_eq!(params.remove("count").as_deref(), Some("5"));
        assert!(!params.contains("count"));
    }
}
