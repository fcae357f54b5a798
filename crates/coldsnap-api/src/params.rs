//! Ordered request parameters and their form encoding.
//!
//! Encoding escapes every byte outside the RFC 3986 unreserved set
//! (`A-Z a-z 0-9 - _ . ~`) as `%XX` over UTF-8; a space becomes `%20`.

use std::fmt::{self, Display, Formatter};

/// Ordered key/value collection sent as an `application/x-www-form-urlencoded` body.
///
/// Keys are unique: inserting an existing key replaces its value without
/// moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    entries: Vec<(String, String)>,
}

impl RequestParameters {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Encode as `key=value` pairs joined by `&`.
    #[must_use]
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Display for RequestParameters {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.encode())
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_simple_pairs_in_order() {
        let params: RequestParameters = [("a", "b"), ("c", "d")].into_iter().collect();
        assert_eq!(params.encode(), "a=b&c=d");
    }

    #[test]
    fn empty_set_encodes_to_empty_string() {
        assert_eq!(RequestParameters::new().encode(), "");
    }

    #[test]
    fn reserved_characters_are_percent_escaped() {
        let mut params = RequestParameters::new();
        params.insert("password", "p@ss w/rd");
        assert_eq!(params.encode(), "password=p%40ss%20w%2Frd");
    }

    #[test]
    fn unreserved_characters_pass_through() {
        let mut params = RequestParameters::new();
        params.insert("value", "AZaz09-_.~");
        params.insert("json", r#"{"k":true}"#);
        params.insert("utf8", "é+&=");
        assert_eq!(
            params.encode(),
            "value=AZaz09-_.~&json=%7B%22k%22%3Atrue%7D&utf8=%C3%A9%2B%26%3D"
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = RequestParameters::new();
        assert_eq!(params.insert("a", "1"), None);
        params.insert("b", "2");
        assert_eq!(params.insert("a", "3"), Some("1".to_string()));
        assert_eq!(params.len(), 2);
        assert_eq!(params.encode(), "a=3&b=2");
    }

    #[test]
    fn remove_and_get() {
        let mut params: RequestParameters = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.remove("a"), Some("1".to_string()));
        assert_eq!(params.remove("a"), None);
        assert_eq!(params.get("a"), None);
        assert!(!params.is_empty());
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("b", "2")]);
        assert_eq!(params.to_string(), "b=2");
    }
}
