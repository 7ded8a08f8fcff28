use serde::Serialize;

/// Catalog header fields in the order they were written.
///
/// Keys compare case-insensitively (`content-type` finds `Content-Type`);
/// inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.fields[i].1.as_str())
    }

    /// Set `key` to `value`, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.fields.remove(i).1)
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}
