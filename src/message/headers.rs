//! SHIORI header table with case-sensitive name lookup.
//!
//! SHIORI headers are order-preserving, case-sensitive, and single-valued:
//! `Value` and `value` are distinct names, and setting an existing name
//! replaces its value in place without moving the entry.

use std::fmt;

/// An order-preserving, case-sensitive, single-valued header table.
///
/// Unlike HTTP header maps this table never holds two entries with the same
/// name: [`set`](Self::set) replaces the value of an existing entry while
/// keeping its position, so serialization order stays stable across updates.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::Headers;
///
/// let mut headers = Headers::new();
/// headers.set("Value", "hello");
/// headers.set("Charset", "UTF-8");
/// headers.set("Value", "replaced");
///
/// assert_eq!(headers.get("Value"), Some("replaced"));
/// assert_eq!(headers.get("value"), None); // names are case-sensitive
/// let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
/// assert_eq!(names, vec!["Value", "Charset"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header table with pre-allocated capacity for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Sets a header value. An existing entry with the same name is replaced
    /// in place; a new name is appended at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for the given header name (case-sensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Removes the entry with the given header name (case-sensitive).
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.inner.len();
        self.inner.retain(|(k, _)| k != name);
        self.inner.len() < before
    }

    /// Returns `true` if the table contains an entry with the given name.
    ///
    /// Presence, not value, is the test: an entry set to the empty string
    /// still counts as present.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k == name)
    }

    /// Returns the number of header entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no header entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}
