//! Ordered, case-preserving header storage shared by requests and responses.
//!
//! `http::HeaderMap` lowercases names, but the wire layout produced here must keep
//! the name exactly as the peer or the handler wrote it. Names are grouped by exact
//! spelling in first-insertion order; lookups are ASCII case-insensitive.

use std::slice;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Appends `value` to the values of `name`, creating the entry at the end if
    /// this exact spelling has not been seen yet.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Replaces every value stored under `name` (any casing) with `value`.
    ///
    /// The position and spelling of the first matching entry are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(index) => {
                self.entries[index].1 = vec![value.into()];
                let mut seen = 0;
                self.entries.retain(|(n, _)| {
                    let keep = !n.eq_ignore_ascii_case(&name) || seen == 0;
                    if n.eq_ignore_ascii_case(&name) {
                        seen += 1;
                    }
                    keep
                });
            }
            None => self.entries.push((name, vec![value.into()])),
        }
    }

    /// Removes every entry matching `name` (any casing), returning whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before != self.entries.len()
    }

    /// First value of `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).and_then(|(_, values)| values.first()).map(String::as_str)
    }

    /// All values of `name` across every spelling, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values over all names.
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.iter() }
    }
}

#[derive(Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, Vec<String>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_insertion_order() {
        let mut headers = Headers::new();
        headers.append("X-Foo", "1");
        headers.append("Host", "localhost");
        headers.append("X-Foo", "2");

        let collected: Vec<_> = headers.iter().map(|(n, v)| (n, v.to_vec())).collect();
        assert_eq!(
            collected,
            vec![("X-Foo", vec!["1".to_string(), "2".to_string()]), ("Host", vec!["localhost".to_string()])]
        );
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.value_count(), 3);
    }

    #[test]
    fn lookup_ignores_case_but_storage_preserves_it() {
        let headers: Headers = [("Content-Length", "5"), ("content-length", "5")].into_iter().collect();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("CONTENT-LENGTH"), Some("5"));
        assert_eq!(headers.get_all("content-LENGTH").count(), 2);
        assert!(headers.contains("Content-length"));
        assert!(!headers.contains("Content-Type"));

        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Content-Length", "content-length"]);
    }

    #[test]
    fn insert_replaces_all_spellings() {
        let mut headers = Headers::new();
        headers.append("Accept", "*/*");
        headers.append("content-type", "text/plain");
        headers.append("Content-Type", "text/html");

        headers.insert("CONTENT-TYPE", "application/json");

        assert_eq!(headers.get_all("content-type").collect::<Vec<_>>(), vec!["application/json"]);
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Accept", "content-type"]);
    }

    #[test]
    fn get_outlives_the_lookup_name() {
        let headers: Headers = [("Host", "localhost"), ("host", "ignored")].into_iter().collect();

        let value = {
            let name = String::from("HOST");
            headers.get(&name)
        };
        assert_eq!(value, Some("localhost"));
    }

    #[test]
    fn remove_by_any_case() {
        let mut headers: Headers = [("X-A", "1"), ("x-a", "2"), ("X-B", "3")].into_iter().collect();
        assert!(headers.remove("X-a"));
        assert!(!headers.remove("X-a"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-b"), Some("3"));
    }
}
