// src/core/parser.rs

//! Turns the flat `key: value` line stream of a response into structured data.
//!
//! Two shapes are supported: records delimited by marker keys (`parse`) and
//! values grouped under a repeating tag (`parse_grouped`).

use indexmap::IndexMap;
use indexmap::map::Iter as IndexMapIter;
use std::str::FromStr;

/// Joins repeated values of the same key within one record (e.g. several `Genre` tags).
pub const VALUE_SEPARATOR: &str = ";";

/// An ordered key/value association for one record, in the order keys first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: IndexMap<String, String>,
}

impl ValueMap {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a value. A repeated key keeps its position and has the new value
    /// appended after `VALUE_SEPARATOR`.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.get_mut(key) {
            Some(existing) => {
                existing.push_str(VALUE_SEPARATOR);
                existing.push_str(value);
            }
            None => {
                self.entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Looks up a key and parses it, treating unparsable values as absent.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Looks up a numeric flag (`0`/`1`) as a bool.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get_parsed::<u8>(key).map(|v| v != 0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> IndexMapIter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a String);
    type IntoIter = IndexMapIter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Splits `key: value`. Lines without a key before the colon are not payload.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':').filter(|&i| i > 0)?;
    let rest = &line[colon + 1..];
    Some((&line[..colon], rest.strip_prefix(' ').unwrap_or(rest)))
}

/// Lazily converts a line stream into records. See [`parse`].
pub struct Records<'m, I, F> {
    lines: I,
    markers: &'m [&'m str],
    convert: F,
    current: ValueMap,
    finished: bool,
}

impl<I, S, F, T> Iterator for Records<'_, I, F>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(ValueMap) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }

        for line in self.lines.by_ref() {
            let Some((key, value)) = split_line(line.as_ref()) else {
                continue;
            };
            if !self.current.is_empty() && self.markers.iter().any(|m| *m == key) {
                let record = std::mem::take(&mut self.current);
                self.current.insert(key, value);
                return Some((self.convert)(record));
            }
            self.current.insert(key, value);
        }

        self.finished = true;
        if self.current.is_empty() {
            None
        } else {
            Some((self.convert)(std::mem::take(&mut self.current)))
        }
    }
}

/// Groups a flat line stream into records.
///
/// A line whose key is one of `markers` starts a new record once the current
/// one holds at least one entry. Each finished record is handed to `convert`.
/// Empty input yields nothing and never calls `convert`.
pub fn parse<'m, I, F, T>(lines: I, markers: &'m [&'m str], convert: F) -> Records<'m, I::IntoIter, F>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: FnMut(ValueMap) -> T,
{
    Records {
        lines: lines.into_iter(),
        markers,
        convert,
        current: ValueMap::new(),
        finished: false,
    }
}

/// Groups values under the most recent occurrence of `grouping_key`.
///
/// Values seen before the first grouping line land under the empty string. A
/// group that appears again starts over: it keeps its first position but only
/// the values of its last occurrence.
pub fn parse_grouped<I>(lines: I, grouping_key: &str) -> IndexMap<String, Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current = String::new();

    for line in lines {
        let Some((key, value)) = split_line(line.as_ref()) else {
            continue;
        };
        if key == grouping_key {
            current = value.to_string();
            groups.insert(current.clone(), Vec::new());
        } else {
            groups
                .entry(current.clone())
                .or_default()
                .push(value.to_string());
        }
    }

    groups
}
