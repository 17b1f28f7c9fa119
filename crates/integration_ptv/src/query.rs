//! Canonical query string encoding
//!
//! The Timetable API verifies the signature against the exact query bytes,
//! so [`OptionSet`] keeps insertion order and encodes deterministically.

use std::fmt;

use chrono::{DateTime, Utc};
use url::{Url, form_urlencoded};

/// A single query value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Free text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Rendered as `true` / `false`
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for Scalar {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Text(value.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// A scalar or an ordered list of scalars
///
/// Lists are sent as repeated keys, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// One `key=value` pair
    Scalar(Scalar),
    /// One `key=value` pair per element
    List(Vec<Scalar>),
}

impl From<Scalar> for OptionValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_option_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_option_value!(&str, String, i64, i32, u32, u8, f64, bool, DateTime<Utc>);

impl<T: Into<Scalar>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered set of query options with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    entries: Vec<(String, OptionValue)>,
}

impl OptionSet {
    /// Create an empty option set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option
    ///
    /// Re-inserting an existing name replaces its value but keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`OptionSet::insert`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an option only when a value is present
    pub fn insert_opt<T: Into<Scalar>>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(name, OptionValue::Scalar(value.into()));
        }
    }

    /// Set a list option only when it has at least one element
    pub fn insert_list<T: Into<Scalar> + Clone>(&mut self, name: &str, values: &[T]) {
        if !values.is_empty() {
            let list = values.iter().cloned().map(Into::into).collect();
            self.insert(name, OptionValue::List(list));
        }
    }

    /// Look up an option by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Number of distinct option names
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no options are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate options in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode as a query string without a leading `?` or `&`
    ///
    /// An empty set encodes to an empty string.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.entries {
            match value {
                OptionValue::Scalar(scalar) => {
                    serializer.append_pair(name, &scalar.to_string());
                },
                OptionValue::List(items) => {
                    for item in items {
                        serializer.append_pair(name, &item.to_string());
                    }
                },
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Scratch URL whose path setter does the segment escaping
const SEGMENT_BASE: &str = "http://segment.invalid/";

/// Percent-encode free text as a single path segment
///
/// Spaces become `%20`; `/`, `?`, `#` and `%` are escaped so the text can
/// neither add path levels nor cut off the signed query. A bare `.` or `..`
/// encodes to an empty segment.
#[must_use]
pub fn path_segment(raw: &str) -> String {
    let Ok(mut url) = Url::parse(SEGMENT_BASE) else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(raw);
    }
    url.path().strip_prefix('/').unwrap_or_default().to_string()
}
