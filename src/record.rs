// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log record, severity levels, and structured context.

use std::fmt;
use std::str::FromStr;

use jiff::Zoned;
use serde_json::Value;

/// Context key set by exception logging to carry the rendered error text.
pub const KEY_EXC_TEXT: &str = "exc_text";

/// Context key flagging that a record was produced by exception logging.
pub const KEY_EXC_INFO: &str = "exc_info";

pub(crate) fn is_reserved_key(key: &str) -> bool {
    key == KEY_EXC_TEXT || key == KEY_EXC_INFO
}

/// An enum representing the available verbosity levels of a logger.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Level {
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug = 0,
    /// The "info" level.
    ///
    /// Designates useful information.
    Info = 1,
    /// The "warning" level.
    ///
    /// Designates hazardous situations.
    Warning = 2,
    /// The "error" level.
    ///
    /// Designates serious errors.
    Error = 3,
    /// The "critical" level.
    ///
    /// Designates unrecoverable failures.
    Critical = 4,
}

impl Level {
    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    pub(crate) fn from_index(index: u8) -> Level {
        match index {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warning,
            3 => Level::Error,
            _ => Level::Critical,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The type returned by `from_str` when the string doesn't match any of the log levels.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseLevelError {}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("malformed log level")
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warning", Level::Warning),
            ("error", Level::Error),
            ("critical", Level::Critical),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(ParseLevelError {})
    }
}

/// Open structured fields attached to a log record.
///
/// Keys keep their insertion order; inserting an existing key replaces its
/// value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    entries: Vec<(String, Value)>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Context {
        Context { entries: vec![] }
    }

    /// Insert a key-value pair; the last write wins on key collision.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any non-reserved entries are present.
    pub(crate) fn has_extras(&self) -> bool {
        self.entries.iter().any(|(k, _)| !is_reserved_key(k))
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Context {
        let mut context = Context::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

impl<K, V> Extend<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// The payload of a log event.
///
/// A record is built once per accepted log call and never mutated afterwards;
/// every sink on the dispatch path reads the same instance.
#[derive(Clone, Debug)]
pub struct Record {
    logger_name: String,
    level: Level,
    message: String,
    timestamp: Zoned,
    context: Context,
}

impl Record {
    /// Create a builder for a record.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The dotted name of the logger that produced this record.
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// The verbosity level of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message body, with positional substitutions already applied.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The time the record was constructed.
    pub fn timestamp(&self) -> &Zoned {
        &self.timestamp
    }

    /// The structured context attached to the record.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The rendered error text, when the record was produced by exception
    /// logging.
    pub fn exc_text(&self) -> Option<&str> {
        match self.context.get(KEY_EXC_TEXT) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        }
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                logger_name: String::new(),
                level: Level::Info,
                message: String::new(),
                timestamp: Zoned::now(),
                context: Context::new(),
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`logger_name`](Record::logger_name).
    pub fn logger_name(mut self, name: impl Into<String>) -> Self {
        self.record.logger_name = name.into();
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Set [`timestamp`](Record::timestamp).
    ///
    /// Defaults to the time the builder was created.
    pub fn timestamp(mut self, timestamp: Zoned) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    /// Set [`context`](Record::context).
    pub fn context(mut self, context: Context) -> Self {
        self.record.context = context;
        self
    }

    /// Invoke the builder and return a `Record`.
    pub fn build(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Critical);
    }

    #[test]
    fn test_level_round_trip() {
        for level in [
            Level::Debug,
            Level::Info,
            Level::Warning,
            Level::Error,
            Level::Critical,
        ] {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warning));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_context_insertion_order_and_overwrite() {
        let mut context = Context::new();
        context.insert("b", 1);
        context.insert("a", 2);
        context.insert("b", 3);

        let entries = context.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(entries, vec!["b", "a"]);
        assert_eq!(context.get("b"), Some(&Value::from(3)));
    }
}
