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

use jiff::fmt::strtime;

use crate::format::display_value;
use crate::formatter::Formatter;
use crate::record::Record;
use crate::record::is_reserved_key;

pub(crate) const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A formatter that renders log records as plain text.
///
/// Output format:
///
/// ```text
/// [2024-08-11 22:44:57] ERROR    app.database   : connection lost
/// [2024-08-11 22:44:58] WARNING  app.database   : retrying | attempt=2 backoff_ms=250
/// ```
///
/// The rendered error text of an exception record follows the message on its
/// own lines; remaining context fields are appended as ` | key=value` pairs
/// in insertion order.
#[derive(Debug, Clone)]
pub struct SimpleFormatter {
    date_format: String,
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        SimpleFormatter {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl SimpleFormatter {
    /// Sets the strftime date format used for the timestamp prefix.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let time = format_timestamp(&self.date_format, record);
        let level = record.level();
        let name = record.logger_name();
        let message = record.message();

        let mut line = format!("[{time}] {level:<8} {name:<15}: {message}");
        append_details(&mut line, record);
        line
    }
}

/// Render the record timestamp with the given format, falling back to the
/// default format if the user-supplied one does not parse.
pub(crate) fn format_timestamp(date_format: &str, record: &Record) -> String {
    strtime::format(date_format, record.timestamp()).unwrap_or_else(|_| {
        strtime::format(DEFAULT_DATE_FORMAT, record.timestamp()).unwrap_or_default()
    })
}

/// Append the exception block and the ` | key=value` context tail.
fn append_details(line: &mut String, record: &Record) {
    if let Some(exc_text) = record.exc_text() {
        line.push('\n');
        line.push_str(exc_text);
    }

    if record.context().has_extras() {
        line.push_str(" |");
        for (key, value) in record.context().iter() {
            if is_reserved_key(key) {
                continue;
            }
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(&display_value(value));
        }
    }
}

impl From<SimpleFormatter> for Formatter {
    fn from(formatter: SimpleFormatter) -> Self {
        Formatter::Simple(formatter)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Zoned;

    use super::*;
    use crate::record::Context;
    use crate::record::Level;

    fn record() -> crate::record::RecordBuilder {
        let timestamp: Zoned = "2024-01-15T08:30:00[UTC]".parse().unwrap();
        crate::Record::builder()
            .logger_name("app.db")
            .timestamp(timestamp)
    }

    #[test]
    fn test_plain_line() {
        let record = record().level(Level::Info).message("connected").build();
        let line = SimpleFormatter::default().format(&record);
        assert_eq!(line, "[2024-01-15 08:30:00] INFO     app.db         : connected");
    }

    #[test]
    fn test_context_tail_keeps_insertion_order() {
        let mut context = Context::new();
        context.insert("attempt", 2);
        context.insert("host", "db-1");
        let record = record()
            .level(Level::Warning)
            .message("retrying")
            .context(context)
            .build();

        let line = SimpleFormatter::default().format(&record);
        assert!(line.ends_with(" | attempt=2 host=db-1"), "{line}");
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let record = record().level(Level::Info).message("ok").build();
        let line = SimpleFormatter::default()
            .date_format("%!")
            .format(&record);
        assert!(line.contains("2024-01-15 08:30:00"), "{line}");
    }
}
