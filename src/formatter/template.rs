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

use crate::format::display_value;
use crate::formatter::Formatter;
use crate::formatter::simple::DEFAULT_DATE_FORMAT;
use crate::formatter::simple::format_timestamp;
use crate::record::Record;
use crate::record::is_reserved_key;

pub(crate) const DEFAULT_TEMPLATE: &str = "{timestamp} [{level}] {name}: {message}";

/// A formatter driven by a `{placeholder}` template string.
///
/// Recognized placeholders are `timestamp`, `level`, `levelname`, `levelno`,
/// `name`, `message`, and any context key. `{{` and `}}` render literal
/// braces. A template referencing an unknown key, or one with unbalanced
/// braces, falls back to a plain `[timestamp] LEVEL name: message` line so
/// that rendering never fails.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    template: String,
    date_format: String,
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        TemplateFormatter::new(DEFAULT_TEMPLATE)
    }
}

impl TemplateFormatter {
    /// Creates a formatter from the given template string.
    pub fn new(template: impl Into<String>) -> Self {
        TemplateFormatter {
            template: template.into(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Sets the strftime date format used for the `{timestamp}` placeholder.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let mut line = match self.substitute(record) {
            Some(line) => line,
            None => fallback_line(&self.date_format, record),
        };

        if let Some(exc_text) = record.exc_text() {
            line.push('\n');
            line.push_str(exc_text);
        }
        line
    }

    fn substitute(&self, record: &Record) -> Option<String> {
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut chars = self.template.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        out.push('{');
                        continue;
                    }
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => key.push(c),
                            // unterminated placeholder
                            None => return None,
                        }
                    }
                    out.push_str(&self.resolve(&key, record)?);
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    }
                    out.push('}');
                }
                _ => out.push(ch),
            }
        }
        Some(out)
    }

    fn resolve(&self, key: &str, record: &Record) -> Option<String> {
        let value = match key {
            "timestamp" => format_timestamp(&self.date_format, record),
            "level" | "levelname" => record.level().as_str().to_string(),
            "levelno" => (record.level() as u8).to_string(),
            "name" => record.logger_name().to_string(),
            "message" => record.message().to_string(),
            key if !is_reserved_key(key) => display_value(record.context().get(key)?),
            _ => return None,
        };
        Some(value)
    }
}

fn fallback_line(date_format: &str, record: &Record) -> String {
    let time = format_timestamp(date_format, record);
    let level = record.level();
    let name = record.logger_name();
    let message = record.message();
    format!("[{time}] {level} {name}: {message}")
}

impl From<TemplateFormatter> for Formatter {
    fn from(formatter: TemplateFormatter) -> Self {
        Formatter::Template(formatter)
    }
}
