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

use colored::Color;
use colored::Colorize;

use crate::format::display_value;
use crate::formatter::Formatter;
use crate::formatter::simple::DEFAULT_DATE_FORMAT;
use crate::formatter::simple::format_timestamp;
use crate::record::Level;
use crate::record::Record;
use crate::record::is_reserved_key;

/// A formatter that renders the plain-text line with ANSI colors.
///
/// The level column is colored per severity, exception text is red, and the
/// context tail is dimmed to the debug color. You can customize the color of
/// each log level by setting the `palette` field with a [`LevelPalette`].
#[derive(Debug, Clone)]
pub struct ColoredFormatter {
    pub palette: LevelPalette,
    date_format: String,
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        ColoredFormatter {
            palette: LevelPalette::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Customize the color of each log level.
#[derive(Debug, Clone)]
pub struct LevelPalette {
    pub debug: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    pub critical: Color,
}

impl Default for LevelPalette {
    fn default() -> Self {
        Self {
            debug: Color::Cyan,
            info: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            critical: Color::Magenta,
        }
    }
}

impl LevelPalette {
    fn color(&self, level: Level) -> Color {
        match level {
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warning => self.warning,
            Level::Error => self.error,
            Level::Critical => self.critical,
        }
    }
}

impl ColoredFormatter {
    /// Sets the strftime date format used for the timestamp prefix.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let time = format_timestamp(&self.date_format, record);
        let level = format!("{:<8}", record.level()).color(self.palette.color(record.level()));
        let name = record.logger_name();
        let message = record.message();

        let mut line = format!("[{time}] {level} {name:<15}: {message}");

        if let Some(exc_text) = record.exc_text() {
            line.push('\n');
            line.push_str(&exc_text.color(self.palette.error).to_string());
        }

        if record.context().has_extras() {
            let mut tail = String::new();
            for (key, value) in record.context().iter() {
                if is_reserved_key(key) {
                    continue;
                }
                if !tail.is_empty() {
                    tail.push(' ');
                }
                tail.push_str(key);
                tail.push('=');
                tail.push_str(&display_value(value));
            }
            line.push_str(" | ");
            line.push_str(&tail.color(self.palette.debug).to_string());
        }

        line
    }
}

impl From<ColoredFormatter> for Formatter {
    fn from(formatter: ColoredFormatter) -> Self {
        Formatter::Colored(formatter)
    }
}
