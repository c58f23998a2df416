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

//! Formatters for rendering log records to strings.

#[cfg(feature = "colored")]
pub use self::colored::ColoredFormatter;
#[cfg(feature = "colored")]
pub use self::colored::LevelPalette;
pub use self::custom::CustomFormatter;
pub use self::json::JsonFormatter;
pub use self::simple::SimpleFormatter;
pub use self::template::TemplateFormatter;

use crate::record::Record;

#[cfg(feature = "colored")]
mod colored;
mod custom;
mod json;
mod simple;
mod template;

/// Represents a formatter for rendering log records.
///
/// Formatting is pure: a formatter never performs I/O and never mutates the
/// record. A failing formatter is downgraded to a raw rendering at the sink
/// boundary, so logging stays a no-throw operation for the caller.
#[derive(Debug)]
pub enum Formatter {
    Simple(SimpleFormatter),
    Json(JsonFormatter),
    #[cfg(feature = "colored")]
    Colored(ColoredFormatter),
    Template(TemplateFormatter),
    Custom(CustomFormatter),
}

impl Formatter {
    /// Render a record to its output string.
    pub fn format(&self, record: &Record) -> anyhow::Result<String> {
        match self {
            Formatter::Simple(formatter) => Ok(formatter.format(record)),
            Formatter::Json(formatter) => formatter.format(record),
            #[cfg(feature = "colored")]
            Formatter::Colored(formatter) => Ok(formatter.format(record)),
            Formatter::Template(formatter) => Ok(formatter.format(record)),
            Formatter::Custom(formatter) => formatter.format(record),
        }
    }
}

impl Default for Formatter {
    fn default() -> Formatter {
        Formatter::Simple(SimpleFormatter::default())
    }
}
