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
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::formatter::Formatter;
use crate::record::Record;
use crate::record::is_reserved_key;

/// A JSON formatter for structured logging.
///
/// Output format:
///
/// ```json
/// {"level":"INFO","message":"connected","timestamp":"2024-08-11T22:44:57.172051+08:00","logger":"app.database"}
/// {"level":"ERROR","message":"write failed","timestamp":"2024-08-11T22:44:58.002117+08:00","logger":"app.database","exception":"disk full","attempt":3}
/// ```
///
/// Context fields are flattened into the top-level object with their JSON
/// types preserved.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    include_timestamp: bool,
    include_logger: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        JsonFormatter {
            include_timestamp: true,
            include_logger: true,
        }
    }
}

impl JsonFormatter {
    /// Sets whether the `timestamp` key is emitted.
    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.include_timestamp = enabled;
        self
    }

    /// Sets whether the `logger` key is emitted.
    pub fn with_logger_name(mut self, enabled: bool) -> Self {
        self.include_logger = enabled;
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logger: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<&'a str>,
    #[serde(flatten)]
    context: Map<String, Value>,
}

impl JsonFormatter {
    pub(crate) fn format(&self, record: &Record) -> anyhow::Result<String> {
        let mut context = Map::new();
        for (key, value) in record.context().iter() {
            if !is_reserved_key(key) {
                context.insert(key.to_owned(), value.clone());
            }
        }

        let record_line = RecordLine {
            level: record.level().as_str(),
            message: record.message(),
            timestamp: self.include_timestamp.then(|| {
                strtime::format("%Y-%m-%dT%H:%M:%S.%6f%:z", record.timestamp())
                    .unwrap_or_else(|_| record.timestamp().timestamp().to_string())
            }),
            logger: self.include_logger.then(|| record.logger_name()),
            exception: record.exc_text(),
            context,
        };

        Ok(serde_json::to_string(&record_line)?)
    }
}

impl From<JsonFormatter> for Formatter {
    fn from(formatter: JsonFormatter) -> Self {
        Formatter::Json(formatter)
    }
}
