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

//! Logtree is a hierarchical structured logging framework for Rust
//! applications, providing named loggers, pluggable sinks, and rotating log
//! files.
//!
//! # Overview
//!
//! Loggers form a tree addressed by dotted names. Each logger filters by
//! level, renders accepted records through the sinks attached to it, and
//! relays the record to its parent, so a sink attached to a root logger sees
//! everything its subtree decided to log. Sinks cover the console, plain and
//! rotating files, and an in-memory ring buffer; formatters cover plain
//! text, JSON lines, colored output, and custom templates.
//!
//! Logging never raises into the caller: sink failures are reported to a
//! process-level [trap] and the record continues to the remaining sinks.
//!
//! # Examples
//!
//! Simple setup with a console sink:
//!
//! ```
//! use logtree::Level;
//! use logtree::sink::ConsoleSink;
//!
//! let logger = logtree::builder("app")
//!     .level(Level::Debug)
//!     .sink(ConsoleSink::stdout())
//!     .build();
//!
//! logger.info("service starting");
//!
//! let db = logger.get_child("db");
//! db.log_with(
//!     Level::Warning,
//!     "slow query on %s",
//!     &["users".into()],
//!     logtree::context! { "elapsed_ms" => 412 },
//! );
//! ```
//!
//! Rotating JSON logs on disk:
//!
//! ```no_run
//! use logtree::formatter::JsonFormatter;
//! use logtree::sink::RotatingFileSink;
//! use logtree::sink::Sink;
//!
//! let sink = RotatingFileSink::new("logs/app.log")
//!     .max_bytes(10 * 1024 * 1024)
//!     .backup_count(5);
//! sink.set_formatter(JsonFormatter::default().into());
//!
//! let logger = logtree::builder("app").sink(sink).build();
//! logger.info("this record lands in logs/app.log");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod formatter;
pub mod sink;
pub mod trap;

mod error;
mod format;
mod logger;
mod record;
mod registry;

pub use error::SinkError;
pub use logger::Logger;
pub use logger::LoggerBuilder;
pub use logger::builder;
pub use record::Context;
pub use record::KEY_EXC_INFO;
pub use record::KEY_EXC_TEXT;
pub use record::Level;
pub use record::ParseLevelError;
pub use record::Record;
pub use record::RecordBuilder;
pub use registry::Registry;
pub use serde_json::Value;

/// Build a [`Context`] from `key => value` pairs.
///
/// Values may be anything convertible into a [`Value`]: strings, numbers,
/// booleans, or prepared JSON values.
///
/// # Examples
///
/// ```
/// let context = logtree::context! {
///     "user" => "alice",
///     "attempt" => 3,
///     "cached" => false,
/// };
/// assert_eq!(context.len(), 3);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::Context::new();
        $(context.insert($key, $crate::Value::from($value));)+
        context
    }};
}
