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

//! Sinks that deliver log records to their destinations.

use std::fmt;

use parking_lot::RwLock;

use crate::error::SinkError;
use crate::formatter::Formatter;
use crate::record::Level;
use crate::record::Record;
use crate::trap;

pub use self::console::ConsoleSink;
pub use self::file::FileSink;
pub use self::memory::MemorySink;
pub use self::null::NullSink;
pub use self::rotating::RotatingFileSink;
pub use self::timed::Period;
pub use self::timed::TimedRotatingFileSink;

mod console;
mod file;
mod memory;
mod null;
mod rotating;
mod timed;

/// A trait representing a sink that can deliver log records.
///
/// Implementors provide [`emit`](Sink::emit) and embed a [`SinkCore`] for the
/// shared formatter and level-filter state. A sink may be attached to several
/// loggers at once; all of its mutable state must sit behind its own lock so
/// concurrent emissions do not interleave.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// The shared formatter and level-filter state of this sink.
    fn core(&self) -> &SinkCore;

    /// Deliver a log record to the sink target.
    fn emit(&self, record: &Record) -> Result<(), SinkError>;

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Release the resources held by the sink.
    ///
    /// Default to a flush.
    fn close(&self) -> Result<(), SinkError> {
        self.flush()
    }

    /// Process one record: apply the per-sink level filter, then emit.
    fn handle(&self, record: &Record) -> Result<(), SinkError> {
        if !self.core().accepts(record.level()) {
            return Ok(());
        }
        self.emit(record)
    }

    /// Set the formatter used to render records for this sink.
    ///
    /// Visible to every logger the sink is attached to.
    fn set_formatter(&self, formatter: Formatter) {
        *self.core().formatter.write() = Some(formatter);
    }

    /// Set the minimum level this sink accepts, independent of the owning
    /// logger's threshold. `None` accepts everything.
    fn set_level(&self, level: Option<Level>) {
        *self.core().level.write() = level;
    }

    /// The per-sink level filter, if any.
    fn level(&self) -> Option<Level> {
        *self.core().level.read()
    }
}

/// State shared by every sink variant: the optional formatter and the
/// optional per-sink level filter.
#[derive(Debug, Default)]
pub struct SinkCore {
    formatter: RwLock<Option<Formatter>>,
    level: RwLock<Option<Level>>,
}

impl SinkCore {
    /// Create an empty core: no formatter installed, no level filter.
    pub fn new() -> SinkCore {
        SinkCore::default()
    }

    fn accepts(&self, level: Level) -> bool {
        match *self.level.read() {
            Some(threshold) => level >= threshold,
            None => true,
        }
    }

    /// Render a record with the installed formatter.
    ///
    /// The default [`SimpleFormatter`](crate::formatter::SimpleFormatter) is
    /// installed lazily on first use. A formatter failure is reported to the
    /// trap and downgraded to a raw `LEVEL name: message` line, so rendering
    /// itself never fails.
    pub fn format(&self, record: &Record) -> String {
        {
            let guard = self.formatter.read();
            if let Some(formatter) = guard.as_ref() {
                return match formatter.format(record) {
                    Ok(line) => line,
                    Err(err) => {
                        trap::report(&SinkError::Format(err));
                        raw_line(record)
                    }
                };
            }
        }

        let mut guard = self.formatter.write();
        let formatter = guard.get_or_insert_with(Formatter::default);
        match formatter.format(record) {
            Ok(line) => line,
            Err(err) => {
                trap::report(&SinkError::Format(err));
                raw_line(record)
            }
        }
    }
}

fn raw_line(record: &Record) -> String {
    format!(
        "{} {}: {}",
        record.level(),
        record.logger_name(),
        record.message()
    )
}
