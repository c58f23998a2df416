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

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;
use jiff::fmt::strtime;
use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;
use crate::sink::file::open_append;
use crate::sink::rotating::prune_backups;

const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Defines the period after which a [`TimedRotatingFileSink`] rotates.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Period {
    /// Rotate when the calendar date changes.
    ///
    /// This compares dates, not elapsed time: a process that sits idle across
    /// midnight rotates on its next emission.
    Midnight,
    /// Rotate after `interval` hours have elapsed.
    Hourly,
    /// Rotate after `interval` minutes have elapsed.
    Minutely,
}

/// A sink that appends to a file and rotates it on a time schedule.
///
/// The rotation decision is driven by record timestamps rather than the wall
/// clock at call time. A rotated file is renamed to
/// `path.<YYYYMMDD_HHMMSS>` stamped with the start of the period it covers,
/// and the `min(backup_count, max_files)` most recent backups are retained.
///
/// # Examples
///
/// ```no_run
/// use logtree::sink::Period;
/// use logtree::sink::TimedRotatingFileSink;
///
/// let sink = TimedRotatingFileSink::new("logs/app.log")
///     .period(Period::Hourly)
///     .interval(6)
///     .backup_count(28);
/// ```
#[derive(Debug)]
pub struct TimedRotatingFileSink {
    core: SinkCore,
    path: PathBuf,
    period: Period,
    interval: u32,
    backup_count: usize,
    max_files: usize,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    file: Option<File>,
    last_rotation: Zoned,
}

impl TimedRotatingFileSink {
    /// Creates a sink rotating at midnight with 5 backups and a retention
    /// ceiling of 100 files.
    pub fn new(path: impl Into<PathBuf>) -> TimedRotatingFileSink {
        TimedRotatingFileSink {
            core: SinkCore::new(),
            path: path.into(),
            period: Period::Midnight,
            interval: 1,
            backup_count: 5,
            max_files: 100,
            state: Mutex::new(State {
                file: None,
                last_rotation: Zoned::now(),
            }),
        }
    }

    /// Sets the rotation period.
    #[must_use]
    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Sets the period multiplier for `Hourly` and `Minutely` rotation.
    ///
    /// `Midnight` rotation ignores the interval.
    #[must_use]
    pub fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets how many timestamped backups to keep.
    #[must_use]
    pub fn backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = backup_count;
        self
    }

    /// Sets the hard ceiling on retained backup files.
    #[must_use]
    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// The path of the current log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn should_rotate(&self, last: &Zoned, now: &Zoned) -> bool {
        match self.period {
            Period::Midnight => now.date() != last.date(),
            Period::Hourly => elapsed_seconds(last, now) >= 3600 * i64::from(self.interval),
            Period::Minutely => elapsed_seconds(last, now) >= 60 * i64::from(self.interval),
        }
    }

    fn rotate(&self, state: &mut State, now: &Zoned) -> Result<(), SinkError> {
        state.file = None;

        if self.path.exists() {
            let stamp = strtime::format(BACKUP_STAMP_FORMAT, &state.last_rotation)
                .unwrap_or_else(|_| state.last_rotation.timestamp().as_second().to_string());
            let backup = stamped_path(&self.path, &stamp);
            fs::rename(&self.path, &backup).map_err(|source| SinkError::Rotation {
                path: self.path.clone(),
                source,
            })?;
        }

        prune_backups(&self.path, self.backup_count.min(self.max_files));

        state.last_rotation = now.clone();
        state.file = Some(open_append(&self.path)?);
        Ok(())
    }

    #[cfg(test)]
    fn set_last_rotation(&self, last: Zoned) {
        self.state.lock().last_rotation = last;
    }
}

fn elapsed_seconds(last: &Zoned, now: &Zoned) -> i64 {
    now.timestamp().as_second() - last.timestamp().as_second()
}

fn stamped_path(path: &Path, stamp: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(format!(".{stamp}"));
    PathBuf::from(os)
}

impl Sink for TimedRotatingFileSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.core.format(record);

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if self.should_rotate(&state.last_rotation, record.timestamp()) {
            self.rotate(state, record.timestamp())?;
        }
        if state.file.is_none() {
            state.file = Some(open_append(&self.path)?);
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        if let Some(file) = self.state.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        if let Some(mut file) = self.state.lock().file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jiff::Span;
    use jiff::Zoned;
    use tempfile::TempDir;

    use super::*;
    use crate::formatter::CustomFormatter;
    use crate::record::Level;
    use crate::record::Record;

    fn message_only_sink(sink: &TimedRotatingFileSink) {
        sink.set_formatter(CustomFormatter::new(|record| Ok(record.message().to_string())).into());
    }

    fn record_at(message: &str, timestamp: &Zoned) -> Record {
        Record::builder()
            .logger_name("test")
            .level(Level::Info)
            .message(message)
            .timestamp(timestamp.clone())
            .build()
    }

    #[test]
    fn test_midnight_rotation_is_calendar_based() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = TimedRotatingFileSink::new(&path).period(Period::Midnight);
        message_only_sink(&sink);

        let noon: Zoned = "2024-01-15T12:00:00[UTC]".parse().unwrap();
        sink.set_last_rotation(noon.clone());

        let evening = &noon + Span::new().hours(6);
        sink.handle(&record_at("same day", &evening)).unwrap();
        assert!(!path_has_backups(temp_dir.path()));

        let next_morning = &noon + Span::new().hours(13);
        sink.handle(&record_at("new day", &next_morning)).unwrap();

        let backup = stamped_path(&path, "20240115_120000");
        assert_eq!(fs::read_to_string(backup).unwrap(), "same day\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new day\n");
    }

    #[test]
    fn test_same_date_never_rotates() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = TimedRotatingFileSink::new(&path).period(Period::Midnight);
        message_only_sink(&sink);

        let start: Zoned = "2024-01-15T00:00:01[UTC]".parse().unwrap();
        sink.set_last_rotation(start.clone());
        for hour in 0..24 {
            let timestamp = &start + Span::new().minutes(59 * hour);
            sink.handle(&record_at("tick", &timestamp)).unwrap();
        }

        assert!(!path_has_backups(temp_dir.path()));
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 24);
    }

    #[test]
    fn test_hourly_rotation_respects_interval() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = TimedRotatingFileSink::new(&path)
            .period(Period::Hourly)
            .interval(2);
        message_only_sink(&sink);

        let start: Zoned = "2024-01-15T10:00:00[UTC]".parse().unwrap();
        sink.set_last_rotation(start.clone());

        sink.handle(&record_at("after one hour", &(&start + Span::new().hours(1))))
            .unwrap();
        assert!(!path_has_backups(temp_dir.path()));

        sink.handle(&record_at("after two hours", &(&start + Span::new().hours(2))))
            .unwrap();
        let backup = stamped_path(&path, "20240115_100000");
        assert_eq!(fs::read_to_string(backup).unwrap(), "after one hour\n");
    }

    #[test]
    fn test_retention_keeps_min_of_backup_count_and_max_files() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = TimedRotatingFileSink::new(&path)
            .period(Period::Minutely)
            .backup_count(10)
            .max_files(2);
        message_only_sink(&sink);

        let start: Zoned = "2024-01-15T10:00:00[UTC]".parse().unwrap();
        sink.set_last_rotation(start.clone());
        for minute in 0..6 {
            let timestamp = &start + Span::new().minutes(minute);
            sink.handle(&record_at("tick", &timestamp)).unwrap();
        }

        let backups = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().to_str()?.to_string();
                name.starts_with("app.log.").then_some(name)
            })
            .collect::<Vec<_>>();
        assert_eq!(backups.len(), 2, "{backups:?}");
    }

    fn path_has_backups(dir: &Path) -> bool {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with("app.log."))
            })
    }
}
