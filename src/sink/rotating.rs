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
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;
use crate::sink::file::open_append;
use crate::trap;

/// A sink that appends to a file and rotates it by size.
///
/// When the running byte counter reaches `max_bytes`, the current file is
/// rotated before the next record is written: existing backups shift from
/// `path.i` to `path.(i+1)` up to `backup_count`, the current file becomes
/// `path.1`, and a fresh file is opened. A single record may still push a
/// file over the threshold; that triggers the next rotation, records are
/// never split.
///
/// `max_files` caps the total number of backups on disk independently of
/// `backup_count`: after every rotation the oldest files matching `path.*`
/// are deleted until at most `max_files` remain.
///
/// # Examples
///
/// ```no_run
/// use logtree::sink::RotatingFileSink;
///
/// let sink = RotatingFileSink::new("logs/app.log")
///     .max_bytes(10 * 1024 * 1024)
///     .backup_count(5)
///     .max_files(20);
/// ```
#[derive(Debug)]
pub struct RotatingFileSink {
    core: SinkCore,
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    max_files: usize,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    file: Option<File>,
    written: u64,
}

impl RotatingFileSink {
    /// Creates a sink rotating at 10 MiB with 5 numbered backups and a
    /// retention ceiling of 100 files.
    pub fn new(path: impl Into<PathBuf>) -> RotatingFileSink {
        RotatingFileSink {
            core: SinkCore::new(),
            path: path.into(),
            max_bytes: 10 * 1024 * 1024,
            backup_count: 5,
            max_files: 100,
            state: Mutex::new(State::default()),
        }
    }

    /// Sets the size threshold that triggers a rotation.
    #[must_use]
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Sets how many numbered backups take part in the rename cascade.
    ///
    /// Zero keeps no backups: the current file is truncated in place.
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

    fn rotate(&self, state: &mut State) -> Result<(), SinkError> {
        state.file = None;

        if self.backup_count > 0 {
            for i in (1..self.backup_count).rev() {
                let src = numbered_path(&self.path, i);
                if !src.exists() {
                    continue;
                }
                let dst = numbered_path(&self.path, i + 1);
                if dst.exists() {
                    fs::remove_file(&dst).map_err(|source| SinkError::Rotation {
                        path: dst.clone(),
                        source,
                    })?;
                }
                fs::rename(&src, &dst).map_err(|source| SinkError::Rotation {
                    path: src.clone(),
                    source,
                })?;
            }
            if self.path.exists() {
                let dst = numbered_path(&self.path, 1);
                fs::rename(&self.path, &dst).map_err(|source| SinkError::Rotation {
                    path: self.path.clone(),
                    source,
                })?;
            }
        } else if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| SinkError::Rotation {
                path: self.path.clone(),
                source,
            })?;
        }

        prune_backups(&self.path, self.max_files);

        state.file = Some(open_append(&self.path)?);
        state.written = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.core.format(record);

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.file.is_none() {
            let file = open_append(&self.path)?;
            state.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            state.file = Some(file);
        }
        if state.written >= self.max_bytes {
            self.rotate(state)?;
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
            state.written += line.len() as u64 + 1;
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

fn numbered_path(path: &Path, index: usize) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(format!(".{index}"));
    PathBuf::from(os)
}

/// Delete the oldest files matching `path.*` until at most `keep` remain.
///
/// Best-effort: every failure is reported to the trap and pruning continues,
/// so a file held open elsewhere never blocks a rotation.
pub(crate) fn prune_backups(path: &Path, keep: usize) {
    let mut backups = match list_backups(path) {
        Ok(backups) => backups,
        Err(source) => {
            trap::report(&SinkError::Retention {
                path: path.to_path_buf(),
                source,
            });
            return;
        }
    };
    if backups.len() <= keep {
        return;
    }

    // Sort by modification time, oldest first.
    backups.sort_by_key(|(_, modified)| *modified);
    let excess = backups.len() - keep;
    for (backup, _) in backups.into_iter().take(excess) {
        if let Err(source) = fs::remove_file(&backup) {
            trap::report(&SinkError::Retention {
                path: backup,
                source,
            });
        }
    }
}

fn list_backups(path: &Path) -> io::Result<Vec<(PathBuf, SystemTime)>> {
    let file_name = match path.file_name().and_then(|name| name.to_str()) {
        Some(file_name) => file_name,
        None => return Ok(vec![]),
    };
    let prefix = format!("{file_name}.");
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let backups = fs::read_dir(dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let metadata = entry.metadata().ok()?;

            // The sink only creates files, so never consider a dir or symlink.
            if !metadata.is_file() {
                return None;
            }

            let name = entry.file_name();
            let name = name.to_str()?;
            if !name.starts_with(&prefix) {
                return None;
            }

            let modified = metadata.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect();
    Ok(backups)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use rand::Rng;
    use tempfile::TempDir;

    use super::*;
    use crate::formatter::CustomFormatter;
    use crate::record::Level;
    use crate::record::Record;

    fn message_only_sink(sink: &RotatingFileSink) {
        sink.set_formatter(CustomFormatter::new(|record| Ok(record.message().to_string())).into());
    }

    fn record(message: &str) -> Record {
        Record::builder()
            .logger_name("test")
            .level(Level::Info)
            .message(message)
            .build()
    }

    #[test]
    fn test_rotation_happens_before_the_write() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path).max_bytes(100).backup_count(3);
        message_only_sink(&sink);

        // 31 bytes per line including the newline.
        let payload = "x".repeat(30);
        for _ in 0..4 {
            sink.handle(&record(&payload)).unwrap();
        }
        // 124 bytes written, over the threshold; the next record must land in
        // a fresh file.
        sink.handle(&record(&payload)).unwrap();

        let backup = fs::read_to_string(numbered_path(&path, 1)).unwrap();
        assert_eq!(backup.lines().count(), 4);
        let current = fs::read_to_string(&path).unwrap();
        assert_eq!(current.lines().count(), 1);
    }

    #[test]
    fn test_backup_numbering_is_bounded() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path)
            .max_bytes(10)
            .backup_count(2)
            .max_files(100);
        message_only_sink(&sink);

        for i in 0..8 {
            sink.handle(&record(&format!("record number {i}"))).unwrap();
        }

        assert!(path.exists());
        assert!(numbered_path(&path, 1).exists());
        assert!(numbered_path(&path, 2).exists());
        assert!(!numbered_path(&path, 3).exists());
    }

    #[test]
    fn test_zero_backups_truncate_in_place() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path).max_bytes(10).backup_count(0);
        message_only_sink(&sink);

        sink.handle(&record("a record that exceeds ten bytes")).unwrap();
        sink.handle(&record("fresh")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        assert!(!numbered_path(&path, 1).exists());
    }

    #[test]
    fn test_retention_ceiling_is_independent_of_backup_count() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = RotatingFileSink::new(&path)
            .max_bytes(10)
            .backup_count(10)
            .max_files(3);
        message_only_sink(&sink);

        for _ in 0..8 {
            sink.handle(&record(&generate_random_string())).unwrap();
            // Keep modification times apart so oldest-first pruning is stable.
            thread::sleep(Duration::from_millis(10));
        }

        let backups = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().to_str()?.to_string();
                name.starts_with("app.log.").then_some(name)
            })
            .collect::<Vec<_>>();
        assert_eq!(backups.len(), 3, "{backups:?}");
    }

    #[test]
    fn test_byte_counter_resumes_from_existing_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "x".repeat(120)).unwrap();

        let sink = RotatingFileSink::new(&path).max_bytes(100).backup_count(1);
        message_only_sink(&sink);
        sink.handle(&record("fresh")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        assert!(numbered_path(&path, 1).exists());
    }

    #[test]
    fn test_concurrent_emissions_never_lose_records() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        let sink = Arc::new(
            RotatingFileSink::new(&path)
                .max_bytes(256)
                .backup_count(64)
                .max_files(1000),
        );
        message_only_sink(&sink);

        let mut handles = vec![];
        for worker in 0..4 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    sink.handle(&record(&format!("worker {worker} record {i}")))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let mut lines = 0;
        for entry in fs::read_dir(temp_dir.path()).unwrap() {
            let entry = entry.unwrap();
            lines += fs::read_to_string(entry.path()).unwrap().lines().count();
        }
        assert_eq!(lines, 200);
    }

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        std::iter::repeat_with(|| rng.sample(rand::distr::Alphanumeric))
            .map(char::from)
            .take(len)
            .collect()
    }
}
