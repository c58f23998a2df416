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
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;

/// Open `path` for appending, creating parent directories on demand.
pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().append(true).create(true).open(path)
}

/// A sink that appends log records to a single file.
///
/// The file is opened lazily on the first emission and kept open afterwards;
/// every record is flushed through to disk.
#[derive(Debug)]
pub struct FileSink {
    core: SinkCore,
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileSink {
    /// Creates a sink appending to the given path.
    pub fn new(path: impl Into<PathBuf>) -> FileSink {
        FileSink {
            core: SinkCore::new(),
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// The path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let line = self.core.format(record);

        let mut guard = self.file.lock();
        if guard.is_none() {
            *guard = Some(open_append(&self.path)?);
        }
        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        if let Some(mut file) = self.file.lock().take() {
            file.flush()?;
        }
        Ok(())
    }
}
