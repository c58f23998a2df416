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

use std::io;
use std::io::Write;

use crate::error::SinkError;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// A sink that prints log records to the console.
///
/// By default the stream is chosen per record: `Error` and `Critical` records
/// go to standard error, everything else to standard output. Use
/// [`stdout`](ConsoleSink::stdout) or [`stderr`](ConsoleSink::stderr) to pin
/// a stream.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    core: SinkCore,
    stream: Option<Stream>,
}

impl ConsoleSink {
    /// Creates a sink that routes records by severity.
    pub fn new() -> ConsoleSink {
        ConsoleSink::default()
    }

    /// Creates a sink pinned to standard output.
    pub fn stdout() -> ConsoleSink {
        ConsoleSink {
            core: SinkCore::new(),
            stream: Some(Stream::Stdout),
        }
    }

    /// Creates a sink pinned to standard error.
    pub fn stderr() -> ConsoleSink {
        ConsoleSink {
            core: SinkCore::new(),
            stream: Some(Stream::Stderr),
        }
    }

    fn stream_for(&self, record: &Record) -> Stream {
        self.stream.unwrap_or(if record.level() >= Level::Error {
            Stream::Stderr
        } else {
            Stream::Stdout
        })
    }
}

impl Sink for ConsoleSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let mut line = self.core.format(record);
        line.push('\n');
        match self.stream_for(record) {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.flush()?;
            }
            Stream::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(line.as_bytes())?;
                out.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        match self.stream {
            Some(Stream::Stdout) => io::stdout().flush()?,
            Some(Stream::Stderr) => io::stderr().flush()?,
            None => {
                io::stdout().flush()?;
                io::stderr().flush()?;
            }
        }
        Ok(())
    }
}
