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

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;

/// A sink that keeps the most recent records in a bounded ring buffer.
///
/// Useful for tests and for exposing a "last N events" view without touching
/// disk. Once `capacity` records are buffered, each new record evicts the
/// oldest one.
#[derive(Debug)]
pub struct MemorySink {
    core: SinkCore,
    capacity: usize,
    buffer: Mutex<VecDeque<Record>>,
}

impl Default for MemorySink {
    fn default() -> Self {
        MemorySink::new(1000)
    }
}

impl MemorySink {
    /// Creates a sink retaining up to `capacity` records.
    pub fn new(capacity: usize) -> MemorySink {
        MemorySink {
            core: SinkCore::new(),
            capacity,
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Snapshot the buffered records, oldest first.
    pub fn records(&self) -> Vec<Record> {
        self.buffer.lock().iter().cloned().collect()
    }

    /// The number of buffered records.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Drop all buffered records.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        let mut buffer = self.buffer.lock();
        buffer.push_back(record.clone());
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
        Ok(())
    }
}
