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

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::SinkCore;

/// A sink that discards every record.
#[derive(Debug, Default)]
pub struct NullSink {
    core: SinkCore,
}

impl NullSink {
    /// Creates a discarding sink.
    pub fn new() -> NullSink {
        NullSink::default()
    }
}

impl Sink for NullSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, _record: &Record) -> Result<(), SinkError> {
        Ok(())
    }
}
