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

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::trap::Trap;

/// A trap that buffers reported errors so tests can assert on them.
#[derive(Debug, Default)]
pub struct CollectingTrap {
    errors: Mutex<Vec<String>>,
}

impl CollectingTrap {
    /// Create an empty collecting trap.
    pub fn new() -> CollectingTrap {
        CollectingTrap::default()
    }

    /// Snapshot the reported error messages.
    pub fn messages(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Drop all buffered messages.
    pub fn clear(&self) {
        self.errors.lock().clear();
    }
}

impl Trap for CollectingTrap {
    fn trap(&self, error: &SinkError) {
        self.errors.lock().push(error.to_string());
    }
}
