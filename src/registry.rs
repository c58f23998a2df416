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

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logger::Logger;

/// An owned name→logger map.
///
/// The registry is a plain value the application owns and passes to call
/// sites that need lookup; there is no process-global instance. Closing a
/// logger through the registry flushes and closes its sinks, and
/// [`close_all`](Registry::close_all) is the orderly shutdown of everything
/// registered.
#[derive(Debug, Default)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Look up a registered logger by name.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    /// Register a logger under its own name, replacing any previous entry.
    pub fn register(&self, logger: Arc<Logger>) {
        self.loggers
            .lock()
            .insert(logger.name().to_string(), logger);
    }

    /// Close a logger's sinks and drop it from the registry.
    ///
    /// Returns whether a logger with that name was registered.
    pub fn close(&self, name: &str) -> bool {
        match self.loggers.lock().remove(name) {
            Some(logger) => {
                logger.close();
                true
            }
            None => false,
        }
    }

    /// Close every registered logger.
    pub fn close_all(&self) {
        for (_, logger) in self.loggers.lock().drain() {
            logger.close();
        }
    }

    /// Snapshot the registered loggers.
    pub fn loggers(&self) -> Vec<Arc<Logger>> {
        self.loggers.lock().values().cloned().collect()
    }
}
