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

use std::sync::Arc;

use crate::Registry;
use crate::logger::Logger;
use crate::record::Level;
use crate::sink::Sink;

/// Create a new [`LoggerBuilder`] for configuring a root logger.
///
/// # Examples
///
/// ```
/// use logtree::Level;
/// use logtree::sink::ConsoleSink;
///
/// let logger = logtree::builder("app")
///     .level(Level::Debug)
///     .sink(ConsoleSink::stdout())
///     .build();
///
/// logger.info("service starting");
/// ```
pub fn builder(name: impl Into<String>) -> LoggerBuilder {
    LoggerBuilder {
        name: name.into(),
        level: Level::Info,
        propagate: true,
        sinks: vec![],
    }
}

/// A builder for configuring a root [`Logger`].
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: Level,
    propagate: bool,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    /// Set the minimum level the logger accepts.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set whether records are relayed to a parent logger.
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Attach a sink owned by this logger.
    pub fn sink(mut self, sink: impl Sink) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Attach an already-shared sink, for example one also attached to
    /// another logger.
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Build the configured [`Logger`].
    pub fn build(self) -> Arc<Logger> {
        Logger::with_config(self.name, self.level, self.propagate, self.sinks)
    }

    /// Build the logger and register it under its name.
    pub fn register(self, registry: &Registry) -> Arc<Logger> {
        let logger = self.build();
        registry.register(Arc::clone(&logger));
        logger
    }
}
