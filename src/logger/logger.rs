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
use std::sync::Weak;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use parking_lot::RwLock;
use serde_json::Value;

use crate::format::interpolate;
use crate::record::Context;
use crate::record::KEY_EXC_INFO;
use crate::record::KEY_EXC_TEXT;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::trap;

/// A named node in the logger hierarchy.
///
/// A logger holds a level threshold and an ordered list of sinks. An accepted
/// log call builds one [`Record`], hands it to each sink in insertion order,
/// and then relays it to the parent logger unless propagation is switched
/// off. Sink failures are reported to the [trap](crate::trap) and never reach
/// the caller.
///
/// Loggers are shared via `Arc` and safe to use from multiple threads; the
/// level gate is a single atomic load, so a filtered-out call costs nothing.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: AtomicU8,
    propagate: AtomicBool,
    parent: Option<Weak<Logger>>,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
    children: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Logger {
    /// Create a root logger with the given name at the default `Info` level.
    pub fn new(name: impl Into<String>) -> Arc<Logger> {
        Logger::with_config(name.into(), Level::Info, true, vec![])
    }

    pub(crate) fn with_config(
        name: String,
        level: Level,
        propagate: bool,
        sinks: Vec<Arc<dyn Sink>>,
    ) -> Arc<Logger> {
        Arc::new(Logger {
            name,
            level: AtomicU8::new(level as u8),
            propagate: AtomicBool::new(propagate),
            parent: None,
            sinks: RwLock::new(sinks),
            children: Mutex::new(HashMap::new()),
        })
    }

    /// The dotted hierarchical name of this logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The minimum level this logger accepts.
    pub fn level(&self) -> Level {
        Level::from_index(self.level.load(Ordering::Relaxed))
    }

    /// Set the minimum level this logger accepts.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether records are relayed to the parent logger.
    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    /// Switch relaying to the parent logger on or off.
    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Relaxed);
    }

    /// Append a sink to this logger's dispatch list.
    pub fn add_sink(&self, sink: Arc<dyn Sink>) {
        self.sinks.write().push(sink);
    }

    /// Remove a sink by identity. Returns whether it was attached.
    pub fn remove_sink(&self, sink: &Arc<dyn Sink>) -> bool {
        let mut sinks = self.sinks.write();
        match sinks.iter().position(|s| Arc::ptr_eq(s, sink)) {
            Some(position) => {
                sinks.remove(position);
                true
            }
            None => false,
        }
    }

    /// Detach every sink from this logger.
    pub fn clear_sinks(&self) {
        self.sinks.write().clear();
    }

    /// Snapshot the sinks attached to this logger, in emission order.
    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.sinks.read().clone()
    }

    /// Get or create the child logger with the given relative name.
    ///
    /// Repeated calls with the same name return the same instance. A new
    /// child is named `parent.name + "." + name` and starts with the
    /// parent's current level and a copy of its sink list; the copy shares
    /// the sink objects but later changes to the parent's list do not affect
    /// the child.
    pub fn get_child(self: &Arc<Self>, name: &str) -> Arc<Logger> {
        let mut children = self.children.lock();
        if let Some(child) = children.get(name) {
            return Arc::clone(child);
        }

        let child = Arc::new(Logger {
            name: format!("{}.{}", self.name, name),
            level: AtomicU8::new(self.level.load(Ordering::Relaxed)),
            propagate: AtomicBool::new(true),
            parent: Some(Arc::downgrade(self)),
            sinks: RwLock::new(self.sinks.read().clone()),
            children: Mutex::new(HashMap::new()),
        });
        children.insert(name.to_string(), Arc::clone(&child));
        child
    }

    /// Whether a record at `level` would pass this logger's gate.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 >= self.level.load(Ordering::Relaxed)
    }

    /// Log a plain message at the given level.
    pub fn log(&self, level: Level, message: &str) {
        self.log_with(level, message, &[], Context::new());
    }

    /// Log a message with `%s` positional substitutions and structured
    /// context.
    ///
    /// When the level gate rejects the call, no interpolation happens and no
    /// record is built.
    pub fn log_with(&self, level: Level, message: &str, args: &[Value], context: Context) {
        if !self.enabled(level) {
            return;
        }
        let record = Record::builder()
            .logger_name(self.name.clone())
            .level(level)
            .message(interpolate(message, args))
            .context(context)
            .build();
        self.dispatch(&record);
    }

    /// Log a message at the `Debug` level.
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Log a message at the `Info` level.
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Log a message at the `Warning` level.
    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    /// Log a message at the `Error` level.
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Log a message at the `Critical` level.
    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }

    /// Log an error with its rendered cause chain at the `Error` level.
    ///
    /// The record carries `exc_info = true` and the chain under `exc_text`.
    pub fn exception(&self, message: &str, error: &(dyn std::error::Error + 'static)) {
        self.exception_with(message, Some(error), Context::new());
    }

    /// Like [`exception`](Logger::exception), with extra context and an
    /// optional error value. Without an error, a backtrace of the call site
    /// is captured instead.
    pub fn exception_with(
        &self,
        message: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
        mut context: Context,
    ) {
        if !self.enabled(Level::Error) {
            return;
        }
        context.insert(KEY_EXC_INFO, true);
        context.insert(KEY_EXC_TEXT, render_exc_text(error));
        self.log_with(Level::Error, message, &[], context);
    }

    fn dispatch(&self, record: &Record) {
        let sinks = self.sinks.read().clone();
        for sink in &sinks {
            if let Err(err) = sink.handle(record) {
                trap::report(&err);
            }
        }

        // The parent receives the record as-is: its own gate applies to calls
        // made on it directly, not to records relayed from below.
        if self.propagate.load(Ordering::Relaxed) {
            if let Some(parent) = self.parent.as_ref().and_then(Weak::upgrade) {
                parent.dispatch(record);
            }
        }
    }

    /// Flush every sink attached to this logger.
    pub fn flush(&self) {
        for sink in self.sinks.read().iter() {
            if let Err(err) = sink.flush() {
                trap::report(&err);
            }
        }
    }

    /// Flush and close every sink attached to this logger.
    pub fn close(&self) {
        for sink in self.sinks.read().iter() {
            if let Err(err) = sink.close() {
                trap::report(&err);
            }
        }
    }
}

fn render_exc_text(error: Option<&(dyn std::error::Error + 'static)>) -> String {
    match error {
        Some(error) => {
            let mut text = error.to_string();
            let mut source = error.source();
            while let Some(cause) = source {
                text.push_str("\ncaused by: ");
                text.push_str(&cause.to_string());
                source = cause.source();
            }
            text
        }
        None => std::backtrace::Backtrace::force_capture().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_names_compose() {
        let root = Logger::new("app");
        let child = root.get_child("db");
        let grandchild = child.get_child("pool");
        assert_eq!(child.name(), "app.db");
        assert_eq!(grandchild.name(), "app.db.pool");
    }

    #[test]
    fn test_child_inherits_level_at_creation() {
        let root = Logger::new("app");
        root.set_level(Level::Warning);
        let child = root.get_child("db");
        assert_eq!(child.level(), Level::Warning);

        root.set_level(Level::Debug);
        assert_eq!(child.level(), Level::Warning);
    }
}
