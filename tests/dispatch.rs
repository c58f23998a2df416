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
use std::io;
use std::sync::Arc;

use logtree::Level;
use logtree::Record;
use logtree::SinkError;
use logtree::Value;
use logtree::formatter::CustomFormatter;
use logtree::sink::FileSink;
use logtree::sink::MemorySink;
use logtree::sink::Sink;
use logtree::sink::SinkCore;
use logtree::trap;
use logtree::trap::CollectingTrap;

#[derive(Debug, Default)]
struct FailingSink {
    core: SinkCore,
}

impl Sink for FailingSink {
    fn core(&self) -> &SinkCore {
        &self.core
    }

    fn emit(&self, _record: &Record) -> Result<(), SinkError> {
        Err(SinkError::Io(io::Error::other("sink is broken")))
    }
}

#[test]
fn test_failing_sink_does_not_starve_healthy_sinks() {
    let trap = Arc::new(CollectingTrap::new());
    trap::set_trap(trap.clone());

    let memory = Arc::new(MemorySink::new(100));
    let logger = logtree::builder("app")
        .sink(FailingSink::default())
        .shared_sink(memory.clone())
        .build();

    for i in 0..5 {
        logger.log_with(
            Level::Info,
            "message %s",
            &[Value::from(i)],
            logtree::Context::new(),
        );
    }

    // The healthy sink, listed after the broken one, received everything.
    assert_eq!(memory.len(), 5);

    // And every failure was reported to the diagnostic trap.
    let messages = trap.messages();
    assert_eq!(messages.len(), 5);
    assert!(messages[0].contains("sink is broken"), "{messages:?}");
}

#[test]
fn test_formatter_failure_degrades_to_a_raw_line() {
    let temp_dir = tempfile::tempdir().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("out.log");

    let sink = FileSink::new(&path);
    sink.set_formatter(CustomFormatter::new(|_| anyhow::bail!("refusing to render")).into());

    let logger = logtree::builder("app").sink(sink).build();
    logger.info("still delivered");

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "INFO app: still delivered\n");
}

#[test]
fn test_exception_records_carry_the_error_chain() {
    let memory = Arc::new(MemorySink::new(10));
    let logger = logtree::builder("app").shared_sink(memory.clone()).build();

    let error = io::Error::other("disk offline");
    logger.exception("write failed", &error);

    let records = memory.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level(), Level::Error);
    assert_eq!(record.context().get("exc_info"), Some(&Value::Bool(true)));
    assert!(record.exc_text().unwrap().contains("disk offline"));
}

#[test]
fn test_exception_without_an_error_captures_a_backtrace() {
    let memory = Arc::new(MemorySink::new(10));
    let logger = logtree::builder("app").shared_sink(memory.clone()).build();

    logger.exception_with("unexpected state", None, logtree::context! { "phase" => "boot" });

    let records = memory.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].exc_text().is_some());
    assert_eq!(
        records[0].context().get("phase"),
        Some(&Value::from("boot"))
    );
}

#[test]
fn test_default_formatter_is_installed_lazily() {
    let temp_dir = tempfile::tempdir().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("out.log");

    // No formatter configured anywhere.
    let logger = logtree::builder("app").sink(FileSink::new(&path)).build();
    logger.warning("plain by default");

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("WARNING"), "{content}");
    assert!(content.contains("app"), "{content}");
    assert!(content.contains("plain by default"), "{content}");
}
