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
use std::path::Path;
use std::thread;
use std::time::Duration;

use jiff::Span;
use jiff::Zoned;
use logtree::Level;
use logtree::Record;
use logtree::formatter::CustomFormatter;
use logtree::sink::RotatingFileSink;
use logtree::sink::Sink;
use logtree::sink::TimedRotatingFileSink;

fn message_only(sink: &dyn Sink) {
    sink.set_formatter(CustomFormatter::new(|record| Ok(record.message().to_string())).into());
}

fn backups(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let name = entry.ok()?.file_name().to_str()?.to_string();
            name.starts_with(prefix).then_some(name)
        })
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[test]
fn test_size_rotation_through_the_logger() {
    let temp_dir = tempfile::tempdir().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let sink = RotatingFileSink::new(&path)
        .max_bytes(64)
        .backup_count(3)
        .max_files(10);
    message_only(&sink);

    let logger = logtree::builder("app").sink(sink).build();
    for i in 0..32 {
        logger.info(&format!("a fairly long record payload {i:02}"));
    }

    assert!(path.exists());
    let names = backups(temp_dir.path(), "app.log.");
    assert_eq!(names, vec!["app.log.1", "app.log.2", "app.log.3"]);
}

#[test]
fn test_retention_ceiling_through_the_logger() {
    let temp_dir = tempfile::tempdir().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let sink = RotatingFileSink::new(&path)
        .max_bytes(16)
        .backup_count(10)
        .max_files(2);
    message_only(&sink);

    let logger = logtree::builder("app").sink(sink).build();
    for i in 0..10 {
        logger.info(&format!("record payload number {i}"));
        thread::sleep(Duration::from_millis(10));
    }

    let names = backups(temp_dir.path(), "app.log.");
    assert_eq!(names.len(), 2, "{names:?}");
}

#[test]
fn test_midnight_rotation_is_driven_by_record_timestamps() {
    let temp_dir = tempfile::tempdir().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let sink = TimedRotatingFileSink::new(&path);
    message_only(&sink);

    let day_one: Zoned = "2024-05-10T10:00:00[UTC]".parse().unwrap();
    let record = |message: &str, timestamp: &Zoned| {
        Record::builder()
            .logger_name("app")
            .level(Level::Info)
            .message(message)
            .timestamp(timestamp.clone())
            .build()
    };

    // First emission lands on a different date than the sink's creation
    // time: rotation runs, but with no current file there is nothing to
    // rename.
    sink.handle(&record("first", &day_one)).unwrap();
    assert_eq!(backups(temp_dir.path(), "app.log.").len(), 0);

    // Same calendar date, no rotation.
    let later = &day_one + Span::new().hours(5);
    sink.handle(&record("second", &later)).unwrap();
    assert_eq!(backups(temp_dir.path(), "app.log.").len(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

    // Crossing midnight produces exactly one rotation.
    let day_two = &day_one + Span::new().days(1);
    sink.handle(&record("third", &day_two)).unwrap();
    let names = backups(temp_dir.path(), "app.log.");
    assert_eq!(names, vec!["app.log.20240510_100000"]);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.log.20240510_100000")).unwrap(),
        "first\nsecond\n"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "third\n");
}
