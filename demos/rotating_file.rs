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

use logtree::Level;
use logtree::sink::RotatingFileSink;

fn main() {
    let sink = RotatingFileSink::new("logs/demo.log")
        .max_bytes(4 * 1024)
        .backup_count(5)
        .max_files(10);

    let logger = logtree::builder("demo")
        .level(Level::Debug)
        .sink(sink)
        .build();

    for i in 0..1000 {
        logger.log_with(
            Level::Info,
            "writing record %s",
            &[i.into()],
            logtree::Context::new(),
        );
    }
    logger.flush();

    println!("wrote logs/demo.log and its rotated backups");
}
