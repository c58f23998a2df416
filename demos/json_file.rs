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
use logtree::Registry;
use logtree::formatter::JsonFormatter;
use logtree::sink::FileSink;
use logtree::sink::Sink;

fn main() {
    let registry = Registry::new();

    let sink = FileSink::new("logs/demo.json.log");
    sink.set_formatter(JsonFormatter::default().into());

    let logger = logtree::builder("demo")
        .level(Level::Info)
        .sink(sink)
        .register(&registry);

    logger.info("service starting");
    logger.log_with(
        Level::Error,
        "request %s failed",
        &["GET /health".into()],
        logtree::context! { "status" => 503, "retryable" => true },
    );

    registry.close_all();
    println!("wrote logs/demo.json.log");
}
