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
use logtree::formatter::ColoredFormatter;
use logtree::sink::ConsoleSink;
use logtree::sink::Sink;

fn main() {
    let console = ConsoleSink::new();
    console.set_formatter(ColoredFormatter::default().into());

    let logger = logtree::builder("demo")
        .level(Level::Debug)
        .sink(console)
        .build();

    logger.debug("Hello debug!");
    logger.info("Hello info!");
    logger.warning("Hello warning!");
    logger.error("Hello error!");
    logger.critical("Hello critical!");

    let worker = logger.get_child("worker");
    worker.log_with(
        Level::Info,
        "processed %s items",
        &[42.into()],
        logtree::context! { "queue" => "default" },
    );
}
