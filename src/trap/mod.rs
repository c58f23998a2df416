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

//! The process-level destination for swallowed sink errors.
//!
//! Logging must never raise into the calling code, so every failure a sink
//! reports during dispatch ends up here instead. The default trap writes a
//! notice to standard error; tests install a [`CollectingTrap`] to assert on
//! reported failures.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::SinkError;

pub use self::collecting::CollectingTrap;
pub use self::default::DefaultTrap;

mod collecting;
mod default;

/// A destination for errors swallowed by the logging pipeline.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Receive one reported sink error.
    fn trap(&self, error: &SinkError);
}

static TRAP: RwLock<Option<Arc<dyn Trap>>> = RwLock::new(None);

/// Replace the process-level trap.
///
/// Until this is called, reported errors go to [`DefaultTrap`].
pub fn set_trap(trap: Arc<dyn Trap>) {
    *TRAP.write() = Some(trap);
}

/// Report a sink error to the installed trap.
pub fn report(error: &SinkError) {
    let guard = TRAP.read();
    match guard.as_ref() {
        Some(trap) => trap.trap(error),
        None => DefaultTrap::default().trap(error),
    }
}
