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

use std::io;
use std::path::PathBuf;

/// A failure raised while a sink processes a record.
///
/// Sink errors never reach the logging caller; the dispatcher forwards them
/// to the process-level [trap](crate::trap) and moves on to the next sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// A formatter could not render the record.
    ///
    /// The affected sink falls back to a raw rendering of the record.
    #[error("failed to render log record: {0}")]
    Format(#[source] anyhow::Error),

    /// The underlying write or flush failed; the record is dropped for this
    /// sink only.
    #[error("failed to write log record: {0}")]
    Io(#[from] io::Error),

    /// A rename or unlink during rotation failed; the record is dropped for
    /// this sink only.
    #[error("failed to rotate log file {}: {}", path.display(), source)]
    Rotation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A retention-cleanup delete failed. The rotation itself completes.
    #[error("failed to prune old log file {}: {}", path.display(), source)]
    Retention {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other failure raised by a custom sink.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
