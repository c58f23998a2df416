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

use std::fmt::Debug;
use std::fmt::Formatter as FmtFormatter;

use crate::formatter::Formatter;
use crate::record::Record;

type FormatFunction = dyn Fn(&Record) -> anyhow::Result<String> + Send + Sync + 'static;

/// A formatter backed by a custom function.
///
/// ```
/// use logtree::formatter::CustomFormatter;
///
/// let formatter = CustomFormatter::new(|record| {
///     Ok(format!("{} - {}", record.level(), record.message()))
/// });
/// ```
pub struct CustomFormatter {
    f: Box<FormatFunction>,
}

impl Debug for CustomFormatter {
    fn fmt(&self, f: &mut FmtFormatter) -> std::fmt::Result {
        write!(f, "CustomFormatter {{ ... }}")
    }
}

impl CustomFormatter {
    pub fn new(
        formatter: impl Fn(&Record) -> anyhow::Result<String> + Send + Sync + 'static,
    ) -> Self {
        CustomFormatter {
            f: Box::new(formatter),
        }
    }

    pub(crate) fn format(&self, record: &Record) -> anyhow::Result<String> {
        (self.f)(record)
    }
}

impl From<CustomFormatter> for Formatter {
    fn from(formatter: CustomFormatter) -> Self {
        Formatter::Custom(formatter)
    }
}
