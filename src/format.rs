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

//! Message interpolation helpers.

use serde_json::Value;

/// Render a context value for embedding in text output.
///
/// Strings render without surrounding quotes; everything else uses its JSON
/// representation.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute `%s` placeholders left-to-right with positional arguments.
///
/// `%%` renders a literal percent sign. Placeholders beyond the argument list
/// are kept verbatim and surplus arguments are ignored; interpolation must
/// not fail however the template and arguments disagree.
pub(crate) fn interpolate(template: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                match args.next() {
                    Some(value) => out.push_str(&display_value(value)),
                    None => out.push_str("%s"),
                }
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_interpolate_positional() {
        let args = [json!("alice"), json!(3)];
        assert_eq!(
            interpolate("user %s failed after %s retries", &args),
            "user alice failed after 3 retries"
        );
    }

    #[test]
    fn test_interpolate_literal_percent() {
        let args = [json!(97)];
        assert_eq!(interpolate("disk %s%% full", &args), "disk 97% full");
    }

    #[test]
    fn test_interpolate_mismatches_are_harmless() {
        let args = [json!(1)];
        assert_eq!(interpolate("%s and %s", &args), "1 and %s");
        let args = [json!(1), json!(2)];
        assert_eq!(interpolate("only %s", &args), "only 1");
    }

    #[test]
    fn test_no_args_leaves_template_untouched() {
        assert_eq!(interpolate("100%s", &[]), "100%s");
    }
}
