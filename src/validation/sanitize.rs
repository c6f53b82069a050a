//! # Schedule Payload Sanitization
//!
//! Deep-walks a JSON-like value and neutralizes XSS-class content in every
//! string leaf. Sanitization never fails and never rejects: its contract is
//! "make safe", not "validate". SQL-looking text passes through untouched;
//! parameterized queries downstream are the SQL defense.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map as JsonMap, Value};

// Complete script blocks go first so their inner content disappears with the
// tags; the general tag pass afterwards would otherwise leave the payload
// text behind.
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script block pattern compiles")
});

static TAG_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag span pattern compiles"));

/// Sanitize a single string: strip script blocks with their content, remove
/// every remaining `<...>` tag span, drop stray angle brackets, and trim the
/// ends. Non-bracket characters (`&`, `°`, `²`, ...) survive verbatim.
pub fn sanitize_text(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_tags = TAG_SPAN.replace_all(&without_scripts, "");
    let without_brackets: String = without_tags
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();
    without_brackets.trim().to_string()
}

/// Deep-clone `value`, transforming every string leaf with [`sanitize_text`].
/// Objects and arrays are recursed at unbounded depth; numbers, booleans, and
/// nulls are copied unchanged. The input is never mutated.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_text(text)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), sanitize_value(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Sanitize every value in a JSON object map, preserving keys and order.
pub fn sanitize_map(map: JsonMap<String, Value>) -> JsonMap<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let sanitized = sanitize_value(&value);
            (key, sanitized)
        })
        .collect()
}
