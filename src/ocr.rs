//! Flattening of OCR annotations into plain text.
//!
//! The provider answers with a tree of blocks, lines and words. Every level
//! may be missing, so the walk below treats absence as "no text" instead of
//! failing. Lines of all blocks end up in one flat list: no blank separator
//! line is inserted between blocks.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn blank_run() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("static regex"))
}

/// Locate the text annotation in a provider response.
///
/// Checks `result.textAnnotation` first and falls back to a top-level
/// `textAnnotation`.
pub fn find_annotation(response: &Value) -> Option<&Value> {
    response
        .get("result")
        .and_then(|result| result.get("textAnnotation"))
        .filter(|annotation| !annotation.is_null())
        .or_else(|| response.get("textAnnotation"))
        .filter(|annotation| !annotation.is_null())
}

/// Extract the text of a single line.
///
/// A non-empty `text` field wins; otherwise the non-empty `words[].text`
/// values are joined with a single space.
fn line_text(line: &Value) -> Option<String> {
    if let Some(text) = line.get("text").and_then(Value::as_str) {
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let words: Vec<&str> = line
        .get("words")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|word| word.get("text").and_then(Value::as_str))
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Turn a raw OCR response body into newline-separated text.
///
/// Returns an empty string when nothing was recognized.
pub fn normalize_response(response: &Value) -> String {
    let Some(blocks) = find_annotation(response)
        .and_then(|annotation| annotation.get("blocks"))
        .and_then(Value::as_array)
    else {
        return String::new();
    };

    let lines: Vec<String> = blocks
        .iter()
        .filter_map(|block| block.get("lines").and_then(Value::as_array))
        .flatten()
        .filter_map(line_text)
        .collect();

    normalize_text(&lines.join("\n"))
}

/// Collapse runs of three or more newlines to two and trim the ends.
pub fn normalize_text(text: &str) -> String {
    blank_run().replace_all(text, "\n\n").trim().to_string()
}
