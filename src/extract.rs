//! Best-effort JSON recovery from free-form LLM output.
//!
//! Models asked for JSON still wrap it in prose or markdown fences often
//! enough that downstream parsing cannot assume a clean body.

/// Locate a JSON object inside potentially noisy model output.
///
/// Handles pure JSON, JSON inside code fences, and JSON embedded in prose.
/// Falls back to the trimmed input when no balanced object is found, letting
/// serde produce the parse error with the original text attached.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') {
        if let Some(end) = balanced_object_end(trimmed) {
            return &trimmed[..end];
        }
    }

    if let Some(start) = trimmed.find('{') {
        let remainder = &trimmed[start..];
        if let Some(end) = balanced_object_end(remainder) {
            return &remainder[..end];
        }
    }

    trimmed
}

/// Byte offset one past the brace closing the object that opens `s`.
/// String-aware: braces inside `"..."` (including escaped quotes) are ignored.
fn balanced_object_end(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
