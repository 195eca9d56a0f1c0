/// Longest file stem we produce, in bytes.
pub const MAX_STEM_BYTES: usize = 200;

const FALLBACK_STEM: &str = "untitled";

fn is_reserved(c: char) -> bool {
    matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*') || c.is_control()
}

/// Turns a scraped title into a single, safe path component.
///
/// Separators, reserved and control characters become `_`. Leading and
/// trailing dots and whitespace are stripped so the result can neither walk
/// out of the output directory nor hide in it.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());

    let mut end = trimmed.len().min(MAX_STEM_BYTES);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    let stem = trimmed[..end].trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}
