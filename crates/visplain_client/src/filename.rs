use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 60;

/// Deterministic output name: `{stem}--{8 hex chars of sha256(key)}.{extension}`.
///
/// The stem keeps ASCII letters, digits, `-` and `_`; every other run of
/// characters becomes a single `_`.
pub fn deterministic_filename(stem: &str, key: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    format!("{}--{}.{extension}", slug(stem), key_digest(key))
}

fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_STEM_CHARS));
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        if out.len() == MAX_STEM_CHARS {
            break;
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

fn key_digest(key: &str) -> String {
    Sha256::digest(key.as_bytes())[..4]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
