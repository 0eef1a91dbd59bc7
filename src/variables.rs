//! S4 of the pipeline: variable substitution.
//!
//! Replaces `[%KEY]` (and, when `metadata_transforms` is enabled,
//! `[%KEY:filter(:filter)*]`) with the corresponding value from the S2
//! metadata map. Unknown keys are left untouched, literally, rather than
//! erroring or blanking -- the author likely meant literal text, or a key
//! that will be supplied another way.

use crate::metadata::Metadata;

/// Runs S4 against `text`. A no-op unless `enabled`.
pub fn substitute(text: &str, metadata: &Metadata, enabled: bool, transforms_enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' && bytes.get(i + 1) == Some(&b'%') {
            if let Some(close) = text[i..].find(']') {
                let inner = &text[i + 2..i + close];
                if let Some(replacement) = resolve(inner, metadata, transforms_enabled) {
                    out.push_str(&replacement);
                    i += close + 1;
                    continue;
                }
            }
        }
        let ch_len = next_char_len(bytes, i);
        out.push_str(&text[i..i + ch_len]);
        i += ch_len;
    }
    out
}

fn next_char_len(bytes: &[u8], i: usize) -> usize {
    let mut len = 1;
    while bytes.get(i + len).is_some_and(|b| b & 0xC0 == 0x80) {
        len += 1;
    }
    len
}

fn resolve(inner: &str, metadata: &Metadata, transforms_enabled: bool) -> Option<String> {
    let mut parts = inner.split(':');
    let key = parts.next()?;
    if key.is_empty() {
        return None;
    }
    let value = metadata.get(key)?;

    if !transforms_enabled {
        return Some(value.to_string());
    }

    let mut value = value.to_string();
    for filter in parts {
        value = apply_filter(&value, filter);
    }
    Some(value)
}

fn apply_filter(value: &str, filter: &str) -> String {
    match filter {
        "lowercase" => value.to_lowercase(),
        "uppercase" => value.to_uppercase(),
        "strip" => value.trim().to_string(),
        "url-slug" => value
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-"),
        _ => value.to_string(),
    }
}
