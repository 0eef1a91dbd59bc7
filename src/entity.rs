//! HTML entity decoding. The translation table is generated at build time
//! (see `build.rs`) from the `entities` crate's data, sorted so lookups can
//! binary search it.

use std::char;
use std::cmp::min;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

pub const ENTITY_MIN_LENGTH: usize = 2;
pub const ENTITY_MAX_LENGTH: usize = 31;

fn isxdigit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

fn isdigit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

/// Attempts to decode a numeric (`&#123;`/`&#x7b;`) or named (`&amp;`)
/// reference starting just after the `&`. Returns the decoded bytes and the
/// number of input bytes consumed (including the trailing `;`).
pub fn unescape(text: &[u8]) -> Option<(Vec<u8>, usize)> {
    if text.len() >= 3 && text[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i;

        let num_digits = if text.len() > 1 && isdigit(text[1]) {
            i = 1;
            while i < text.len() && isdigit(text[i]) {
                codepoint = codepoint.saturating_mul(10).saturating_add(u32::from(text[i] - b'0'));
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 1
        } else if text.len() > 1 && (text[1] == b'x' || text[1] == b'X') {
            i = 2;
            while i < text.len() && isxdigit(text[i]) {
                let digit = (text[i] as char).to_digit(16).unwrap_or(0);
                codepoint = codepoint.saturating_mul(16).saturating_add(digit);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 2
        } else {
            return None;
        };

        if (1..=8).contains(&num_digits) && i < text.len() && text[i] == b';' {
            if codepoint == 0 || (0xD800..0xE000).contains(&codepoint) || codepoint >= 0x110000 {
                codepoint = 0xFFFD;
            }
            return Some((
                char::from_u32(codepoint)
                    .unwrap_or('\u{FFFD}')
                    .to_string()
                    .into_bytes(),
                i + 1,
            ));
        }
        return None;
    }

    let size = min(text.len(), ENTITY_MAX_LENGTH);
    for i in ENTITY_MIN_LENGTH..size {
        if text[i] == b' ' {
            return None;
        }
        if text[i] == b';' {
            return lookup(&text[..i]).map(|e| (e.to_vec(), i + 1));
        }
    }

    None
}

fn lookup(name: &[u8]) -> Option<&'static [u8]> {
    let name = std::str::from_utf8(name).ok()?;
    entitydata::TRANSLATED_ENTITIES
        .binary_search_by(|(k, _)| (*k).cmp(name))
        .ok()
        .map(|idx| entitydata::TRANSLATED_ENTITIES[idx].1.as_bytes())
}

/// Decodes all entity references in `src`, leaving anything that doesn't
/// parse as one (a lone `&`, or an unterminated/unknown reference) verbatim.
pub fn unescape_html(src: &[u8]) -> Vec<u8> {
    let size = src.len();
    let mut i = 0;
    let mut v = Vec::with_capacity(size);

    while i < size {
        let org = i;
        while i < size && src[i] != b'&' {
            i += 1;
        }

        if i > org {
            if org == 0 && i >= size {
                return src.to_vec();
            }
            v.extend_from_slice(&src[org..i]);
        }

        if i >= size {
            return v;
        }

        i += 1;
        match unescape(&src[i..]) {
            Some((chs, consumed)) => {
                v.extend_from_slice(&chs);
                i += consumed;
            }
            None => v.push(b'&'),
        }
    }

    v
}
