//! Byte/string helpers shared by the block and inline parsers: trimming,
//! whitespace classification, URL/title cleaning, label normalisation, and
//! the front matter splitter used by metadata extraction.

use crate::ctype::{isalpha, ispunct, isspace};
use crate::entity;
use std::borrow::Cow;

pub fn is_line_end_char(ch: u8) -> bool {
    matches!(ch, b'\n' | b'\r')
}

pub fn is_space_or_tab(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t')
}

pub fn is_blank(s: &[u8]) -> bool {
    for &c in s {
        match c {
            b'\n' | b'\r' => return true,
            b' ' | b'\t' => (),
            _ => return false,
        }
    }
    true
}

pub fn rtrim(line: &mut String) {
    while line
        .as_bytes()
        .last()
        .is_some_and(|&b| isspace(b))
    {
        line.pop();
    }
}

pub fn ltrim(line: &mut String) {
    let trimmed = line.trim_start_matches(|c: char| c.is_ascii() && isspace(c as u8));
    if trimmed.len() != line.len() {
        *line = trimmed.to_string();
    }
}

pub fn trim(line: &mut String) {
    ltrim(line);
    rtrim(line);
}

pub fn trim_slice(mut i: &[u8]) -> &[u8] {
    while i.first().is_some_and(|&b| isspace(b)) {
        i = &i[1..];
    }
    while i.last().is_some_and(|&b| isspace(b)) {
        i = &i[..i.len() - 1];
    }
    i
}

pub fn rtrim_slice(mut i: &[u8]) -> &[u8] {
    while i.last().is_some_and(|&b| isspace(b)) {
        i = &i[..i.len() - 1];
    }
    i
}

pub fn rtrim_cow(s: &mut Cow<str>) {
    let trimmed = s.trim_end();
    if trimmed.len() != s.len() {
        *s = Cow::Owned(trimmed.to_string());
    }
}

pub fn trim_start_match<'a>(s: &'a str, pat: &str) -> &'a str {
    s.strip_prefix(pat).unwrap_or(s)
}

pub fn remove_from_start(s: &mut String, n: usize) {
    s.replace_range(..n, "");
}

pub fn remove_trailing_blank_lines(line: &mut String) {
    let bytes = line.as_bytes();
    if bytes.is_empty() {
        return;
    }
    let mut i = bytes.len();
    let mut last_line_start = i;
    loop {
        if i == 0 {
            line.clear();
            return;
        }
        i -= 1;
        let c = bytes[i];
        if c == b' ' || c == b'\t' {
            continue;
        }
        if is_line_end_char(c) {
            last_line_start = i;
            continue;
        }
        break;
    }
    line.truncate(last_line_start);
}

pub fn chop_trailing_hashtags(line: &mut String) {
    rtrim(line);
    if line.is_empty() {
        return;
    }
    let orig_n = line.len() - 1;
    let mut n = orig_n;
    while line.as_bytes()[n] == b'#' {
        if n == 0 {
            return;
        }
        n -= 1;
    }
    if n != orig_n && is_space_or_tab(line.as_bytes()[n]) {
        line.truncate(n);
        rtrim(line);
    }
}

pub fn unescape(v: &mut String) {
    let mut r = 0;
    loop {
        if r >= v.len() {
            break;
        }
        if v.as_bytes()[r] == b'\\' && r + 1 < v.len() && ispunct(v.as_bytes()[r + 1]) {
            v.remove(r);
        }
        r += 1;
    }
}

pub fn clean_autolink(url: &str, kind: crate::parser::inlines::AutolinkType) -> String {
    use crate::parser::inlines::AutolinkType;
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut buf = String::new();
    if kind == AutolinkType::Email {
        buf.push_str("mailto:");
    }
    buf.push_str(&String::from_utf8_lossy(&entity::unescape_html(
        trimmed.as_bytes(),
    )));
    buf
}

pub fn clean_url(url: &[u8]) -> Vec<u8> {
    let url = trim_slice(url);
    if url.is_empty() {
        return Vec::new();
    }

    let mut b = if url.len() >= 2 && url[0] == b'<' && url[url.len() - 1] == b'>' {
        entity::unescape_html(&url[1..url.len() - 1])
    } else {
        entity::unescape_html(url)
    };

    let mut s = String::from_utf8_lossy(&b).into_owned();
    unescape(&mut s);
    b = s.into_bytes();
    b
}

pub fn clean_title(title: &[u8]) -> Vec<u8> {
    if title.is_empty() {
        return Vec::new();
    }

    let first = title[0];
    let last = title[title.len() - 1];

    let mut b = if (first == b'\'' && last == b'\'')
        || (first == b'(' && last == b')')
        || (first == b'"' && last == b'"')
    {
        entity::unescape_html(&title[1..title.len() - 1])
    } else {
        entity::unescape_html(title)
    };

    let mut s = String::from_utf8_lossy(&b).into_owned();
    unescape(&mut s);
    b = s.into_bytes();
    b
}

pub fn normalize_whitespace(v: &str) -> String {
    let mut last_was_space = false;
    let mut r = String::with_capacity(v.len());
    for c in v.chars() {
        if c.is_ascii() && isspace(c as u8) {
            if !last_was_space {
                r.push(' ');
                last_was_space = true;
            }
        } else {
            r.push(c);
            last_was_space = false;
        }
    }
    r
}

pub fn normalize_code(v: &str) -> String {
    let normalized = normalize_whitespace(v);
    let trimmed = normalized.trim();
    trimmed.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Fold,
    Preserve,
}

pub fn normalize_label(i: &str, case: Case) -> String {
    let i = i.trim();
    let mut v = String::with_capacity(i.len());
    let mut last_was_whitespace = false;
    for c in i.chars() {
        let iter: Box<dyn Iterator<Item = char>> = match case {
            Case::Fold => Box::new(c.to_lowercase()),
            Case::Preserve => Box::new(std::iter::once(c)),
        };
        for e in iter {
            if e.is_whitespace() {
                if !last_was_whitespace {
                    last_was_whitespace = true;
                    v.push(' ');
                }
            } else {
                last_was_whitespace = false;
                v.push(e);
            }
        }
    }
    v
}

pub fn count_newlines(s: &[u8]) -> usize {
    s.iter().filter(|&&b| b == b'\n').count()
}

/// Splits `s` on a leading front matter block delimited on both sides by
/// `delimiter` (e.g. `---`). Returns `(front_matter_including_delimiters,
/// rest_of_document)`. `delimiter` must appear alone on its own line at the
/// very start of the input and again, alone, on a later line.
pub fn split_off_front_matter<'a>(s: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    if !s.starts_with(delimiter) {
        return None;
    }
    let after_open = &s[delimiter.len()..];
    let first_nl = after_open.find('\n')?;
    if !is_blank(after_open[..first_nl].as_bytes()) {
        return None;
    }

    let body_start = delimiter.len() + first_nl + 1;
    let mut search_from = body_start;
    loop {
        let rest = &s[search_from..];
        let line_start = search_from;
        let line_end = rest.find('\n').map(|i| line_start + i).unwrap_or(s.len());
        let line = s[line_start..line_end].trim_end_matches('\r');
        if line == delimiter {
            let fm_end = (line_end + 1).min(s.len());
            return Some((&s[..fm_end], &s[fm_end..]));
        }
        if line_end >= s.len() {
            return None;
        }
        search_from = line_end + 1;
    }
}

#[cfg(feature = "phoenix_heex")]
pub fn phoenix_inline_tag(_line: &[u8]) -> Option<usize> {
    None
}

#[cfg(feature = "phoenix_heex")]
pub fn phoenix_inline_expression(_line: &[u8]) -> Option<usize> {
    None
}

/// Used by `scheme`/autolink scanning to decide whether a byte is an ASCII
/// letter without pulling in the full ctype table at call sites.
pub fn is_alpha_byte(b: u8) -> bool {
    isalpha(b)
}
