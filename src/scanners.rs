//! Hand-rolled byte scanners for the constructs the block and inline parsers
//! need to recognise. Each function takes the remainder of the current line
//! (or inline subject) and returns the length of the match, if any, measured
//! from the start of the slice.
//!
//! These mirror the scanners a CommonMark/GFM implementation needs; several
//! (`alert_start`, `description_item_start`, `shortcode`, the phoenix
//! functions) exist purely to support comrak's own extensions and have no
//! upstream cmark equivalent.

use crate::ctype::{isalnum, isalpha, isdigit, ispunct, isspace};
use crate::parser::alert::AlertType;

#[inline]
fn starts_with_ci(line: &[u8], needle: &[u8]) -> bool {
    line.len() >= needle.len()
        && line[..needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
}

#[inline]
fn find_ci(line: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || line.len() < needle.len() {
        return None;
    }
    (0..=line.len() - needle.len()).find(|&i| starts_with_ci(&line[i..], needle))
}

pub fn atx_heading_start(line: &[u8]) -> Option<usize> {
    if line.is_empty() || line[0] != b'#' {
        return None;
    }
    let mut i = 0;
    while i < line.len() && i < 6 && line[i] == b'#' {
        i += 1;
    }
    if i < line.len() && !isspace(line[i]) && line[i] != b'\n' && line[i] != b'\r' {
        return None;
    }
    Some(i)
}

pub fn html_block_end_1(line: &[u8]) -> bool {
    find_ci(line, b"</script>").is_some()
        || find_ci(line, b"</pre>").is_some()
        || find_ci(line, b"</style>").is_some()
        || find_ci(line, b"</textarea>").is_some()
}

pub fn html_block_end_2(line: &[u8]) -> bool {
    find_ci(line, b"-->").is_some()
}

pub fn html_block_end_3(line: &[u8]) -> bool {
    find_ci(line, b"?>").is_some()
}

pub fn html_block_end_4(line: &[u8]) -> bool {
    line.contains(&b'>')
}

pub fn html_block_end_5(line: &[u8]) -> bool {
    find_ci(line, b"]]>").is_some()
}

pub fn open_code_fence(line: &[u8]) -> Option<usize> {
    if line.is_empty() || (line[0] != b'`' && line[0] != b'~') {
        return None;
    }
    let c = line[0];
    let mut i = 0;
    while i < line.len() && line[i] == c {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    // backtick fences cannot contain further backticks in their info string,
    // but that's enforced by the caller; here we only count the fence.
    Some(i)
}

pub fn close_code_fence(line: &[u8]) -> Option<usize> {
    if line.is_empty() || (line[0] != b'`' && line[0] != b'~') {
        return None;
    }
    let c = line[0];
    let mut i = 0;
    while i < line.len() && line[i] == c {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    let mut j = i;
    while j < line.len() && isspace(line[j]) {
        j += 1;
    }
    if j == line.len() || line[j] == b'\n' || line[j] == b'\r' {
        Some(i)
    } else {
        None
    }
}

const HTML_BLOCK_1_TAGS: [&[u8]; 3] = [b"script", b"pre", b"style"];
const HTML_BLOCK_6_TAGS: [&[u8]; 48] = [
    b"address", b"article", b"aside", b"base", b"basefont", b"blockquote", b"body", b"caption",
    b"center", b"col", b"colgroup", b"dd", b"details", b"dialog", b"dir", b"div", b"dl", b"dt",
    b"fieldset", b"figcaption", b"figure", b"footer", b"form", b"frame", b"frameset", b"h1",
    b"h2", b"h3", b"h4", b"h5", b"h6", b"head", b"header", b"hr", b"html", b"iframe", b"legend",
    b"li", b"link", b"main", b"menu", b"menuitem", b"nav", b"noframes", b"ol", b"optgroup",
    b"option", b"p",
];

fn tag_name(line: &[u8]) -> Option<(&[u8], usize)> {
    let mut i = 0;
    if i >= line.len() || !isalpha(line[i]) {
        return None;
    }
    while i < line.len() && (isalnum(line[i]) || line[i] == b'-') {
        i += 1;
    }
    Some((&line[..i], i))
}

pub fn html_block_start(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'<') {
        return None;
    }

    if starts_with_ci(line, b"<!--") {
        return Some(2);
    }
    if starts_with_ci(line, b"<?") {
        return Some(3);
    }
    if starts_with_ci(line, b"<![CDATA[") {
        return Some(5);
    }
    if line.len() > 2 && line[1] == b'!' && isalpha(line[2]) {
        return Some(4);
    }

    let rest = &line[1..];
    let (name, after) = if rest.first() == Some(&b'/') {
        tag_name(&rest[1..]).map(|(n, l)| (n, l + 1))?
    } else {
        tag_name(rest)?
    };
    let lower: Vec<u8> = name.to_ascii_lowercase();
    if HTML_BLOCK_1_TAGS.iter().any(|t| *t == lower.as_slice()) {
        return Some(1);
    }
    if HTML_BLOCK_6_TAGS.iter().any(|t| *t == lower.as_slice()) {
        let next = rest.get(after);
        if next.is_none() || isspace(*next.unwrap()) || *next.unwrap() == b'>' {
            return Some(6);
        }
    }
    None
}

pub fn html_block_start_7(line: &[u8]) -> Option<usize> {
    html_tag(line).and_then(|len| {
        let mut j = len;
        while j < line.len() && isspace(line[j]) {
            j += 1;
        }
        if j == line.len() || line[j] == b'\n' || line[j] == b'\r' {
            Some(7)
        } else {
            None
        }
    })
}

pub enum SetextChar {
    Equals,
    Hyphen,
}

pub fn setext_heading_line(line: &[u8]) -> Option<SetextChar> {
    if line.is_empty() || (line[0] != b'=' && line[0] != b'-') {
        return None;
    }
    let c = line[0];
    let mut i = 0;
    while i < line.len() && line[i] == c {
        i += 1;
    }
    while i < line.len() && isspace(line[i]) {
        i += 1;
    }
    if i == line.len() || line[i] == b'\n' || line[i] == b'\r' {
        Some(if c == b'=' {
            SetextChar::Equals
        } else {
            SetextChar::Hyphen
        })
    } else {
        None
    }
}

pub fn thematic_break(line: &[u8]) -> Option<usize> {
    if line.is_empty() || !matches!(line[0], b'*' | b'-' | b'_') {
        return None;
    }
    let c = line[0];
    let mut count = 0;
    let mut i = 0;
    while i < line.len() {
        match line[i] {
            b if b == c => count += 1,
            b' ' | b'\t' => {}
            b'\n' | b'\r' => break,
            _ => return None,
        }
        i += 1;
    }
    if count >= 3 {
        Some(i)
    } else {
        None
    }
}

pub fn footnote_definition(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    if line.get(i) != Some(&b'^') {
        return None;
    }
    i += 1;
    let start = i;
    while i < line.len() && line[i] != b']' {
        if isspace(line[i]) {
            return None;
        }
        i += 1;
    }
    if i == start || i >= line.len() || line.get(i + 1) != Some(&b':') {
        return None;
    }
    Some(i + 2)
}

pub fn scheme(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    if i >= line.len() || !isalpha(line[i]) {
        return None;
    }
    i += 1;
    while i < line.len() && (isalnum(line[i]) || matches!(line[i], b'+' | b'.' | b'-')) {
        i += 1;
    }
    if (2..=32).contains(&i) {
        Some(i)
    } else {
        None
    }
}

pub fn autolink_uri(line: &[u8]) -> Option<usize> {
    let s = scheme(line)?;
    if line.get(s) != Some(&b':') {
        return None;
    }
    let mut i = s + 1;
    while i < line.len() && !isspace(line[i]) && line[i] != b'<' && line[i] != b'>' {
        i += 1;
    }
    if line.get(i) == Some(&b'>') {
        Some(i + 1)
    } else {
        None
    }
}

pub fn autolink_email(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    if i >= line.len() || !(isalnum(line[i]) || matches!(line[i], b'.' | b'+' | b'-' | b'_')) {
        return None;
    }
    while i < line.len() && (isalnum(line[i]) || matches!(line[i], b'.' | b'+' | b'-' | b'_')) {
        i += 1;
    }
    if line.get(i) != Some(&b'@') {
        return None;
    }
    i += 1;
    let domain_start = i;
    while i < line.len() && (isalnum(line[i]) || matches!(line[i], b'.' | b'-')) {
        i += 1;
    }
    if i == domain_start {
        return None;
    }
    if line.get(i) == Some(&b'>') {
        Some(i + 1)
    } else {
        None
    }
}

pub fn html_tag(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'<') {
        return None;
    }
    if starts_with_ci(line, b"<!--") {
        return html_comment(&line[4..]).map(|l| l + 4);
    }
    if starts_with_ci(line, b"<?") {
        return html_processing_instruction(&line[2..]).map(|l| l + 2);
    }
    if starts_with_ci(line, b"<![CDATA[") {
        return html_cdata(&line[9..]).map(|l| l + 9);
    }
    if line.len() > 1 && line[1] == b'!' {
        return html_declaration(&line[2..]).map(|l| l + 2);
    }

    let rest = &line[1..];
    let closing = rest.first() == Some(&b'/');
    let name_start = if closing { 1 } else { 0 };
    let (_, name_len) = tag_name(&rest[name_start..])?;
    let mut i = name_start + name_len;

    if closing {
        while i < rest.len() && isspace(rest[i]) {
            i += 1;
        }
    } else {
        loop {
            let before = i;
            while i < rest.len() && isspace(rest[i]) {
                i += 1;
            }
            if i == before {
                break;
            }
            if let Some((_, attr_len)) = tag_name(&rest[i..]) {
                i += attr_len;
                let mut j = i;
                while j < rest.len() && isspace(rest[j]) {
                    j += 1;
                }
                if rest.get(j) == Some(&b'=') {
                    j += 1;
                    while j < rest.len() && isspace(rest[j]) {
                        j += 1;
                    }
                    if matches!(rest.get(j), Some(&b'"') | Some(&b'\'')) {
                        let quote = rest[j];
                        let vstart = j + 1;
                        let mut k = vstart;
                        while k < rest.len() && rest[k] != quote {
                            k += 1;
                        }
                        if k >= rest.len() {
                            return None;
                        }
                        i = k + 1;
                    } else {
                        let vstart = j;
                        let mut k = vstart;
                        while k < rest.len() && !isspace(rest[k]) && rest[k] != b'>' {
                            k += 1;
                        }
                        i = k;
                    }
                }
            } else {
                break;
            }
        }
        if rest.get(i) == Some(&b'/') {
            i += 1;
        }
    }

    if rest.get(i) == Some(&b'>') {
        Some(i + 2)
    } else {
        None
    }
}

pub fn html_comment(line: &[u8]) -> Option<usize> {
    if starts_with_ci(line, b">") || starts_with_ci(line, b"->") {
        return None;
    }
    let end = find_ci(line, b"--")?;
    if line.get(end + 2) == Some(&b'>') {
        Some(end + 3)
    } else {
        None
    }
}

pub fn html_processing_instruction(line: &[u8]) -> Option<usize> {
    find_ci(line, b"?>").map(|i| i + 2)
}

pub fn html_cdata(line: &[u8]) -> Option<usize> {
    find_ci(line, b"]]>").map(|i| i + 3)
}

pub fn html_declaration(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    if i >= line.len() || !isalpha(line[i]) {
        return None;
    }
    while i < line.len() && line[i] != b'>' {
        i += 1;
    }
    if line.get(i) == Some(&b'>') {
        Some(i + 1)
    } else {
        None
    }
}

pub fn spacechars(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && matches!(line[i], b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r') {
        i += 1;
    }
    if i > 0 {
        Some(i)
    } else {
        None
    }
}

pub fn link_title(line: &[u8]) -> Option<usize> {
    let quote = *line.first()?;
    let close = match quote {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = 1;
    let mut escaping = false;
    while i < line.len() {
        if escaping {
            escaping = false;
        } else if line[i] == b'\\' {
            escaping = true;
        } else if line[i] == close {
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

pub fn table_start(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    if line.first() == Some(&b'|') {
        i += 1;
    }
    let mut saw_cell = false;
    loop {
        while i < line.len() && matches!(line[i], b' ' | b'\t') {
            i += 1;
        }
        let cell_start = i;
        if line.get(i) == Some(&b':') {
            i += 1;
        }
        let mut dashes = 0;
        while i < line.len() && line[i] == b'-' {
            dashes += 1;
            i += 1;
        }
        if dashes == 0 {
            return None;
        }
        if line.get(i) == Some(&b':') {
            i += 1;
        }
        saw_cell = true;
        let _ = cell_start;
        while i < line.len() && matches!(line[i], b' ' | b'\t') {
            i += 1;
        }
        if line.get(i) == Some(&b'|') {
            i += 1;
            if i >= line.len() || matches!(line[i], b'\n' | b'\r') {
                break;
            }
            continue;
        }
        break;
    }
    if !saw_cell {
        return None;
    }
    while i < line.len() && matches!(line[i], b' ' | b'\t') {
        i += 1;
    }
    if i == line.len() || matches!(line[i], b'\n' | b'\r') {
        Some(i)
    } else {
        None
    }
}

pub fn table_cell(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    let mut escaping = false;
    while i < line.len() {
        if escaping {
            escaping = false;
        } else if line[i] == b'\\' {
            escaping = true;
        } else if matches!(line[i], b'|' | b'\n' | b'\r') {
            break;
        }
        i += 1;
    }
    Some(i)
}

pub fn table_cell_end(line: &[u8]) -> Option<usize> {
    if line.first() == Some(&b'|') {
        Some(1)
    } else {
        None
    }
}

pub fn table_row_end(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && matches!(line[i], b' ' | b'\t') {
        i += 1;
    }
    if i < line.len() && matches!(line[i], b'\n' | b'\r') {
        Some(line.len())
    } else if i == line.len() {
        Some(i)
    } else {
        None
    }
}

pub fn dangerous_url(input: &[u8]) -> Option<usize> {
    const SCHEMES: [&[u8]; 2] = [b"javascript:", b"vbscript:"];
    const DATA_IMAGE: &[u8] = b"data:image/";
    const SAFE_IMAGE_EXT: [&[u8]; 4] = [b"png", b"gif", b"jpeg", b"webp"];

    for s in SCHEMES {
        if starts_with_ci(input, s) {
            return Some(s.len());
        }
    }
    if starts_with_ci(input, b"file:") {
        return Some(5);
    }
    if starts_with_ci(input, DATA_IMAGE) {
        let rest = &input[DATA_IMAGE.len()..];
        if SAFE_IMAGE_EXT
            .iter()
            .any(|ext| starts_with_ci(rest, ext) && matches!(rest.get(ext.len()), Some(&b';') | None))
        {
            return None;
        }
        return Some(5);
    }
    None
}

pub fn ipv6_url_start(buffer: &[u8]) -> Option<usize> {
    if buffer.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    while i < buffer.len() && (isalnum(buffer[i]) || matches!(buffer[i], b':' | b'.')) {
        i += 1;
    }
    if buffer.get(i) == Some(&b']') {
        Some(i + 1)
    } else {
        None
    }
}

pub fn ipv6_relaxed_url_start(buffer: &[u8]) -> Option<usize> {
    ipv6_url_start(buffer)
}

/// Matches the opening fence of a multiline blockquote extension
/// (`>>>` at the start of the line, nothing else).
pub fn open_multiline_block_quote_fence(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && line[i] == b'>' {
        i += 1;
    }
    if i >= 3 {
        Some(i)
    } else {
        None
    }
}

pub fn close_multiline_block_quote_fence(line: &[u8]) -> Option<usize> {
    open_multiline_block_quote_fence(line)
}

/// Matches a description-list item marker: `: ` at the start of a line
/// (after any leading whitespace already stripped by the caller).
pub fn description_item_start(line: &[u8]) -> Option<usize> {
    if line.first() == Some(&b':') {
        let mut i = 1;
        while i < line.len() && matches!(line[i], b' ' | b'\t') {
            i += 1;
        }
        if i > 1 {
            return Some(i);
        }
    }
    None
}

/// Matches `[!TYPE]` or `[!TYPE]+` / `[!TYPE]-` alert/callout markers. Unlike
/// upstream GFM, which only recognises a fixed set of five type names, the
/// caller decides whether to fall back to `AlertType::Note` for unrecognised
/// types (used when generalising to arbitrary callout types).
/// Recognises the opening of an alert/callout block. `line` begins at the
/// first non-space character of a line already known to start with `>`.
/// Counts the run of `>` fence characters, then requires `[!TYPE]`
/// immediately after (GFM allows a single leading space before the bracket,
/// which the caller has already skipped via the blockquote prefix), and an
/// optional trailing `+`/`-` collapsible marker.
///
/// When `allow_custom` is false (plain GFM `alerts`), only the five fixed
/// GFM type names match. When true (the `callouts` extension), any
/// alphanumeric/hyphen name is accepted as [`AlertType::Custom`].
///
/// Returns `(fence_length, end, alert_type, collapsible)` where `end` is the
/// offset, relative to the start of `line`, of the first byte after the
/// alert marker (bracket and optional suffix).
pub fn alert_start(
    line: &[u8],
    allow_custom: bool,
) -> Option<(usize, usize, AlertType, Option<bool>)> {
    let mut i = 0;
    let mut fence_length = 0;
    while i < line.len() && line[i] == b'>' {
        fence_length += 1;
        i += 1;
    }
    if fence_length == 0 {
        return None;
    }
    while i < line.len() && isspace(line[i]) && line[i] != b'\n' {
        i += 1;
        break;
    }
    if line.get(i) != Some(&b'[') || line.get(i + 1) != Some(&b'!') {
        return None;
    }
    let start = i + 2;
    let mut j = start;
    while j < line.len() && (isalnum(line[j]) || line[j] == b'-') {
        j += 1;
    }
    if j == start || line.get(j) != Some(&b']') {
        return None;
    }
    let name = &line[start..j];
    let alert_type = match name.to_ascii_lowercase().as_slice() {
        b"note" => AlertType::Note,
        b"tip" => AlertType::Tip,
        b"important" => AlertType::Important,
        b"warning" => AlertType::Warning,
        b"caution" => AlertType::Caution,
        _ if allow_custom => {
            AlertType::Custom(String::from_utf8_lossy(name).to_ascii_lowercase())
        }
        _ => return None,
    };
    let mut end = j + 1;
    let collapsible = match line.get(end) {
        Some(&b'+') => {
            end += 1;
            Some(true)
        }
        Some(&b'-') => {
            end += 1;
            Some(false)
        }
        _ => None,
    };
    Some((fence_length, end, alert_type, collapsible))
}

pub fn tasklist(line: &[u8]) -> Option<(usize, Option<char>)> {
    if line.first() != Some(&b'[') {
        return None;
    }
    let c = *line.get(1)?;
    if line.get(2) != Some(&b']') {
        return None;
    }
    let sym = if c == b' ' { None } else { Some(c as char) };
    let mut end = 3;
    if line.get(end) == Some(&b' ') {
        end += 1;
    }
    Some((end, sym))
}

/// Matches a `:shortcode:` emoji reference.
pub fn shortcode(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && (isalnum(line[i]) || matches!(line[i], b'_' | b'+' | b'-')) {
        i += 1;
    }
    if i > 0 && line.get(i) == Some(&b':') {
        Some(i + 1)
    } else {
        None
    }
}

#[cfg(feature = "phoenix_heex")]
pub fn phoenix_directive(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'%') {
        return None;
    }
    let mut i = 1;
    while i < line.len() && isalpha(line[i]) {
        i += 1;
    }
    if i > 1 {
        Some(i)
    } else {
        None
    }
}

#[cfg(feature = "phoenix_heex")]
pub fn phoenix_closing_tag(line: &[u8]) -> Option<usize> {
    if !line.starts_with(b"</:") {
        return None;
    }
    let mut i = 3;
    while i < line.len() && line[i] != b'>' {
        i += 1;
    }
    if line.get(i) == Some(&b'>') {
        Some(i + 1)
    } else {
        None
    }
}

pub fn scheme_rule(line: &[u8]) -> Option<usize> {
    scheme(line)
}

#[allow(dead_code)]
fn unused_ctype_markers(b: u8) {
    let _ = isdigit(b);
    let _ = ispunct(b);
}
