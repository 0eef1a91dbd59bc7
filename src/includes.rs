//! S3 of the pipeline: include expansion.
//!
//! Resolves the six transclusion forms the spec names (Marked `<<[...]`,
//! `<<(...)`, `<<{...}`; MMD `{{...}}`; iA Writer bare `/path`) against
//! `base_directory`, left to right, recursing into `.md` includes. Cycle
//! detection walks the set of canonical paths on the current resolution
//! stack; depth is separately capped so a long non-cyclic chain cannot
//! blow the stack either.
//!
//! Errors are localized: an unresolvable include becomes an inline HTML
//! comment at the failure site (per the pipeline's error policy) rather
//! than aborting the whole conversion.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{self, Error};

const MAX_INCLUDE_DEPTH: usize = 16;

/// Runs S3 against `text`. A no-op unless `enabled`.
pub fn expand(text: &str, base_directory: Option<&str>, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let base = base_directory.map(Path::new).unwrap_or_else(|| Path::new("."));
    let mut stack = Vec::new();
    expand_recursive(text, base, &mut stack, 0)
}

fn expand_recursive(text: &str, base: &Path, stack: &mut Vec<PathBuf>, depth: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        let newline = &line[trimmed.len()..];

        if let Some(rendered) = try_expand_line(trimmed, base, stack, depth) {
            out.push_str(&rendered);
            out.push_str(newline);
        } else {
            out.push_str(line);
        }
    }
    out
}

fn try_expand_line(line: &str, base: &Path, stack: &mut Vec<PathBuf>, depth: usize) -> Option<String> {
    let trimmed = line.trim_start();

    if let Some(rest) = trimmed.strip_prefix("<<[") {
        let (spec, _) = rest.split_once(']')?;
        return Some(resolve(spec, base, stack, depth, IncludeKind::MarkedMarkdown));
    }
    if let Some(rest) = trimmed.strip_prefix("<<(") {
        let (spec, _) = rest.split_once(')')?;
        return Some(resolve(spec, base, stack, depth, IncludeKind::MarkedCode));
    }
    if let Some(rest) = trimmed.strip_prefix("<<{") {
        let (spec, _) = rest.split_once('}')?;
        return Some(resolve(spec, base, stack, depth, IncludeKind::MarkedRawHtml));
    }
    if let Some(rest) = trimmed.strip_prefix("{{") {
        if let Some((spec, after)) = rest.split_once("}}") {
            if after.trim().is_empty() {
                return Some(resolve(spec, base, stack, depth, IncludeKind::MmdTransclusion));
            }
        }
        return None;
    }
    if trimmed.starts_with('/') && !trimmed.contains(char::is_whitespace) {
        return Some(resolve(trimmed, base, stack, depth, IncludeKind::IaWriter));
    }
    None
}

#[derive(Clone, Copy)]
enum IncludeKind {
    MarkedMarkdown,
    MarkedCode,
    MarkedRawHtml,
    MmdTransclusion,
    IaWriter,
}

/// An include spec's trailing `[address]` and `;`-separated options, e.g.
/// `path[2,10];prefix="> "`.
struct Spec<'a> {
    path: &'a str,
    address: Option<&'a str>,
    prefix: Option<&'a str>,
}

fn parse_spec(spec: &str) -> Spec<'_> {
    let (head, opts) = match spec.split_once(';') {
        Some((h, o)) => (h, Some(o)),
        None => (spec, None),
    };
    let (path, address) = match head.find('[') {
        Some(open) if head.ends_with(']') => (&head[..open], Some(&head[open + 1..head.len() - 1])),
        _ => (head, None),
    };
    let prefix = opts.and_then(|o| {
        o.trim()
            .strip_prefix("prefix=\"")
            .and_then(|rest| rest.strip_suffix('"'))
    });
    Spec { path: path.trim(), address, prefix }
}

fn resolve(spec: &str, base: &Path, stack: &mut Vec<PathBuf>, depth: usize, kind: IncludeKind) -> String {
    let spec = parse_spec(spec);
    let resolved = base.join(spec.path);

    let canonical = match fs::canonicalize(&resolved) {
        Ok(p) => p,
        Err(_) => return error::as_inline_comment(&Error::IncludeNotFound(spec.path.to_string())),
    };

    if depth >= MAX_INCLUDE_DEPTH {
        return error::as_inline_comment(&Error::IncludeTooDeep(spec.path.to_string()));
    }
    if stack.contains(&canonical) {
        return error::as_inline_comment(&Error::IncludeCycle(spec.path.to_string()));
    }

    let contents = match fs::read_to_string(&resolved) {
        Ok(c) => c,
        Err(_) => return error::as_inline_comment(&Error::IncludeNotFound(spec.path.to_string())),
    };

    let contents = apply_address(&contents, spec.address);
    let contents = apply_prefix(&contents, spec.prefix);

    match kind {
        IncludeKind::MarkedMarkdown | IncludeKind::MmdTransclusion => {
            let ext = resolved.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv") {
                delimited_to_pipe_table(&contents, if ext.eq_ignore_ascii_case("tsv") { '\t' } else { ',' })
            } else {
                let new_base = resolved.parent().unwrap_or(base).to_path_buf();
                stack.push(canonical);
                let expanded = expand_recursive(&contents, &new_base, stack, depth + 1);
                stack.pop();
                expanded
            }
        }
        IncludeKind::MarkedCode => {
            let lang = resolved
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            format!("<pre><code lang=\"{lang}\">{}</code></pre>", escape_html(&contents))
        }
        IncludeKind::MarkedRawHtml => format!("APEX_RAW_INCLUDE:{}", encode_raw(&contents)),
        IncludeKind::IaWriter => {
            let ext = resolved.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
            if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp") {
                format!("![]({})", spec.path)
            } else {
                format!("<pre><code>{}</code></pre>", escape_html(&contents))
            }
        }
    }
}

fn apply_address(contents: &str, address: Option<&str>) -> String {
    let Some(address) = address else {
        return contents.to_string();
    };
    let lines: Vec<&str> = contents.lines().collect();

    if let Some((from, to)) = address.split_once(',') {
        let from = from.trim();
        let to = to.trim();
        if from.starts_with('/') {
            let start = find_regex_line(&lines, from).unwrap_or(0);
            let end = if to.is_empty() {
                lines.len()
            } else {
                find_regex_line(&lines[start..], to).map(|i| start + i + 1).unwrap_or(lines.len())
            };
            return lines[start..end.min(lines.len())].join("\n");
        }
        let start: usize = from.parse().unwrap_or(1).max(1) - 1;
        let end = if to.is_empty() {
            lines.len()
        } else {
            to.parse::<usize>().unwrap_or(lines.len())
        };
        return lines.get(start..end.min(lines.len())).map(|s| s.join("\n")).unwrap_or_default();
    }
    contents.to_string()
}

fn find_regex_line(lines: &[&str], pattern: &str) -> Option<usize> {
    let needle = pattern.trim_matches('/');
    lines.iter().position(|l| l.contains(needle))
}

fn apply_prefix(contents: &str, prefix: Option<&str>) -> String {
    match prefix {
        None => contents.to_string(),
        Some(p) => contents.lines().map(|l| format!("{p}{l}")).collect::<Vec<_>>().join("\n"),
    }
}

fn delimited_to_pipe_table(contents: &str, delimiter: char) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        rows.push(split_delimited_row(line, delimiter));
    }
    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows[0].len();
    let mut out = String::new();
    out.push_str(&render_row(&rows[0]));
    out.push('\n');
    out.push('|');
    for _ in 0..col_count {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in &rows[1..] {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

fn split_delimited_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn render_row(row: &[String]) -> String {
    let mut out = String::from("|");
    for field in row {
        out.push(' ');
        out.push_str(field.trim());
        out.push_str(" |");
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn encode_raw(s: &str) -> String {
    // Survive the Markdown parser intact by base64-free hex encoding; decoded
    // back out by the pipeline after rendering.
    s.bytes().map(|b| format!("{b:02x}")).collect()
}

/// Decodes an `APEX_RAW_INCLUDE:` sentinel produced by [`expand`] back into
/// raw HTML, run as a post-render pass so passthrough HTML content survives
/// the Markdown parser's escaping untouched.
pub fn decode_raw_sentinels(html: &str) -> String {
    let marker = "APEX_RAW_INCLUDE:";
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find(marker) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + marker.len()..];
        let hex_len = after.chars().take_while(|c| c.is_ascii_hexdigit()).count();
        let hex = &after[..hex_len];
        let bytes: Vec<u8> = hex
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok().and_then(|s| u8::from_str_radix(s, 16).ok()))
            .collect();
        out.push_str(&String::from_utf8_lossy(&bytes));
        rest = &after[hex_len..];
    }
    out.push_str(rest);
    out
}
