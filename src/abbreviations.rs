//! S8 of the pipeline: abbreviations.
//!
//! Collects `*[KEY]: VALUE` (Markdown Extra / PHP Markdown Extra) and
//! `[>KEY]: VALUE` (Kramdown) definitions out of the source text, then, after
//! rendering, wraps each whole-word occurrence of a collected key in the
//! output HTML with `<abbr title="VALUE">KEY</abbr>` -- skipping text that is
//! already inside a tag, an attribute value, or one of `<abbr>`, `<a>`,
//! `<code>`, `<pre>`.

use std::collections::HashMap;

/// The abbreviation keys collected from a document, in definition order,
/// longest-key-first for matching (so `API` doesn't shadow `APIs`... the
/// other way around: a longer key must be tried before a shorter prefix of
/// it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abbreviations {
    entries: Vec<(String, String)>,
}

impl Abbreviations {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the collection half of S8: strips `*[KEY]: VALUE` / `[>KEY]: VALUE`
/// definition lines from `text` and returns the stripped text alongside the
/// collected table. A no-op unless `enabled`.
pub fn collect(text: &str, enabled: bool) -> (String, Abbreviations) {
    if !enabled {
        return (text.to_string(), Abbreviations::default());
    }

    let mut abbrevs = Abbreviations::default();
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if let Some((key, value)) = parse_definition(trimmed) {
            abbrevs.entries.push((key.to_string(), value.to_string()));
        } else {
            out.push_str(&expand_inline_shorthand(line, &mut abbrevs));
        }
    }

    // Longest key first so overlapping keys don't shadow a longer match.
    abbrevs.entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    (out, abbrevs)
}

/// Expands the `[>(KEY) VALUE]` inline shorthand directly into an
/// `<abbr title="VALUE">KEY</abbr>` at its point of use, and records KEY/VALUE
/// so later whole-document occurrences of KEY are wrapped too.
fn expand_inline_shorthand(line: &str, abbrevs: &mut Abbreviations) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(pos) = rest.find("[>(") {
        out.push_str(&rest[..pos]);
        let after_open = &rest[pos + 3..];
        let Some((key, after_key)) = after_open.split_once(')') else {
            out.push_str(&rest[pos..]);
            rest = "";
            break;
        };
        let Some((value, after_value)) = after_key.strip_prefix(' ').unwrap_or(after_key).split_once(']') else {
            out.push_str(&rest[pos..]);
            rest = "";
            break;
        };
        let value = value.trim();
        out.push_str(&format!("<abbr title=\"{}\">{}</abbr>", escape_attr(value), key));
        abbrevs.entries.push((key.to_string(), value.to_string()));
        rest = after_value;
    }
    out.push_str(rest);
    out
}

fn parse_definition(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("*[").or_else(|| trimmed.strip_prefix("[>"))?;
    let (key, after) = rest.split_once(']')?;
    let value = after.strip_prefix(':')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Runs the wrap half of S8 against rendered HTML. A no-op if `abbrevs` is
/// empty.
pub fn wrap(html: &str, abbrevs: &Abbreviations) -> String {
    if abbrevs.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut skip_depth: Vec<&str> = Vec::new();
    let mut chars = html.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '<' {
            let tag_end = match html[i..].find('>') {
                Some(rel) => i + rel + 1,
                None => {
                    out.push_str(&html[i..]);
                    break;
                }
            };
            let tag = &html[i..tag_end];
            out.push_str(tag);
            update_skip_stack(tag, &mut skip_depth);
            while let Some(&(j, _)) = chars.peek() {
                if j < tag_end {
                    chars.next();
                } else {
                    break;
                }
            }
            continue;
        }

        if !skip_depth.is_empty() {
            out.push(c);
            continue;
        }

        let text_start = i;
        let text_end = loop {
            match chars.peek() {
                Some(&(j, '<')) => break j,
                Some(_) => {
                    chars.next();
                }
                None => break html.len(),
            }
        };
        out.push_str(&wrap_words(&html[text_start..text_end], abbrevs));
    }

    out
}

fn update_skip_stack<'a>(tag: &'a str, stack: &mut Vec<&'a str>) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    let Some(inner) = inner.strip_prefix('/').map(|_| inner).or(Some(inner)) else {
        return;
    };
    let closing = tag.starts_with("</");
    let name_src = if closing { &inner[1..] } else { inner };
    let name: String = name_src
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    if !matches!(name.as_str(), "abbr" | "a" | "code" | "pre") {
        return;
    }
    if closing {
        if stack.last() == Some(&name.as_str()) {
            stack.pop();
        } else if let Some(pos) = stack.iter().rposition(|s| *s == name) {
            stack.remove(pos);
        }
    } else if !tag.ends_with("/>") {
        // Leak a 'static-lifetime copy of the match; the stack only ever
        // holds one of the four fixed names.
        let leaked: &'static str = match name.as_str() {
            "abbr" => "abbr",
            "a" => "a",
            "code" => "code",
            "pre" => "pre",
            _ => unreachable!(),
        };
        stack.push(leaked);
    }
}

fn wrap_words(text: &str, abbrevs: &Abbreviations) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'outer: while !rest.is_empty() {
        for (key, value) in &abbrevs.entries {
            if let Some(found) = rest.find(key.as_str()) {
                let before_ok = rest[..found].chars().next_back().is_none_or(|c| !is_word_char(c));
                let after = &rest[found + key.len()..];
                let after_ok = after.chars().next().is_none_or(|c| !is_word_char(c));
                if found == 0 && before_ok && after_ok {
                    out.push_str(&format!(
                        "<abbr title=\"{}\">{}</abbr>",
                        escape_attr(value),
                        key
                    ));
                    rest = after;
                    continue 'outer;
                }
            }
        }
        let ch_len = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
        out.push_str(&rest[..ch_len]);
        rest = &rest[ch_len..];
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_extra_style_definition() {
        let (text, abbrevs) = collect("The HTML spec.\n\n*[HTML]: Hyper Text Markup Language\n", true);
        assert_eq!(text, "The HTML spec.\n\n");
        assert_eq!(abbrevs.entries[0], ("HTML".to_string(), "Hyper Text Markup Language".to_string()));
    }

    #[test]
    fn collects_kramdown_style_definition() {
        let (text, abbrevs) = collect("HTML is great.\n\n[>HTML]: Hyper Text Markup Language\n", true);
        assert_eq!(text, "HTML is great.\n\n");
        assert_eq!(abbrevs.entries.len(), 1);
    }

    #[test]
    fn wraps_whole_word_occurrences() {
        let (_, abbrevs) = collect("*[HTML]: Hyper Text Markup Language\n", true);
        let out = wrap("<p>HTML rocks.</p>", &abbrevs);
        assert_eq!(out, "<p><abbr title=\"Hyper Text Markup Language\">HTML</abbr> rocks.</p>");
    }

    #[test]
    fn skips_inside_code_and_existing_abbr() {
        let (_, abbrevs) = collect("*[HTML]: Hyper Text Markup Language\n", true);
        let out = wrap("<code>HTML</code> <abbr title=\"x\">HTML</abbr>", &abbrevs);
        assert_eq!(out, "<code>HTML</code> <abbr title=\"x\">HTML</abbr>");
    }

    #[test]
    fn inline_shorthand_expands_immediately() {
        let (text, abbrevs) = collect("It's [>(HTML) Hyper Text Markup Language] based.\n", true);
        assert_eq!(text, "It's <abbr title=\"Hyper Text Markup Language\">HTML</abbr> based.\n");
        assert_eq!(abbrevs.entries[0].0, "HTML");
    }

    #[test]
    fn does_not_wrap_partial_word_match() {
        let (_, abbrevs) = collect("*[API]: Application Programming Interface\n", true);
        let out = wrap("<p>APIs are useful.</p>", &abbrevs);
        assert_eq!(out, "<p>APIs are useful.</p>");
    }
}
