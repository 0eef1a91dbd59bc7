//! S18 of the pipeline: pretty printing.
//!
//! Indents block-level tags two spaces per nesting level while leaving
//! inline runs (text and inline tags) on one line, and leaves `<pre>`/
//! `<script>`/`<style>` contents completely untouched -- their whitespace is
//! significant.

const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "div", "p", "ul", "ol", "li", "table", "thead", "tbody", "tfoot",
    "tr", "td", "th", "blockquote", "section", "article", "header", "footer", "figure",
    "figcaption", "dl", "dt", "dd", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "details",
    "summary", "nav", "aside", "main",
];

const VERBATIM_TAGS: &[&str] = &["pre", "script", "style"];

/// Runs S18 against rendered `html`. A no-op unless `enabled`.
pub fn print(html: &str, enabled: bool) -> String {
    if !enabled {
        return html.to_string();
    }

    let tokens = tokenize(html);
    let mut out = String::with_capacity(html.len() + tokens.len() * 2);
    let mut depth: usize = 0;
    let mut verbatim_until: Option<String> = None;

    for (i, token) in tokens.iter().enumerate() {
        if let Some(ref closing) = verbatim_until {
            out.push_str(token.raw());
            if let Token::Close(name) = token {
                if name.eq_ignore_ascii_case(closing) {
                    verbatim_until = None;
                }
            }
            continue;
        }

        match token {
            Token::Open(name, raw) => {
                let is_block = is_block_tag(name);
                if is_block {
                    indent(&mut out, depth);
                }
                out.push_str(raw);
                if VERBATIM_TAGS.contains(&name.to_lowercase().as_str()) {
                    verbatim_until = Some(name.clone());
                } else if is_block {
                    depth += 1;
                    if next_is_text_only(&tokens, i) {
                        // leaf block with only inline content: keep it on one line
                    } else {
                        out.push('\n');
                    }
                }
            }
            Token::SelfClosing(name, raw) => {
                if is_block_tag(name) {
                    indent(&mut out, depth);
                    out.push_str(raw);
                    out.push('\n');
                } else {
                    out.push_str(raw);
                }
            }
            Token::Close(name) => {
                let is_block = is_block_tag(name);
                if is_block {
                    depth = depth.saturating_sub(1);
                    if !prev_was_block_close_or_open(&tokens, i) {
                        // inline content preceded this close; stay inline
                    } else {
                        indent(&mut out, depth);
                    }
                }
                out.push_str(&format!("</{name}>"));
                if is_block {
                    out.push('\n');
                }
            }
            Token::Text(text) => {
                out.push_str(text);
            }
        }
    }

    out
}

fn indent(out: &mut String, depth: usize) {
    if out.ends_with('\n') || out.is_empty() {
        for _ in 0..depth {
            out.push_str("  ");
        }
    }
}

fn next_is_text_only(tokens: &[Token], pos: usize) -> bool {
    // A block tag is treated as a "leaf" (no internal newline after its open
    // tag) when its very next token is text or an inline tag, not another
    // block tag.
    match tokens.get(pos + 1) {
        Some(Token::Text(_)) => true,
        Some(Token::Open(name, _)) | Some(Token::SelfClosing(name, _)) => !is_block_tag(name),
        Some(Token::Close(_)) => true,
        None => true,
    }
}

fn prev_was_block_close_or_open(tokens: &[Token], pos: usize) -> bool {
    match tokens.get(pos.wrapping_sub(1)) {
        Some(Token::Open(name, _)) => is_block_tag(name),
        Some(Token::Close(name)) => is_block_tag(name),
        Some(Token::SelfClosing(name, _)) => is_block_tag(name),
        _ => false,
    }
}

fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name.to_lowercase().as_str())
}

enum Token {
    Open(String, String),
    Close(String),
    SelfClosing(String, String),
    Text(String),
}

impl Token {
    fn raw(&self) -> &str {
        match self {
            Token::Open(_, raw) | Token::SelfClosing(_, raw) => raw,
            Token::Text(raw) => raw,
            Token::Close(_) => "",
        }
    }
}

fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(pos) = rest.find('<') {
            if pos > 0 {
                tokens.push(Token::Text(rest[..pos].to_string()));
            }
            rest = &rest[pos..];
            let Some(end) = rest.find('>') else {
                tokens.push(Token::Text(rest.to_string()));
                break;
            };
            let tag = &rest[..=end];
            rest = &rest[end + 1..];

            if let Some(name) = tag.strip_prefix("</") {
                let name = name.trim_end_matches('>').trim();
                tokens.push(Token::Close(tag_name(name)));
            } else if tag.starts_with("<!") {
                tokens.push(Token::Text(tag.to_string()));
            } else {
                let inner = tag.trim_start_matches('<').trim_end_matches('>');
                let name = tag_name(inner);
                if tag.ends_with("/>") || is_void_element(&name) {
                    tokens.push(Token::SelfClosing(name, tag.to_string()));
                } else {
                    tokens.push(Token::Open(name, tag.to_string()));
                }
            }
        } else {
            tokens.push(Token::Text(rest.to_string()));
            break;
        }
    }

    tokens
}

fn tag_name(inner: &str) -> String {
    inner
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn is_void_element(name: &str) -> bool {
    matches!(name, "br" | "hr" | "img" | "input" | "meta" | "link" | "area" | "base" | "col" | "embed" | "source" | "track" | "wbr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_passthrough() {
        assert_eq!(print("<p>hi</p>", false), "<p>hi</p>");
    }

    #[test]
    fn indents_nested_blocks() {
        let out = print("<div><p>hi</p></div>", true);
        assert!(out.contains("<div>\n"));
        assert!(out.contains("  <p>hi</p>"));
    }

    #[test]
    fn leaves_pre_contents_untouched() {
        let input = "<pre><code>  weird   spacing\n\n\n</code></pre>";
        let out = print(input, true);
        assert!(out.contains("  weird   spacing\n\n\n"));
    }

    #[test]
    fn keeps_inline_runs_on_one_line() {
        let out = print("<p>hello <em>world</em> and <strong>more</strong></p>", true);
        assert!(out.contains("<p>hello <em>world</em> and <strong>more</strong></p>"));
    }
}
