//! Adapter for the Syntect syntax highlighter plugin.

use crate::adapters::SyntaxHighlighterAdapter;
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

#[derive(Debug)]
/// Syntect syntax highlighter plugin.
pub struct SyntectAdapter<'a> {
    theme: &'a str,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl<'a> SyntectAdapter<'a> {
    /// Construct a new `SyntectAdapter` object and set the syntax highlighting theme.
    pub fn new(theme: &'a str) -> Self {
        SyntectAdapter {
            theme,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn gen_empty_block(&self) -> String {
        let syntax = self.syntax_set.find_syntax_by_name("Plain Text").unwrap();
        highlighted_html_for_string(
            "",
            &self.syntax_set,
            syntax,
            &self.theme_set.themes[self.theme],
        )
        .unwrap_or_default()
    }

    fn remove_pre_tag(&self, highlighted_code: String) -> String {
        match (highlighted_code.find('>'), highlighted_code.find("</pre>")) {
            (Some(open_end), Some(close_start)) if highlighted_code.starts_with("<pre") => {
                let inner = &highlighted_code[open_end + 1..close_start];
                inner.to_string()
            }
            _ => highlighted_code,
        }
    }
}

impl SyntaxHighlighterAdapter for SyntectAdapter<'_> {
    fn highlight(&self, lang: Option<&str>, code: &str) -> String {
        let fallback_syntax = "Plain Text";

        let lang: &str = match lang {
            None => fallback_syntax,
            Some(l) if l.is_empty() => fallback_syntax,
            Some(l) => l,
        };

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| {
                self.syntax_set
                    .find_syntax_by_first_line(code)
                    .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
            });

        self.remove_pre_tag(
            highlighted_html_for_string(
                code,
                &self.syntax_set,
                syntax,
                &self.theme_set.themes[self.theme],
            )
            .unwrap_or_default(),
        )
    }

    fn build_pre_tag(&self, attributes: &HashMap<String, String>) -> String {
        let mut syntect_attributes = extract_attributes_from_tag(&self.gen_empty_block());

        for (comrak_attr, val) in attributes {
            let mut combined_attr = val.clone();

            if let Some(existing) = syntect_attributes.remove(comrak_attr) {
                combined_attr = format!("{} {}", existing, val);
            }

            syntect_attributes.insert(comrak_attr.clone(), combined_attr);
        }

        build_opening_tag("pre", &syntect_attributes)
    }

    fn build_code_tag(&self, attributes: &HashMap<String, String>) -> String {
        build_opening_tag("code", attributes)
    }
}

/// Parses `name="value"` pairs out of an opening tag like `<pre style="...">`.
fn extract_attributes_from_tag(tag: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let Some(open) = tag.find('<') else {
        return attrs;
    };
    let Some(close) = tag[open..].find('>') else {
        return attrs;
    };
    let inner = &tag[open + 1..open + close];
    let mut rest = inner.splitn(2, char::is_whitespace).nth(1).unwrap_or("");

    while let Some(eq) = rest.find('=') {
        let name = rest[..eq].trim();
        if name.is_empty() {
            break;
        }
        let after_eq = &rest[eq + 1..];
        let quote = after_eq.chars().next();
        let (value, remainder) = match quote {
            Some(q) if q == '"' || q == '\'' => {
                let body = &after_eq[1..];
                match body.find(q) {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                (&after_eq[..end], &after_eq[end..])
            }
        };
        attrs.insert(name.to_string(), value.to_string());
        rest = remainder.trim_start();
    }

    attrs
}

fn build_opening_tag(tag: &str, attributes: &HashMap<String, String>) -> String {
    let mut attrs: Vec<_> = attributes.iter().collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    let mut s = format!("<{}", tag);
    for (k, v) in attrs {
        s.push_str(&format!(" {}=\"{}\"", k, v));
    }
    s.push('>');
    s
}
