//! S16 of the pipeline (bibliography half).
//!
//! Citation nodes are already rendered by the HTML stage as
//! `<cite data-cite="KEY">...</cite>`; this stage walks the rendered output
//! in document order, assigns each distinct key a reference number on first
//! occurrence, and -- when a bibliography registry is loaded -- replaces
//! `<!-- REFERENCES -->` (or appends at the end of the document) with a
//! `<div class="references">` listing the cited entries.
//!
//! Loading the BibTeX/CSL-JSON/CSL-YAML source file itself is an external
//! collaborator's job (see the crate's external-interfaces notes): this
//! module consumes an already-parsed [`Bibliography`] registry, it does not
//! parse any of those formats itself.

use std::collections::HashMap;

use crate::error::Error;

/// A loaded bibliography: entry id to its pre-formatted reference text (the
/// caller is responsible for turning a BibTeX/CSL record into this string,
/// in whatever citation style it wants rendered).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: HashMap<String, String>,
}

impl Bibliography {
    /// Builds a registry directly from (id, formatted reference) pairs.
    pub fn from_entries<I: IntoIterator<Item = (String, String)>>(entries: I) -> Self {
        Bibliography { entries: entries.into_iter().collect() }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses the crate's own minimal interchange format for bibliography
/// entries -- one `key: formatted text` pair per line -- as a convenience
/// for callers who have not already parsed BibTeX/CSL themselves. Real
/// BibTeX/CSL-JSON/CSL-YAML parsing happens upstream of this crate.
pub fn parse_simple(contents: &str) -> Result<Bibliography, Error> {
    let mut entries = HashMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::BibliographyParse(format!("line {}: missing ':'", lineno + 1)));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::BibliographyParse(format!("line {}: empty key", lineno + 1)));
        }
        entries.insert(key.to_string(), value.trim().to_string());
    }
    Ok(Bibliography { entries })
}

/// Runs the bibliography-rendering half of S16 against already-rendered
/// `html`. A no-op if `bibliography` is `None` or empty.
pub fn finalize(html: &str, bibliography: Option<&Bibliography>) -> String {
    let Some(bibliography) = bibliography else {
        return html.to_string();
    };
    if bibliography.is_empty() {
        return html.to_string();
    }

    let cited = collect_cited_keys(html);
    if cited.is_empty() {
        return html.to_string();
    }

    let section = render_references(&cited, bibliography);

    if let Some(pos) = html.find("<!-- REFERENCES -->") {
        let end = pos + "<!-- REFERENCES -->".len();
        format!("{}{}{}", &html[..pos], section, &html[end..])
    } else {
        format!("{html}\n{section}")
    }
}

fn collect_cited_keys(html: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let marker = "data-cite=\"";
    let mut rest = html;
    while let Some(pos) = rest.find(marker) {
        let after = &rest[pos + marker.len()..];
        if let Some(end) = after.find('"') {
            let key = &after[..end];
            if !keys.iter().any(|k: &String| k == key) {
                keys.push(key.to_string());
            }
            rest = &after[end..];
        } else {
            break;
        }
    }
    keys
}

fn render_references(cited: &[String], bibliography: &Bibliography) -> String {
    let mut out = String::from("<div class=\"references\">\n<ol>\n");
    for key in cited {
        out.push_str("<li id=\"ref-");
        out.push_str(&escape(key));
        out.push_str("\">");
        match bibliography.get(key) {
            Some(text) => out.push_str(&escape(text)),
            None => out.push_str(&format!("<!-- apex error: unresolved citation key: {key} -->")),
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ol>\n</div>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
