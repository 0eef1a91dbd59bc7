use super::*;

#[test]
fn extra_style_definition_wraps_later_occurrences() {
    html_opts!(
        [extension.abbreviations],
        "The HTML spec is large.\n\n*[HTML]: Hyper Text Markup Language\n",
        concat!(
            "<p>The <abbr title=\"Hyper Text Markup Language\">HTML</abbr> spec is large.</p>\n",
        ),
    );
}

#[test]
fn kramdown_style_definition_is_equivalent() {
    html_opts!(
        [extension.abbreviations],
        "HTML is great.\n\n[>HTML]: Hyper Text Markup Language\n",
        "<p><abbr title=\"Hyper Text Markup Language\">HTML</abbr> is great.</p>\n",
    );
}

#[test]
fn inline_shorthand_expands_at_point_of_use_and_wraps_later_occurrences() {
    // The shorthand splices a literal `<abbr>` tag into the Markdown source
    // itself, ahead of parsing, so it's subject to the same `unsafe_` gate
    // as any other raw inline HTML.
    html_opts!(
        [extension.abbreviations, render.unsafe_],
        "It's [>(HTML) Hyper Text Markup Language] based. HTML rules.\n",
        concat!(
            "<p>It's <abbr title=\"Hyper Text Markup Language\">HTML</abbr> based. ",
            "<abbr title=\"Hyper Text Markup Language\">HTML</abbr> rules.</p>\n",
        ),
    );
}

#[test]
fn does_not_wrap_inside_existing_code_or_abbr() {
    html_opts!(
        [extension.abbreviations],
        "`HTML` and HTML.\n\n*[HTML]: Hyper Text Markup Language\n",
        concat!(
            "<p><code>HTML</code> and <abbr title=\"Hyper Text Markup Language\">HTML</abbr>.</p>\n",
        ),
    );
}

#[test]
fn partial_word_match_is_not_wrapped() {
    html_opts!(
        [extension.abbreviations],
        "APIs are useful.\n\n*[API]: Application Programming Interface\n",
        "<p>APIs are useful.</p>\n",
    );
}

#[test]
fn disabled_by_default_leaves_definition_as_a_paragraph() {
    html(
        "*[HTML]: Hyper Text Markup Language\n",
        "<p>*[HTML]: Hyper Text Markup Language</p>\n",
    );
}
