use super::*;

#[test]
fn substitutes_front_matter_key_into_body() {
    html_opts_i(false, "---\nTitle: Doc\n---\n# [%Title]\n", "<h1>Doc</h1>\n", |opts| {
        opts.extension.metadata = true;
        opts.extension.variable_substitution = true;
    });
}

#[test]
fn unknown_key_left_literal() {
    html_opts_i(false, "---\nTitle: Doc\n---\n[%Missing]\n", "<p>[%Missing]</p>\n", |opts| {
        opts.extension.metadata = true;
        opts.extension.variable_substitution = true;
    });
}

#[test]
fn disabled_leaves_marker_literal() {
    html_opts_i(false, "---\nTitle: Doc\n---\n[%Title]\n", "<p>[%Title]</p>\n", |opts| {
        opts.extension.metadata = true;
    });
}

#[test]
fn transform_filters_ignored_without_own_gate() {
    // With `metadata_transforms` off, a known key is substituted verbatim
    // and any trailing `:filter` suffix is dropped rather than applied.
    html_opts_i(
        false,
        "---\nTitle: Hello World\n---\n[%Title:lowercase]\n",
        "<p>Hello World</p>\n",
        |opts| {
            opts.extension.metadata = true;
            opts.extension.variable_substitution = true;
        },
    );
}

#[test]
fn transforms_enabled_applies_filter_chain() {
    html_opts_i(
        false,
        "---\nTitle: Hello World\n---\n[%Title:lowercase]\n",
        "<p>hello world</p>\n",
        |opts| {
            opts.extension.metadata = true;
            opts.extension.variable_substitution = true;
            opts.extension.metadata_transforms = true;
        },
    );
}
