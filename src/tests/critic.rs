use super::*;

#[test]
fn markup_mode_keeps_all_four_spans() {
    html_opts!(
        [extension.critic_markup],
        "{++added++} {--removed--} {==highlighted==} {>>a comment<<}\n",
        concat!(
            "<p><ins class=\"critic\">added</ins> <del class=\"critic\">removed</del> ",
            "<mark class=\"critic\">highlighted</mark> ",
            "<span class=\"critic comment\">a comment</span></p>\n",
        ),
    );
}

#[test]
fn substitution_in_markup_mode_is_deletion_then_addition() {
    html_opts!(
        [extension.critic_markup],
        "{~~old~>new~~}\n",
        concat!(
            "<p><del class=\"critic\">old</del><ins class=\"critic\">new</ins></p>\n",
        ),
    );
}

#[test]
fn accept_mode_keeps_additions_and_drops_deletions_and_comments() {
    html_opts_i(
        false,
        "{++added++} {--removed--} {>>a comment<<}\n",
        "<p>added  </p>\n",
        |opts| {
            opts.extension.critic_markup = true;
            opts.extension.critic_markup_mode = parser::CriticMode::Accept;
        },
    );
}

#[test]
fn reject_mode_keeps_deletions_and_drops_additions_and_comments() {
    html_opts_i(
        false,
        "{++added++} {--removed--} {>>a comment<<}\n",
        "<p> removed </p>\n",
        |opts| {
            opts.extension.critic_markup = true;
            opts.extension.critic_markup_mode = parser::CriticMode::Reject;
        },
    );
}

#[test]
fn accept_mode_substitution_keeps_new_text() {
    html_opts_i(
        false,
        "{~~old~>new~~}\n",
        "<p>new</p>\n",
        |opts| {
            opts.extension.critic_markup = true;
            opts.extension.critic_markup_mode = parser::CriticMode::Accept;
        },
    );
}

#[test]
fn reject_mode_substitution_keeps_old_text() {
    html_opts_i(
        false,
        "{~~old~>new~~}\n",
        "<p>old</p>\n",
        |opts| {
            opts.extension.critic_markup = true;
            opts.extension.critic_markup_mode = parser::CriticMode::Reject;
        },
    );
}

#[test]
fn highlight_survives_accept_and_reject_as_plain_text() {
    html_opts_i(
        false,
        "{==kept==}\n",
        "<p>kept</p>\n",
        |opts| {
            opts.extension.critic_markup = true;
            opts.extension.critic_markup_mode = parser::CriticMode::Accept;
        },
    );
}

#[test]
fn nested_markup_resolves_inside_a_span() {
    html_opts!(
        [extension.critic_markup],
        "{++**bold**++}\n",
        "<p><ins class=\"critic\"><strong>bold</strong></ins></p>\n",
    );
}

#[test]
fn disabled_by_default() {
    html(
        "{++added++}\n",
        "<p>{++added++}</p>\n",
    );
}

#[test]
fn sourcepos() {
    assert_ast_match!(
        [extension.critic_markup],
        "{++added++}\n",
        (document (1:1-1:11) [
            (paragraph (1:1-1:11) [
                (critic_addition (1:1-1:11) [
                    (text (XXX) "added")
                ])
            ])
        ])
    );
}
