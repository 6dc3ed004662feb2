//! Lightweight message formatting.
//!
//! Message bodies support a tiny markdown subset: `**strong**`, `*emphasis*`,
//! `` `code` `` and line breaks.  [`format_message`] renders it as HTML for
//! markup consumers; [`format_terminal`] renders the same subset as ANSI
//! styling.  Both are pure and are meant to run once, at render time, on the
//! raw message text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("code span pattern is valid"));
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("strong pattern is valid"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("emphasis pattern is valid"));

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_NORMAL_INTENSITY: &str = "\x1b[22m";
const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_NO_ITALIC: &str = "\x1b[23m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_DEFAULT_FG: &str = "\x1b[39m";

/// The target-specific spelling of each construct.
struct Markup {
    strong: (&'static str, &'static str),
    emphasis: (&'static str, &'static str),
    code: (&'static str, &'static str),
    line_break: &'static str,
    escape: fn(&str) -> Cow<'_, str>,
}

const HTML: Markup = Markup {
    strong: ("<strong>", "</strong>"),
    emphasis: ("<em>", "</em>"),
    code: ("<code>", "</code>"),
    line_break: "<br>",
    escape: escape_html,
};

const ANSI: Markup = Markup {
    strong: (ANSI_BOLD, ANSI_NORMAL_INTENSITY),
    emphasis: (ANSI_ITALIC, ANSI_NO_ITALIC),
    code: (ANSI_CYAN, ANSI_DEFAULT_FG),
    line_break: "\n",
    escape: verbatim,
};

/// Render raw message text as HTML.
///
/// ```
/// # use chatroom::format::format_message;
/// assert_eq!(format_message("a\n**b**"), "a<br><strong>b</strong>");
/// ```
pub fn format_message(raw: &str) -> String {
    render(raw, &HTML)
}

/// Render raw message text for a terminal.
///
/// Without color the text is returned unchanged.
pub fn format_terminal(raw: &str, use_color: bool) -> String {
    if use_color {
        render(raw, &ANSI)
    } else {
        raw.to_string()
    }
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn verbatim(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

fn render(raw: &str, markup: &Markup) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    // Code spans are literal: nothing inside them is emphasized.
    for span in CODE.captures_iter(raw) {
        let (Some(whole), Some(body)) = (span.get(0), span.get(1)) else {
            continue;
        };
        out.push_str(&render_prose(&raw[last..whole.start()], markup));
        out.push_str(markup.code.0);
        out.push_str(&(markup.escape)(body.as_str()));
        out.push_str(markup.code.1);
        last = whole.end();
    }
    out.push_str(&render_prose(&raw[last..], markup));
    out
}

fn render_prose(text: &str, markup: &Markup) -> String {
    if text.is_empty() {
        return String::new();
    }
    let escaped = (markup.escape)(text);
    let strong = STRONG.replace_all(&escaped, |caps: &Captures| {
        format!("{}{}{}", markup.strong.0, &caps[1], markup.strong.1)
    });
    let emphasis = EMPHASIS.replace_all(&strong, |caps: &Captures| {
        format!("{}{}{}", markup.emphasis.0, &caps[1], markup.emphasis.1)
    });
    if markup.line_break == "\n" {
        emphasis.into_owned()
    } else {
        emphasis.replace('\n', markup.line_break)
    }
}
