// Highlighter backends.
//
// A highlighter decorates one chunk of rendered text according to the
// opcode kind that produced it. `equal` chunks always pass through
// untouched; every other kind is wrapped in a backend-specific marker.
//
// Markers never change the visible width of the text, so column math in
// the hexdump encoder is done on byte counts alone.

use std::fmt::Write;

use owo_colors::{AnsiColors, OwoColorize};

use crate::align::OpKind;

/// How non-equal chunks are decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    /// Terminal escape codes: white text on a kind-specific background.
    #[default]
    Ansi,
    /// `<span class='KIND'>` markup with HTML-escaped text.
    Html,
    /// No decoration at all.
    Plain,
}

impl Highlight {
    /// Append `text`, decorated for `kind`, to `out`.
    pub fn paint(self, out: &mut String, text: &str, kind: OpKind) {
        if kind == OpKind::Equal {
            out.push_str(text);
            return;
        }
        match self {
            Self::Ansi => {
                // Writing into a String cannot fail.
                let _ = write!(out, "{}", text.white().on_color(background(kind)));
            }
            Self::Html => {
                out.push_str("<span class='");
                out.push_str(kind.as_str());
                out.push_str("'>");
                push_escaped(out, text);
                out.push_str("</span>");
            }
            Self::Plain => out.push_str(text),
        }
    }

    /// Decorate `text` for `kind` into a new string.
    pub fn highlight(self, text: &str, kind: OpKind) -> String {
        let mut out = String::with_capacity(text.len() + 32);
        self.paint(&mut out, text, kind);
        out
    }
}

fn background(kind: OpKind) -> AnsiColors {
    match kind {
        OpKind::Replace => AnsiColors::Blue,
        OpKind::Insert => AnsiColors::Green,
        OpKind::Delete => AnsiColors::Red,
        OpKind::Equal => AnsiColors::Default,
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
