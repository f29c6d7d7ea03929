//! Rendering of result strings.
//!
//! Analysis results are untrusted model output in which the only markup we
//! produce ourselves is `<strong>...</strong>`. These helpers split a string
//! into plain and emphasized segments so it can be shown as styled terminal
//! text. The browser does the same split in `app.js`.

use console::style;

const OPEN: &str = "<strong>";
const CLOSE: &str = "</strong>";

/// A run of text, emphasized or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Strong(&'a str),
}

/// Split `text` on well-formed `<strong>` pairs. An opening tag without a
/// matching close is left as plain text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let inner_start = start + OPEN.len();
        let Some(len) = rest[inner_start..].find(CLOSE) else {
            break;
        };
        if start > 0 {
            out.push(Segment::Plain(&rest[..start]));
        }
        out.push(Segment::Strong(&rest[inner_start..inner_start + len]));
        rest = &rest[inner_start + len + CLOSE.len()..];
    }

    if !rest.is_empty() {
        out.push(Segment::Plain(rest));
    }
    out
}

/// Render for the terminal with emphasis in bold.
pub fn to_terminal(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|seg| match seg {
            Segment::Plain(s) => s.to_string(),
            Segment::Strong(s) => style(s).bold().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("a <strong>b</strong> c"),
            vec![
                Segment::Plain("a "),
                Segment::Strong("b"),
                Segment::Plain(" c")
            ]
        );
        assert_eq!(segments(""), vec![]);
        assert_eq!(segments("<strong>x</strong>"), vec![Segment::Strong("x")]);
    }

    #[test]
    fn test_unclosed_tag_is_plain() {
        assert_eq!(
            segments("a <strong>b"),
            vec![Segment::Plain("a <strong>b")]
        );
    }

    #[test]
    fn test_terminal_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(to_terminal("The <strong>Act</strong>"), "The Act");
        assert_eq!(to_terminal("a <strong>b"), "a <strong>b");
    }
}
