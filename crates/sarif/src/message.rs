use once_cell::sync::Lazy;
use regex::Regex;

/// One segment of a parsed alert message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// Literal text.
    Text(String),
    /// A reference to the related location with id `dest`, displayed as
    /// `text`.
    Link { dest: u32, text: String },
}

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\((\d+)\)").expect("link regex"));

/// Splits an alert message into literal text and related-location
/// references written as `[text](id)`.
///
/// Concatenating the segments' text in order reproduces the display
/// message. Anything that does not match the placeholder syntax, including
/// bracketed text without a numeric destination, stays literal.
pub fn parse_message(text: &str) -> Vec<MessagePart> {
    let mut parts = Vec::new();
    let mut last = 0;
    for captures in LINK.captures_iter(text) {
        let all = captures.get(0).expect("whole match");
        if all.start() > last {
            parts.push(MessagePart::Text(text[last..all.start()].to_string()));
        }
        // A destination too large for u32 is not a placeholder.
        match captures[2].parse() {
            Ok(dest) => parts.push(MessagePart::Link {
                dest,
                text: captures[1].to_string(),
            }),
            Err(_) => parts.push(MessagePart::Text(all.as_str().to_string())),
        }
        last = all.end();
    }
    if last < text.len() {
        parts.push(MessagePart::Text(text[last..].to_string()));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(
            parse_message("nothing to see here"),
            vec![MessagePart::Text("nothing to see here".to_string())]
        );
    }

    #[test]
    fn links_split_the_message() {
        let parts = parse_message("value [x](1) flows to [sink](2).");
        assert_eq!(
            parts,
            vec![
                MessagePart::Text("value ".to_string()),
                MessagePart::Link {
                    dest: 1,
                    text: "x".to_string()
                },
                MessagePart::Text(" flows to ".to_string()),
                MessagePart::Link {
                    dest: 2,
                    text: "sink".to_string()
                },
                MessagePart::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn non_numeric_destinations_stay_literal() {
        assert_eq!(
            parse_message("see [the docs](https://example.com)"),
            vec![MessagePart::Text("see [the docs](https://example.com)".to_string())]
        );
    }

    #[test]
    fn concatenation_reproduces_the_message() {
        let message = "flow from [a](0) to [b](1) and back";
        let rebuilt: String = parse_message(message)
            .into_iter()
            .map(|part| match part {
                MessagePart::Text(text) => text,
                MessagePart::Link { text, .. } => text,
            })
            .collect();
        assert_eq!(rebuilt, "flow from a to b and back");
    }
}
