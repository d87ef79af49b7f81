//! Escape markup: tokenizer and load-time color baking.
//!
//! Raw localized values may contain inline markup that the resolver
//! materializes into final display text. Four escape classes share one
//! grammar, parsed left-to-right, non-overlapping, in a single scan:
//!
//! | form       | class     | meaning                                  |
//! |------------|-----------|------------------------------------------|
//! | `{N}`      | parameter | Nth caller-supplied positional parameter |
//! | `@{key}`   | key ref   | value of another localization key        |
//! | `#{name}`  | context   | named property of the call-site context  |
//! | `^{color}` | color on  | SGR open for a named or `#RRGGBB` color  |
//! | `^{}`      | color off | SGR reset                                |
//!
//! Delimiters can be escaped to appear literally: `{{` emits `{`, and a
//! doubled sigil before a brace (`@@{`, `##{`, `^^{`) emits the sigil and
//! brace as text. Anything that does not parse as a token passes through
//! untouched — a lone sigil, a `{...}` group that is not all digits, an
//! unknown color name, an unclosed brace. Malformed markup is therefore
//! never an error, matching the rest of the pipeline's degrade-to-literal
//! policy.
//!
//! Color tags are resolved at load time via [`bake_colors`] because their
//! rewrite never depends on call-site parameters; the tokenizer still
//! understands them so that expansion stays total on un-baked input.

use std::borrow::Cow;

use crate::color::{SGR_RESET, TagColor};

/// One parsed piece of a raw localized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text, escape sequences already collapsed.
    Text(Cow<'a, str>),
    /// `{N}` positional parameter reference.
    Param(usize),
    /// `@{key}` reference to another localization key.
    KeyRef(&'a str),
    /// `#{name}` context property reference.
    Context(&'a str),
    /// `^{color}` color tag.
    ColorOpen(TagColor),
    /// `^{}` color reset.
    ColorReset,
}

/// Tokenize a raw value in a single left-to-right scan.
///
/// Values without markup come back as one borrowed text token.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    if !input
        .bytes()
        .any(|b| matches!(b, b'{' | b'@' | b'#' | b'^'))
    {
        if input.is_empty() {
            return Vec::new();
        }
        return vec![Token::Text(Cow::Borrowed(input))];
    }

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if bytes.get(i + 1) == Some(&b'{') {
                    literal.push('{');
                    i += 2;
                } else if let Some((index, end)) = parse_param(bytes, i) {
                    flush(&mut tokens, &mut literal);
                    tokens.push(Token::Param(index));
                    i = end;
                } else {
                    literal.push('{');
                    i += 1;
                }
            }
            sigil @ (b'@' | b'#' | b'^') => {
                if bytes.get(i + 1) == Some(&sigil) && bytes.get(i + 2) == Some(&b'{') {
                    // Doubled sigil: literal sigil + brace.
                    literal.push(sigil as char);
                    literal.push('{');
                    i += 3;
                } else if bytes.get(i + 1) == Some(&b'{') {
                    let Some(close) = find_close(bytes, i + 2) else {
                        // Unclosed tag: the rest of the input is literal.
                        literal.push_str(&input[i..]);
                        i = bytes.len();
                        continue;
                    };
                    let inner = &input[i + 2..close];
                    let token = match sigil {
                        b'@' if !inner.is_empty() => Some(Token::KeyRef(inner)),
                        b'#' if !inner.is_empty() => Some(Token::Context(inner)),
                        b'^' if inner.is_empty() => Some(Token::ColorReset),
                        b'^' => TagColor::parse(inner).map(Token::ColorOpen),
                        _ => None,
                    };
                    match token {
                        Some(token) => {
                            flush(&mut tokens, &mut literal);
                            tokens.push(token);
                        }
                        // Unknown payload: the whole fragment stays literal.
                        None => literal.push_str(&input[i..=close]),
                    }
                    i = close + 1;
                } else {
                    literal.push(sigil as char);
                    i += 1;
                }
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b'{' | b'@' | b'#' | b'^') {
                    i += 1;
                }
                literal.push_str(&input[start..i]);
            }
        }
    }

    flush(&mut tokens, &mut literal);
    tokens
}

/// Rewrite color tags (`^{...}` and `^{}`) into SGR sequences.
///
/// Runs once at load time over each stored value. Every other byte passes
/// through verbatim, including the escaped forms of the other classes and
/// `^^{` itself, so the resolve-time tokenizer still sees them untouched.
#[must_use]
pub fn bake_colors(value: &str) -> String {
    if !value.contains('^') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'^' {
            if bytes.get(i + 1) == Some(&b'^') && bytes.get(i + 2) == Some(&b'{') {
                // Escaped sigil: keep verbatim for the resolve-time tokenizer.
                out.push_str("^^{");
                i += 3;
                continue;
            }
            if bytes.get(i + 1) == Some(&b'{')
                && let Some(close) = find_close(bytes, i + 2)
            {
                let inner = &value[i + 2..close];
                if inner.is_empty() {
                    out.push_str(SGR_RESET);
                    i = close + 1;
                    continue;
                }
                if let Some(tag) = TagColor::parse(inner) {
                    out.push_str(&tag.sgr());
                    i = close + 1;
                    continue;
                }
            }
            out.push('^');
            i += 1;
        } else {
            let start = i;
            while i < bytes.len() && bytes[i] != b'^' {
                i += 1;
            }
            out.push_str(&value[start..i]);
        }
    }
    out
}

/// Parse `{N}` starting at the `{` in `bytes[open]`. Returns the index and
/// the position one past the closing brace.
fn parse_param(bytes: &[u8], open: usize) -> Option<(usize, usize)> {
    let mut i = open + 1;
    let mut index: usize = 0;
    let mut digits = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'0'..=b'9' => {
                index = index.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
                digits += 1;
                i += 1;
            }
            b'}' if digits > 0 => return Some((index, i + 1)),
            _ => return None,
        }
    }
    None
}

fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == b'}')
        .map(|offset| from + offset)
}

fn flush<'a>(tokens: &mut Vec<Token<'a>>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Text(Cow::Owned(std::mem::take(literal))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Ansi16, Rgb};
    use proptest::prelude::*;

    fn text(s: &str) -> Token<'_> {
        Token::Text(Cow::Borrowed(s))
    }

    fn owned(s: &str) -> Token<'static> {
        Token::Text(Cow::Owned(s.to_string()))
    }

    #[test]
    fn plain_text_is_one_borrowed_token() {
        assert_eq!(tokenize("Hello world"), vec![text("Hello world")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn positional_parameters() {
        assert_eq!(
            tokenize("Hello {0}, meet {1}!"),
            vec![
                owned("Hello "),
                Token::Param(0),
                owned(", meet "),
                Token::Param(1),
                owned("!"),
            ]
        );
    }

    #[test]
    fn key_and_context_references() {
        assert_eq!(
            tokenize("@{ui.title}: #{player}"),
            vec![
                Token::KeyRef("ui.title"),
                owned(": "),
                Token::Context("player"),
            ]
        );
    }

    #[test]
    fn color_tags() {
        assert_eq!(
            tokenize("^{red}danger^{}"),
            vec![
                Token::ColorOpen(TagColor::Ansi16(Ansi16::Red)),
                owned("danger"),
                Token::ColorReset,
            ]
        );
        assert_eq!(
            tokenize("^{#ff8000}"),
            vec![Token::ColorOpen(TagColor::Rgb(Rgb::new(255, 128, 0)))]
        );
    }

    #[test]
    fn doubled_delimiters_are_literal() {
        assert_eq!(tokenize("{{0}"), vec![owned("{0}")]);
        assert_eq!(tokenize("@@{key}"), vec![owned("@{key}")]);
        assert_eq!(tokenize("##{name}"), vec![owned("#{name}")]);
        assert_eq!(tokenize("^^{red}"), vec![owned("^{red}")]);
    }

    #[test]
    fn lone_sigils_are_literal() {
        assert_eq!(tokenize("user@host #1 x^2"), vec![owned("user@host #1 x^2")]);
    }

    #[test]
    fn malformed_groups_pass_through() {
        // Not all digits.
        assert_eq!(tokenize("{abc}"), vec![owned("{abc}")]);
        assert_eq!(tokenize("{1a}"), vec![owned("{1a}")]);
        // Unclosed.
        assert_eq!(tokenize("tail {12"), vec![owned("tail {12")]);
        assert_eq!(tokenize("tail @{key"), vec![owned("tail @{key")]);
        // Empty payloads.
        assert_eq!(tokenize("@{}"), vec![owned("@{}")]);
        assert_eq!(tokenize("#{}"), vec![owned("#{}")]);
        // Unknown color.
        assert_eq!(tokenize("^{plaid}"), vec![owned("^{plaid}")]);
    }

    #[test]
    fn adjacent_tokens_without_text() {
        assert_eq!(
            tokenize("{0}{1}"),
            vec![Token::Param(0), Token::Param(1)]
        );
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(
            tokenize("héllo {0} wörld"),
            vec![owned("héllo "), Token::Param(0), owned(" wörld")]
        );
    }

    #[test]
    fn bake_rewrites_color_tags_only() {
        assert_eq!(
            bake_colors("^{red}hp^{} {0} @{other.key}"),
            "\u{1b}[31mhp\u{1b}[0m {0} @{other.key}"
        );
    }

    #[test]
    fn bake_truecolor() {
        assert_eq!(bake_colors("^{#00ff00}go"), "\u{1b}[38;2;0;255;0mgo");
    }

    #[test]
    fn bake_leaves_escaped_and_unknown_tags() {
        assert_eq!(bake_colors("^^{red}"), "^^{red}");
        assert_eq!(bake_colors("^{plaid}"), "^{plaid}");
        assert_eq!(bake_colors("caret^power"), "caret^power");
        assert_eq!(bake_colors("unclosed ^{red"), "unclosed ^{red");
    }

    #[test]
    fn bake_without_carets_is_identity() {
        assert_eq!(bake_colors("plain {0} text"), "plain {0} text");
    }

    proptest! {
        #[test]
        fn tokenize_never_panics(input in "\\PC*") {
            let _ = tokenize(&input);
        }

        #[test]
        fn sigil_free_text_round_trips(input in "[^{}@#^]*") {
            let tokens = tokenize(&input);
            let mut rendered = String::new();
            for token in tokens {
                match token {
                    Token::Text(text) => rendered.push_str(&text),
                    other => prop_assert!(false, "unexpected token {:?}", other),
                }
            }
            prop_assert_eq!(rendered, input);
        }

        #[test]
        fn bake_never_panics(input in "\\PC*") {
            let _ = bake_colors(&input);
        }
    }
}
