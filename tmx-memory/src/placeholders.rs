// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Realign vendor placeholders with the caller's interpolation tokens.
//!
//! Before a phrase is sent to the vendor, every interpolation in it (a
//! named placeholder such as `%{name}` or an HTML tag such as `<a
//! href="%{link}">`) is replaced by a positional marker `{0}`, `{1}`,
//! ... in order of appearance. Translators may reorder the markers, and
//! the vendor sometimes strips markup or keeps it literally. This
//! module tokenizes both sides and maps the markers in a translation
//! back onto the caller's original tokens.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// HTML elements which never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
}

/// A markup tag as written in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attrs: String,
    raw: String,
}

impl Tag {
    /// Lowercased element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute text, without surrounding whitespace.
    pub fn attrs(&self) -> &str {
        &self.attrs
    }

    /// The tag exactly as it appeared in the text.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A lexical unit of translatable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text without interpolations. Kept for reconstruction only.
    PlainRun(String),
    /// A `%{name}` placeholder.
    NamedPlaceholder(String),
    /// A vendor `{i}` marker.
    Positional(usize),
    TagOpen(Tag),
    TagClose(Tag),
    TagSelfClosing(Tag),
}

/// What makes two interpolation tokens interchangeable.
///
/// Tags are compared by name and kind only: the vendor is free to drop
/// attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum Identity<'a> {
    Named(&'a str),
    Tag(TagKind, &'a str),
}

impl Token {
    /// Render the token back to text.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Token::PlainRun(text) => Cow::Borrowed(text),
            Token::NamedPlaceholder(name) => Cow::Owned(format!("%{{{name}}}")),
            Token::Positional(index) => Cow::Owned(format!("{{{index}}}")),
            Token::TagOpen(tag) | Token::TagClose(tag) | Token::TagSelfClosing(tag) => {
                Cow::Borrowed(&tag.raw)
            }
        }
    }

    /// Returns true for tokens which the vendor replaces by a
    /// positional marker.
    pub fn is_interpolation(&self) -> bool {
        !matches!(self, Token::PlainRun(_) | Token::Positional(_))
    }

    /// Returns the tag kind and tag for markup tokens.
    pub fn tag(&self) -> Option<(TagKind, &Tag)> {
        match self {
            Token::TagOpen(tag) => Some((TagKind::Open, tag)),
            Token::TagClose(tag) => Some((TagKind::Close, tag)),
            Token::TagSelfClosing(tag) => Some((TagKind::SelfClosing, tag)),
            _ => None,
        }
    }

    fn is_marker(&self) -> bool {
        !matches!(self, Token::PlainRun(_))
    }

    fn identity(&self) -> Option<Identity<'_>> {
        match self {
            Token::NamedPlaceholder(name) => Some(Identity::Named(name)),
            _ => self
                .tag()
                .map(|(kind, tag)| Identity::Tag(kind, tag.name())),
        }
    }
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r#"(?x)
              %\{(?<named>[^{}\s]+)\}                 # named placeholder
            | \{(?<positional>0|[1-9][0-9]*)\}        # vendor marker
            | <(?<close>/)?                           # start of a tag
              (?<tag>[A-Za-z][A-Za-z0-9:-]*)          # element name
              (?<attrs>(?:\s(?:"[^"]*"|'[^']*'|[^<>"'/]|/[^<>])*)?)
              (?<selfclose>/)?>
        "#;
        Regex::new(pattern).expect("well-formed regex")
    })
}

fn push_plain(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(Token::PlainRun(run)) => run.push_str(text),
        _ => tokens.push(Token::PlainRun(text.to_string())),
    }
}

/// Split `text` into placeholders, tags and plain runs.
///
/// Concatenating the rendered tokens gives back `text`. Placeholders
/// inside the attributes of a tag belong to that tag.
///
/// # Examples
///
/// ```
/// use tmx_memory::placeholders::{tokenize, Token};
///
/// let tokens = tokenize("Hi %{name}, see <br/>{0}");
/// assert_eq!(tokens[0], Token::PlainRun("Hi ".into()));
/// assert_eq!(tokens[1], Token::NamedPlaceholder("name".into()));
/// assert!(matches!(tokens[3], Token::TagSelfClosing(_)));
/// assert_eq!(tokens[4], Token::Positional(0));
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for captures in token_regex().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        push_plain(&mut tokens, &text[last..whole.start()]);
        last = whole.end();

        if let Some(name) = captures.name("named") {
            tokens.push(Token::NamedPlaceholder(name.as_str().to_string()));
        } else if let Some(index) = captures.name("positional") {
            match index.as_str().parse() {
                Ok(index) => tokens.push(Token::Positional(index)),
                // Too large to be a marker.
                Err(_) => push_plain(&mut tokens, whole.as_str()),
            }
        } else if let Some(name) = captures.name("tag") {
            let tag = Tag {
                name: name.as_str().to_ascii_lowercase(),
                attrs: captures
                    .name("attrs")
                    .map_or("", |attrs| attrs.as_str())
                    .trim()
                    .to_string(),
                raw: whole.as_str().to_string(),
            };
            let token = if captures.name("close").is_some() {
                Token::TagClose(tag)
            } else if captures.name("selfclose").is_some()
                || VOID_ELEMENTS.contains(&tag.name.as_str())
            {
                Token::TagSelfClosing(tag)
            } else {
                Token::TagOpen(tag)
            };
            tokens.push(token);
        }
    }
    push_plain(&mut tokens, &text[last..]);
    tokens
}

/// Check that every open tag is closed by a tag of the same name, in
/// nesting order.
pub fn is_balanced(tokens: &[Token]) -> bool {
    let mut open = Vec::new();
    for token in tokens {
        match token {
            Token::TagOpen(tag) => open.push(tag.name()),
            Token::TagClose(tag) => {
                if open.pop() != Some(tag.name()) {
                    return false;
                }
            }
            _ => {}
        }
    }
    open.is_empty()
}

/// Returns true if `tokens` start with an open tag whose matching close
/// tag is the very last token, such as `<u>...</u>`.
fn has_wrapping_pair(tokens: &[Token]) -> bool {
    let (Some(Token::TagOpen(open)), Some(Token::TagClose(close))) = (tokens.first(), tokens.last())
    else {
        return false;
    };
    if open.name() != close.name() || !is_balanced(tokens) {
        return false;
    }

    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::TagOpen(_) => depth += 1,
            Token::TagClose(_) => {
                depth -= 1;
                if depth == 0 && idx + 1 != tokens.len() {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// The caller's tokens lined up against one vendor source text.
#[derive(Debug)]
pub struct Alignment<'a> {
    /// Phrase tokens referred to by `{0}`, `{1}`, ...
    positional: Vec<Option<&'a Token>>,
    /// Phrase tags which the vendor kept literally, in source order.
    literals: Vec<&'a Token>,
    /// A tag pair around the whole phrase which the vendor dropped.
    wrapper: Option<(&'a Token, &'a Token)>,
}

type Bindings<'a> = (Vec<Option<&'a Token>>, Vec<&'a Token>);

/// Pair every marker of the vendor source with the phrase interpolation
/// at the same position.
///
/// Returns `None` if the two sides do not line up: a different number
/// of tokens, a literal token with another identity, or one `{i}`
/// standing for two different tokens.
fn bind_by_position<'a>(
    markers: &[&Token],
    interpolations: &[&'a Token],
) -> Option<Bindings<'a>> {
    if markers.len() != interpolations.len() {
        return None;
    }

    let mut positional = Vec::new();
    let mut literals = Vec::new();
    for (marker, token) in markers.iter().zip(interpolations) {
        match marker {
            // Indices are contiguous, so none exceeds the marker count.
            Token::Positional(index) if *index >= markers.len() => return None,
            Token::Positional(index) => {
                if positional.len() <= *index {
                    positional.resize(*index + 1, None);
                }
                let bound = positional[*index];
                if bound.is_some_and(|bound| bound != *token) {
                    return None;
                }
                positional[*index] = Some(*token);
            }
            _ if marker.identity() == token.identity() => {
                if token.tag().is_some() {
                    literals.push(*token);
                }
            }
            _ => return None,
        }
    }
    Some((positional, literals))
}

/// Line up the two sides by identity.
///
/// Phrase tokens which the vendor kept literally are consumed. The
/// others are numbered in order of first appearance.
fn bind_by_identity<'a>(markers: &[&Token], interpolations: &[&'a Token]) -> Bindings<'a> {
    let mut consumed = vec![false; interpolations.len()];
    let mut literals = Vec::new();
    for identity in markers.iter().filter_map(|marker| marker.identity()) {
        let found = interpolations
            .iter()
            .enumerate()
            .position(|(idx, token)| !consumed[idx] && token.identity() == Some(identity));
        if let Some(idx) = found {
            consumed[idx] = true;
            if interpolations[idx].tag().is_some() {
                literals.push(interpolations[idx]);
            }
        }
    }

    let mut positional = Vec::new();
    for (token, _) in interpolations
        .iter()
        .zip(&consumed)
        .filter(|(_, consumed)| !**consumed)
    {
        if !positional.contains(&Some(*token)) {
            positional.push(Some(*token));
        }
    }
    (positional, literals)
}

impl<'a> Alignment<'a> {
    /// Line up `phrase_tokens` with the markers in the vendor's
    /// `source_text`.
    ///
    /// The vendor source is the phrase with some interpolations
    /// replaced by `{i}` and others kept literally, so the two are
    /// paired position by position. When that fails, interpolations
    /// kept literally are matched by identity and the remaining ones
    /// are numbered in order of first appearance, which is how the
    /// vendor numbered them when the phrase was uploaded.
    pub fn new(source_text: &str, phrase_tokens: &'a [Token]) -> Self {
        let source_tokens = tokenize(source_text);
        let markers = source_tokens
            .iter()
            .filter(|token| token.is_marker())
            .collect::<Vec<_>>();
        let mut interpolations = phrase_tokens
            .iter()
            .filter(|token| token.is_interpolation())
            .collect::<Vec<_>>();

        let mut wrapper = None;
        if has_wrapping_pair(phrase_tokens) && markers.len() + 2 == interpolations.len() {
            let close = interpolations.pop();
            let open = interpolations.remove(0);
            wrapper = close.map(|close| (open, close));
        }

        let (positional, literals) = bind_by_position(&markers, &interpolations)
            .unwrap_or_else(|| bind_by_identity(&markers, &interpolations));

        Alignment {
            positional,
            literals,
            wrapper,
        }
    }

    /// Rewrite `target_text` using the alignment.
    ///
    /// Markers without a counterpart are left as they are.
    pub fn apply(&self, target_text: &str) -> String {
        let target_tokens = tokenize(target_text);
        let mut seen_tags = HashMap::<Identity<'_>, usize>::new();
        let mut translated = String::with_capacity(target_text.len());

        for token in &target_tokens {
            match token {
                Token::Positional(index) => match self.positional.get(*index).copied().flatten() {
                    Some(mapped) => translated.push_str(&mapped.render()),
                    None => translated.push_str(&token.render()),
                },
                Token::TagOpen(_) | Token::TagClose(_) | Token::TagSelfClosing(_) => {
                    let identity = token.identity();
                    let nth = identity.map_or(0, |identity| {
                        let count = seen_tags.entry(identity).or_insert(0);
                        *count += 1;
                        *count - 1
                    });
                    let original = self
                        .literals
                        .iter()
                        .filter(|tag| tag.identity() == identity)
                        .nth(nth);
                    match original {
                        Some(original) => translated.push_str(&original.render()),
                        None => translated.push_str(&token.render()),
                    }
                }
                _ => translated.push_str(&token.render()),
            }
        }

        match self.wrapper {
            Some((open, close))
                if target_tokens.first().and_then(Token::identity) != open.identity() =>
            {
                format!("{}{translated}{}", open.render(), close.render())
            }
            _ => translated,
        }
    }
}

/// Replace the positional markers in `target_text` by the caller's
/// tokens.
///
/// The markers are numbered against `source_text`, the vendor's copy of
/// the untranslated text, which is tokenized the same way as the
/// phrase.
pub fn realign(target_text: &str, source_text: &str, phrase_tokens: &[Token]) -> String {
    Alignment::new(source_text, phrase_tokens).apply(target_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(tokens: &[Token]) -> String {
        tokens.iter().map(|token| token.render()).collect()
    }

    fn realign_key(key: &str, source: &str, target: &str) -> String {
        realign(target, source, &tokenize(key))
    }

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(
            tokenize("Hello world"),
            vec![Token::PlainRun("Hello world".into())]
        );
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_tokenize_placeholders() {
        assert_eq!(
            tokenize("I like %{apples} and {1}"),
            vec![
                Token::PlainRun("I like ".into()),
                Token::NamedPlaceholder("apples".into()),
                Token::PlainRun(" and ".into()),
                Token::Positional(1),
            ]
        );
    }

    #[test]
    fn test_tokenize_ignores_non_markers() {
        let text = "{ foo } {01} %{ x } {} %{}";
        assert_eq!(tokenize(text), vec![Token::PlainRun(text.into())]);
    }

    #[test]
    fn test_tokenize_huge_marker_is_plain() {
        let text = "a {99999999999999999999999} b";
        assert_eq!(tokenize(text), vec![Token::PlainRun(text.into())]);
    }

    #[test]
    fn test_tokenize_tags() {
        let tokens = tokenize(r#"<a href="%{link}" target="_blank">Help</a><br/><hr>"#);
        assert_eq!(tokens.len(), 5);
        match &tokens[0] {
            Token::TagOpen(tag) => {
                assert_eq!(tag.name(), "a");
                assert_eq!(tag.attrs(), r#"href="%{link}" target="_blank""#);
                assert_eq!(tag.raw(), r#"<a href="%{link}" target="_blank">"#);
            }
            other => panic!("expected an open tag, got {other:?}"),
        }
        assert!(matches!(&tokens[2], Token::TagClose(tag) if tag.name() == "a"));
        assert!(matches!(&tokens[3], Token::TagSelfClosing(tag) if tag.name() == "br"));
        // Void elements close themselves.
        assert!(matches!(&tokens[4], Token::TagSelfClosing(tag) if tag.name() == "hr"));
    }

    #[test]
    fn test_tokenize_placeholder_as_attributes() {
        let tokens = tokenize("<a %{help_link}>Help</a>");
        assert!(matches!(&tokens[0], Token::TagOpen(tag) if tag.attrs() == "%{help_link}"));
        assert!(!tokens
            .iter()
            .any(|token| matches!(token, Token::NamedPlaceholder(_))));
    }

    #[test]
    fn test_tokenize_is_lossless() {
        for text in [
            "Director of Privacy <br/>Lumos Labs",
            "<u>Our use of cookies.</u>",
            "x < y and y > z, 50% {off}",
            "<B CLASS='x'>%{n}</B> <!-- comment --> <br />",
            "&larr; Other Awesome Games",
        ] {
            assert_eq!(render(&tokenize(text)), text);
        }
    }

    #[test]
    fn test_tag_names_are_case_insensitive() {
        let tokens = tokenize("<B>x</b>");
        assert!(is_balanced(&tokens));
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(&tokenize("<p><b>x</b><br></p>")));
        assert!(!is_balanced(&tokenize("<p><b>x</p></b>")));
        assert!(!is_balanced(&tokenize("<p>x")));
        assert!(!is_balanced(&tokenize("x</p>")));
    }

    #[test]
    fn test_realign_single_placeholder() {
        assert_eq!(
            realign_key("Hello there %{name}", "Hello there {0}", "Hola {0}"),
            "Hola %{name}"
        );
    }

    #[test]
    fn test_realign_reordered_placeholders() {
        assert_eq!(
            realign_key(
                "I like %{apples}, %{bananas}, and %{peaches}",
                "I like {0}, {1}, and {2}",
                "Me gustan los {2}, {0}, and {1}"
            ),
            "Me gustan los %{peaches}, %{apples}, and %{bananas}"
        );
    }

    #[test]
    fn test_realign_repeated_marker() {
        assert_eq!(
            realign_key("%{n} apples", "{0} apples", "{0} Äpfel ({0})"),
            "%{n} Äpfel (%{n})"
        );
    }

    #[test]
    fn test_realign_repeated_placeholder_in_key() {
        assert_eq!(
            realign_key("%{n}, %{n} and %{m}", "{0}, {0} and {1}", "{1} und {0}, {0}"),
            "%{m} und %{n}, %{n}"
        );
    }

    #[test]
    fn test_realign_repeated_placeholder_on_mismatch() {
        // The sides do not pair up, so the repeated name is numbered once.
        assert_eq!(
            realign_key("%{n} of %{n} by %{m}", "{0} of {0} by {1} %{x}", "{1}: {0} von {0}"),
            "%{m}: %{n} von %{n}"
        );
    }

    #[test]
    fn test_realign_literal_tags_mixed_with_markers() {
        assert_eq!(
            realign_key(
                r#"<a href="x">Help</a> and <a href="y">More</a>"#,
                "{0}Help{1} and <a>More</a>",
                "{0}Hilfe{1} und <a>Mehr</a>"
            ),
            r#"<a href="x">Hilfe</a> und <a href="y">Mehr</a>"#
        );
    }

    #[test]
    fn test_realign_keeps_marker_beyond_count() {
        assert_eq!(
            realign_key("Hi %{name}", "Hi {7}", "Hallo {7}"),
            "Hallo {7}"
        );
    }

    #[test]
    fn test_realign_leaves_unmatched_marker() {
        // The vendor kept the named placeholder literally, so `{0}`
        // refers to nothing the caller knows about.
        assert_eq!(
            realign_key(
                "Click on Lumos %{foo} Labs",
                "Click on {0} Lumos %{foo} Labs",
                "Klicke auf {0} Lumos %{foo} Labs"
            ),
            "Klicke auf {0} Lumos %{foo} Labs"
        );
    }

    #[test]
    fn test_realign_marker_out_of_range() {
        assert_eq!(
            realign_key("Hi %{name}", "Hi {0}", "Hallo {0} {1}"),
            "Hallo %{name} {1}"
        );
    }

    #[test]
    fn test_realign_self_closing_tag() {
        assert_eq!(
            realign_key(
                "Director of Privacy <br/>Lumos Labs",
                "Director of Privacy {0}Lumos Labs",
                "Datenschutzbeauftragter {0}Lumos Labs"
            ),
            "Datenschutzbeauftragter <br/>Lumos Labs"
        );
    }

    #[test]
    fn test_realign_literal_tag_kept() {
        assert_eq!(
            realign_key(
                "Director of Privacy <br/>Lumos Labs",
                "Director of Privacy <br/>Lumos Labs",
                "Datenschutzbeauftragter <br/>Lumos Labs"
            ),
            "Datenschutzbeauftragter <br/>Lumos Labs"
        );
    }

    #[test]
    fn test_realign_paired_tags() {
        assert_eq!(
            realign_key(
                "<u>Our use of cookies.</u>",
                "{0}Our use of cookies.{1}",
                "{0}Verwendung von Cookies.{1}"
            ),
            "<u>Verwendung von Cookies.</u>"
        );
    }

    #[test]
    fn test_realign_nested_tags_keep_pairing() {
        let key = "<p>See <b>%{count}</b> items</p>";
        let aligned = realign_key(key, "{0}See {1}{2}{3} items{4}", "{0}{1}{2}{3} Artikel ansehen{4}");
        assert_eq!(aligned, "<p><b>%{count}</b> Artikel ansehen</p>");
        assert!(is_balanced(&tokenize(&aligned)));
    }

    #[test]
    fn test_realign_restores_wrapping_tags() {
        assert_eq!(
            realign_key(
                "<u>Our use of cookies</u>",
                "Our use of cookies",
                "Verwendung von Cookies"
            ),
            "<u>Verwendung von Cookies</u>"
        );
    }

    #[test]
    fn test_realign_wrapping_tags_with_inner_placeholder() {
        assert_eq!(
            realign_key("<b>%{count} new</b>", "{0} new", "{0} neu"),
            "<b>%{count} neu</b>"
        );
    }

    #[test]
    fn test_realign_does_not_double_wrap() {
        assert_eq!(
            realign_key("<u>Cookies</u>", "Cookies", "<u>Kekse</u>"),
            "<u>Kekse</u>"
        );
    }

    #[test]
    fn test_realign_tag_with_placeholder_attributes() {
        assert_eq!(
            realign_key(
                r#"Please visit <a href="%{help_link}" target="_blank">Help Center</a> for FAQs."#,
                "Please visit {0}Help Center{1} for FAQs.",
                "Besuchen Sie das Help-Center. {0}{1}FAQs."
            ),
            r#"Besuchen Sie das Help-Center. <a href="%{help_link}" target="_blank"></a>FAQs."#
        );
    }

    #[test]
    fn test_realign_restores_stripped_attributes() {
        assert_eq!(
            realign_key(
                "Visit <a %{help_link}>Help</a> now",
                "Visit <a>Help</a> now",
                "Jetzt <a>Hilfe</a> besuchen"
            ),
            "Jetzt <a %{help_link}>Hilfe</a> besuchen"
        );
    }

    #[test]
    fn test_realign_keeps_unknown_vendor_tags() {
        assert_eq!(
            realign_key("Hello", "Hello", "<i>Hallo</i>"),
            "<i>Hallo</i>"
        );
    }

    #[test]
    fn test_realign_preserves_whitespace() {
        assert_eq!(
            realign_key("a %{b}", "a {0}", "  x  {0}\n"),
            "  x  %{b}\n"
        );
    }
}
