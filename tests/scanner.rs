use mcreflow::{
    Bracket, DiagnosticKind, LiteralTracker, ReflowOptions, Scanner, SigilPosition, SigilRole,
    Span, TokenKind, classify, tokenize,
};

fn texts(input: &str) -> Vec<String> {
    tokenize(input)
        .expect("should tokenize")
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| t.text)
        .collect()
}

#[test]
fn selector_with_nbt() {
    assert_eq!(
        texts("@e[type=item,nbt={Item:{id:\"minecraft:stone\"}}]"),
        vec![
            "@e", "[", "type=item,nbt=", "{", "Item:", "{", "id:", "\"", "minecraft:stone", "\"",
            "}", "}", "]",
        ]
    );
}

#[test]
fn namespaced_tag_is_sigil_then_word() {
    let tokens = tokenize("if block ~ ~ ~ #minecraft:logs").expect("should tokenize");
    let sigil = tokens
        .iter()
        .position(|t| t.kind == TokenKind::Sigil)
        .expect("sigil token");
    assert_eq!(tokens[sigil].span, Span::new(1, 16));
    assert_eq!(tokens[sigil + 1].text, "minecraft:logs");
}

#[test]
fn quoted_line_break_is_reported() {
    let tokens = tokenize("\"a\n b\"").expect("should tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::QuoteOpen,
            TokenKind::Word,
            TokenKind::LineBreak,
            TokenKind::Whitespace,
            TokenKind::Word,
            TokenKind::QuoteClose,
        ]
    );
}

#[test]
fn custom_quote_and_sigil() {
    let options = ReflowOptions::new().sigil('%').quote_chars(&['`']);
    let kinds: Vec<_> = Scanner::new("% `a # b`", &options)
        .map(|t| t.expect("ok").kind)
        .collect();
    assert_eq!(kinds[0], TokenKind::Sigil);
    assert_eq!(kinds[2], TokenKind::QuoteOpen);
    assert!(!kinds[3..].contains(&TokenKind::Sigil));
}

#[test]
fn tracker_follows_scanner() {
    let options = ReflowOptions::default();
    let mut tracker = LiteralTracker::new();
    let mut depths = Vec::new();
    for token in Scanner::new("{a:[\"]\"]}", &options) {
        let token = token.expect("ok");
        tracker.observe(&token).expect("balanced");
        depths.push(tracker.depth());
    }
    assert_eq!(depths, vec![1, 1, 2, 2, 2, 2, 1, 0]);
    assert!(!tracker.inside_literal());
}

#[test]
fn tracker_reports_first_mismatch() {
    let options = ReflowOptions::default();
    let mut tracker = LiteralTracker::new();
    let err = Scanner::new("(]", &options)
        .map(|t| t.expect("ok"))
        .find_map(|t| tracker.observe(&t).err())
        .expect("mismatch");
    assert_eq!(
        err.kind,
        DiagnosticKind::MismatchedBracket {
            expected: Some(Bracket::Paren),
            found: Bracket::Square,
        }
    );
}

#[test]
fn classifier_table() {
    let cases = [
        ((true, true, true), false, SigilRole::LineComment),
        ((false, true, false), true, SigilRole::TrailingComment),
        ((false, true, false), false, SigilRole::Content),
        ((false, true, true), false, SigilRole::TrailingComment),
        ((false, false, false), true, SigilRole::Content),
    ];
    for ((first_on_line, word_start, last_on_line), completed, expected) in cases {
        let position = SigilPosition {
            first_on_line,
            word_start,
            last_on_line,
        };
        assert_eq!(classify(position, || completed), expected, "{position:?}");
    }
}
