//! Tokenizer integration tests.
//!
//! Verifies classification, longest-match literals, quoted strings and
//! injections, and the position metadata carried by every token.

use lexkit_scanner::{CustomKey, StringRuleId, Token, TokenKey, Tokenizer, TokenizerBuilder};

const COND: CustomKey = CustomKey(10);
const WORD: CustomKey = CustomKey(11);
const DQUOTE: CustomKey = CustomKey(14);

/// Helper: the tokenizer shared by the classification tests.
fn basic_tokenizer() -> (Tokenizer, StringRuleId) {
    let mut builder = TokenizerBuilder::new();
    builder.define_tokens(COND, [">=", "<=", "==", ">", "<"]);
    builder.define_tokens(WORD, ["or", "или"]);
    let quote = builder
        .define_string_token(DQUOTE, "\"", "\"")
        .set_escape_symbol(b'\\')
        .id();
    (builder.build().unwrap(), quote)
}

/// Helper: scan and return (key, value) pairs.
fn scan_all(tokenizer: &Tokenizer, source: &str) -> Vec<(TokenKey, String)> {
    tokenizer
        .parse_str(source)
        .tokens()
        .iter()
        .map(|t| (t.key, t.value_str().into_owned()))
        .collect()
}

/// Helper: build an expected token.
fn token(
    id: usize,
    key: TokenKey,
    value: &'static str,
    indent: &'static str,
    offset: usize,
    line: u32,
) -> Token<'static> {
    Token {
        id,
        key,
        value: value.as_bytes(),
        indent: indent.as_bytes(),
        offset,
        line,
        string: None,
    }
}

fn string_token(
    id: usize,
    key: TokenKey,
    value: &'static str,
    indent: &'static str,
    offset: usize,
    rule: StringRuleId,
) -> Token<'static> {
    Token {
        string: Some(rule),
        ..token(id, key, value, indent, offset, 1)
    }
}

#[test]
fn test_empty_and_whitespace_only_input() {
    let (tokenizer, _) = basic_tokenizer();
    for source in ["", "\n", " \n\r", "\t\t  \r\n"] {
        let stream = tokenizer.parse_str(source);
        assert!(!stream.is_valid(), "{:?} should produce no tokens", source);
        assert!(stream.is_empty());
        assert!(stream.current_token().is_none());
    }
}

#[test]
fn test_single_token_classification() {
    let (tokenizer, _) = basic_tokenizer();
    let cases: &[(&str, TokenKey)] = &[
        ("one", TokenKey::Keyword),
        ("два", TokenKey::Keyword),
        ("1", TokenKey::Integer),
        ("2.3", TokenKey::Float),
        ("2.", TokenKey::Float),
        ("2.3e4", TokenKey::Float),
        ("2.3e-4", TokenKey::Float),
        ("2.3E+4", TokenKey::Float),
        ("2e4", TokenKey::Float),
        (">=", TokenKey::Custom(COND)),
        ("<", TokenKey::Custom(COND)),
        ("=", TokenKey::Unknown),
        ("or", TokenKey::Custom(WORD)),
        ("или", TokenKey::Custom(WORD)),
    ];
    for (source, key) in cases {
        let stream = tokenizer.parse_str(source);
        assert!(stream.is_valid(), "{:?}", source);
        let current = stream.current_token().unwrap();
        assert_eq!(current.key, *key, "{:?}", source);
        assert_eq!(current.value, source.as_bytes(), "{:?}", source);
        assert_eq!(stream.len(), 1, "{:?}", source);
    }
}

#[test]
fn test_quoted_strings_carry_rule_identity() {
    let (tokenizer, quote) = basic_tokenizer();
    for source in ["\"one\"", "\"one two\"", "\"два три\"", "\"one\\\" two\"", "\"\""] {
        let stream = tokenizer.parse_str(source);
        let current = stream.current_token().unwrap();
        assert_eq!(current.key, TokenKey::String, "{:?}", source);
        assert_eq!(current.string, Some(quote), "{:?}", source);
        assert_eq!(current.value, source.as_bytes(), "{:?}", source);
        assert_eq!(stream.len(), 1, "{:?}", source);
    }
}

#[test]
fn test_escaped_quote_is_kept_verbatim() {
    let (tokenizer, _) = basic_tokenizer();
    let tokens = scan_all(&tokenizer, r#""one\" two" x"#);
    assert_eq!(
        tokens,
        vec![
            (TokenKey::String, r#""one\" two""#.to_string()),
            (TokenKey::Keyword, "x".to_string()),
        ]
    );
}

#[test]
fn test_longest_match_wins_over_prefix() {
    let (tokenizer, _) = basic_tokenizer();
    let tokens = scan_all(&tokenizer, ">=>< <=");
    assert_eq!(
        tokens,
        vec![
            (TokenKey::Custom(COND), ">=".to_string()),
            (TokenKey::Custom(COND), ">".to_string()),
            (TokenKey::Custom(COND), "<".to_string()),
            (TokenKey::Custom(COND), "<=".to_string()),
        ]
    );
}

#[test]
fn test_literals_take_priority_over_keywords() {
    let (tokenizer, _) = basic_tokenizer();
    // Custom literals are matched before keyword classification.
    let tokens = scan_all(&tokenizer, "order");
    assert_eq!(
        tokens,
        vec![
            (TokenKey::Custom(WORD), "or".to_string()),
            (TokenKey::Keyword, "der".to_string()),
        ]
    );
}

#[test]
fn test_numbers_followed_by_other_tokens() {
    let (tokenizer, _) = basic_tokenizer();
    let tokens = scan_all(&tokenizer, "2else 3e+ 4.5.6");
    assert_eq!(
        tokens,
        vec![
            (TokenKey::Integer, "2".to_string()),
            (TokenKey::Keyword, "else".to_string()),
            (TokenKey::Integer, "3".to_string()),
            (TokenKey::Keyword, "e".to_string()),
            (TokenKey::Unknown, "+".to_string()),
            (TokenKey::Float, "4.5".to_string()),
            (TokenKey::Unknown, ".".to_string()),
            (TokenKey::Integer, "6".to_string()),
        ]
    );
}

#[test]
fn test_keyword_boundaries_with_default_flags() {
    let tokenizer = Tokenizer::builder().build().unwrap();

    assert_eq!(
        tokenizer.parse_str("one1").tokens(),
        &[
            token(0, TokenKey::Keyword, "one", "", 0, 1),
            token(1, TokenKey::Integer, "1", "", 3, 1),
        ]
    );
    assert_eq!(
        tokenizer.parse_str("one_two").tokens(),
        &[
            token(0, TokenKey::Keyword, "one", "", 0, 1),
            token(1, TokenKey::Unknown, "_", "", 3, 1),
            token(2, TokenKey::Keyword, "two", "", 4, 1),
        ]
    );
    assert_eq!(
        tokenizer.parse_str("one_1").tokens(),
        &[
            token(0, TokenKey::Keyword, "one", "", 0, 1),
            token(1, TokenKey::Unknown, "_", "", 3, 1),
            token(2, TokenKey::Integer, "1", "", 4, 1),
        ]
    );
}

#[test]
fn test_keyword_boundaries_with_shape_flags() {
    let mut builder = Tokenizer::builder();
    builder.allow_numbers_in_keyword().allow_keyword_underscore();
    let tokenizer = builder.build().unwrap();

    for source in ["one1", "one_two", "one_1", "_private"] {
        let stream = tokenizer.parse_bytes(source.as_bytes());
        assert_eq!(
            stream.snippet(10, 10),
            &[token(0, TokenKey::Keyword, source, "", 0, 1)],
            "{:?}",
            source
        );
    }
    // Digits still cannot start a keyword.
    assert_eq!(
        scan_all(&tokenizer, "1one"),
        vec![
            (TokenKey::Integer, "1".to_string()),
            (TokenKey::Keyword, "one".to_string()),
        ]
    );
    // Only decimal digits continue a keyword.
    assert_eq!(
        scan_all(&tokenizer, "one²"),
        vec![
            (TokenKey::Keyword, "one".to_string()),
            (TokenKey::Unknown, "²".to_string()),
        ]
    );
}

#[test]
fn test_keywords_use_letter_categories() {
    let tokenizer = Tokenizer::builder().build().unwrap();
    // U+0E33 is an Lo letter outside XID_Start.
    assert_eq!(
        scan_all(&tokenizer, "ทำ"),
        vec![(TokenKey::Keyword, "ทำ".to_string())]
    );
    // Letter numbers are not letters.
    assert_eq!(
        scan_all(&tokenizer, "Ⅻ"),
        vec![(TokenKey::Unknown, "Ⅻ".to_string())]
    );
    assert_eq!(
        scan_all(&tokenizer, "ʰa"),
        vec![(TokenKey::Keyword, "ʰa".to_string())]
    );
}

#[test]
fn test_flags_apply_after_thawing_the_tokenizer() {
    let tokenizer = Tokenizer::builder().build().unwrap();
    assert_eq!(tokenizer.parse_str("one1").len(), 2);

    let mut builder = tokenizer.into_builder();
    builder.allow_numbers_in_keyword();
    let tokenizer = builder.build().unwrap();
    assert_eq!(tokenizer.parse_str("one1").len(), 1);
}

#[test]
fn test_complex_expression() {
    let compare = CustomKey(10);
    let cond = CustomKey(11);
    let quote_key = CustomKey(14);

    let mut builder = Tokenizer::builder();
    builder.allow_keyword_underscore();
    builder.define_tokens(compare, [">=", "<=", "==", ">", "<", "="]);
    builder.define_tokens(cond, ["and", "or"]);
    let quote = builder
        .define_string_token(quote_key, "\"", "\"")
        .set_escape_symbol(b'\\')
        .id();
    let quote2 = builder
        .define_string_token(quote_key, "'", "'")
        .set_escape_symbol(b'\\')
        .id();
    let tokenizer = builder.build().unwrap();

    let source = "modified >\t\"2021-10-06 12:30:44\" and \nbytes_in <= 100 or user_agent='curl'";
    let stream = tokenizer.parse_str(source);

    let expected = vec![
        token(0, TokenKey::Keyword, "modified", "", 0, 1),
        token(1, TokenKey::Custom(compare), ">", " ", 9, 1),
        string_token(2, TokenKey::String, "\"2021-10-06 12:30:44\"", "\t", 11, quote),
        token(3, TokenKey::Custom(cond), "and", " ", 33, 1),
        token(4, TokenKey::Keyword, "bytes_in", " \n", 38, 2),
        token(5, TokenKey::Custom(compare), "<=", " ", 47, 2),
        token(6, TokenKey::Integer, "100", " ", 50, 2),
        token(7, TokenKey::Custom(cond), "or", " ", 54, 2),
        token(8, TokenKey::Keyword, "user_agent", " ", 57, 2),
        token(9, TokenKey::Custom(compare), "=", "", 67, 2),
        Token {
            line: 2,
            ..string_token(10, TokenKey::String, "'curl'", "", 68, quote2)
        },
    ];
    assert_eq!(stream.snippet(10, 100), expected.as_slice(), "parsed as\n{}", stream);
    assert!(stream.diagnostics().is_empty());
    assert_ne!(quote, quote2);
}

#[test]
fn test_injection_splits_string_into_fragments() {
    let open = CustomKey(10);
    let close = CustomKey(11);
    let quote_key = CustomKey(14);

    let mut builder = Tokenizer::builder();
    builder.define_tokens(open, ["{{"]);
    builder.define_tokens(close, ["}}"]);
    let quote = builder
        .define_string_token(quote_key, "\"", "\"")
        .set_escape_symbol(b'\\')
        .add_injection(open, close)
        .id();
    let tokenizer = builder.build().unwrap();

    let stream = tokenizer.parse_str(r#""one {{ two }} three""#);
    let expected = vec![
        string_token(0, TokenKey::StringFragment, "\"one ", "", 0, quote),
        token(1, TokenKey::Custom(open), "{{", "", 5, 1),
        token(2, TokenKey::Keyword, "two", " ", 8, 1),
        token(3, TokenKey::Custom(close), "}}", " ", 12, 1),
        string_token(4, TokenKey::StringFragment, " three\"", "", 14, quote),
    ];
    assert_eq!(stream.snippet(10, 10), expected.as_slice(), "parsed as\n{}", stream);
}

#[test]
fn test_injection_rules() {
    let open = CustomKey(10);
    let close = CustomKey(11);
    let cmp = CustomKey(12);

    let mut builder = Tokenizer::builder();
    builder.define_tokens(open, ["{{"]);
    builder.define_tokens(close, ["}}"]);
    builder.define_tokens(cmp, [">"]);
    let quote = builder
        .define_string_token(CustomKey(14), "\"", "\"")
        .add_injection(open, close)
        .id();
    let tokenizer = builder.build().unwrap();

    // No injection: a single String token, never a fragment.
    let stream = tokenizer.parse_str(r#""plain {text}""#);
    assert_eq!(stream.len(), 1);
    assert_eq!(stream.tokens()[0].key, TokenKey::String);

    // Two injections, the second adjacent to the first: no empty fragment.
    let keys: Vec<TokenKey> = tokenizer
        .parse_str(r#""a{{x > 1}}{{y}}b" z"#)
        .tokens()
        .iter()
        .map(|t| t.key)
        .collect();
    assert_eq!(
        keys,
        vec![
            TokenKey::StringFragment,
            TokenKey::Custom(open),
            TokenKey::Keyword,
            TokenKey::Custom(cmp),
            TokenKey::Integer,
            TokenKey::Custom(close),
            TokenKey::Custom(open),
            TokenKey::Keyword,
            TokenKey::Custom(close),
            TokenKey::StringFragment,
            TokenKey::Keyword,
        ]
    );

    // A string nested inside an injection is scanned by its own rule.
    let stream = tokenizer.parse_str(r#""x{{ "in" }}y""#);
    let tokens = stream.tokens();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[2].key, TokenKey::String);
    assert_eq!(tokens[2].value, br#""in""#);
    assert_eq!(tokens[2].string, Some(quote));
    assert_eq!(tokens[4].value, br#"y""#);
}

#[test]
fn test_lines_count_newlines_inside_strings() {
    let (tokenizer, quote) = basic_tokenizer();
    let stream = tokenizer.parse_str("a \"b\nc\"\n d");
    assert_eq!(
        stream.tokens(),
        &[
            token(0, TokenKey::Keyword, "a", "", 0, 1),
            Token {
                string: Some(quote),
                ..token(1, TokenKey::String, "\"b\nc\"", " ", 2, 1)
            },
            token(2, TokenKey::Keyword, "d", "\n ", 9, 3),
        ]
    );
}

#[test]
fn test_unterminated_string_runs_to_end_of_input() {
    let (tokenizer, quote) = basic_tokenizer();
    let stream = tokenizer.parse_str("x = \"open\nstring");
    let last = stream.tokens().last().unwrap();
    assert_eq!(last.key, TokenKey::String);
    assert_eq!(last.value, b"\"open\nstring");
    assert_eq!(last.string, Some(quote));

    let diagnostics = stream.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1002);
    assert!(diagnostics[0].is_error());
    assert_eq!(diagnostics[0].span.map(|s| s.start), Some(4));
}

#[test]
fn test_unterminated_injection_reports_both_ends() {
    let open = CustomKey(10);
    let close = CustomKey(11);
    let mut builder = Tokenizer::builder();
    builder.define_tokens(open, ["${"]).define_tokens(close, ["}"]);
    builder
        .define_string_token(CustomKey(14), "`", "`")
        .add_injection(open, close);
    let tokenizer = builder.build().unwrap();

    let stream = tokenizer.parse_str("`a ${ b");
    let keys: Vec<TokenKey> = stream.tokens().iter().map(|t| t.key).collect();
    assert_eq!(
        keys,
        vec![TokenKey::StringFragment, TokenKey::Custom(open), TokenKey::Keyword]
    );
    let codes: Vec<u32> = stream.diagnostics().diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![1003, 1002]);
    assert!(stream.diagnostics().diagnostics()[0].message_text.contains("'}'"));
}

#[test]
fn test_unknown_spans_one_code_point() {
    let tokenizer = Tokenizer::builder().build().unwrap();
    let stream = tokenizer.parse_bytes("§ €".as_bytes());
    let values: Vec<&[u8]> = stream.tokens().iter().map(|t| t.value).collect();
    assert_eq!(values, vec!["§".as_bytes(), "€".as_bytes()]);
    assert!(stream.tokens().iter().all(|t| t.key == TokenKey::Unknown));
    assert_eq!(stream.tokens()[1].offset, 3);

    // Invalid UTF-8 is consumed one byte at a time.
    let stream = tokenizer.parse_bytes(&[0xFF, 0xFE, b'a']);
    assert_eq!(stream.len(), 3);
    assert_eq!(stream.tokens()[0].value, &[0xFF]);
    assert_eq!(stream.tokens()[1].value, &[0xFE]);
    assert_eq!(stream.tokens()[2].key, TokenKey::Keyword);
}

#[test]
fn test_stop_on_unknown_token() {
    let mut builder = Tokenizer::builder();
    builder.define_tokens(COND, ["=="]).stop_on_unknown_token();
    let tokenizer = builder.build().unwrap();

    let stream = tokenizer.parse_str("a == b = c");
    let values: Vec<String> = stream
        .tokens()
        .iter()
        .map(|t| t.value_str().into_owned())
        .collect();
    assert_eq!(values, vec!["a", "==", "b"]);
    let diagnostics = stream.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.diagnostics()[0].code, 1004);
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_tokenizer_is_shareable_across_threads() {
    let (tokenizer, _) = basic_tokenizer();
    let tokenizer = std::sync::Arc::new(tokenizer);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tokenizer = tokenizer.clone();
            std::thread::spawn(move || {
                let source = format!("x >= {}", i);
                tokenizer.parse_str(&source).len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}
