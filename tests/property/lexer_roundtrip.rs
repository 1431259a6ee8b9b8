use proptest::prelude::*;

use robolang::lexer::lex;

fn lexeme() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,8}",
        (0i64..100_000).prop_map(|n| n.to_string()),
        (0u32..10_000, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        "[a-z 0-9]{0,8}".prop_map(|body| format!("\"{body}\"")),
        "[a-z 0-9]{0,8}".prop_map(|body| format!("'{body}'")),
        prop_oneof![
            Just("+"), Just("-"), Just("*"), Just("/"), Just("%"),
            Just("<<"), Just(">>"), Just("<="), Just(">="), Just("=="),
            Just("!="), Just("&&"), Just("||"), Just("&"), Just("|"),
            Just("^"), Just("~"), Just("!"), Just("="), Just("+="),
            Just("-="), Just("("), Just(")"), Just("{"), Just("}"),
            Just(","), Just(":"), Just("."),
        ]
        .prop_map(str::to_string),
    ]
}

proptest! {
    // Tokens tile the input: spans are contiguous, start at zero, and
    // end at the source length, with trivia tokens filling the gaps.
    #[test]
    fn token_spans_tile_the_source(lexemes in prop::collection::vec(lexeme(), 0..40)) {
        let source = lexemes.join(" ");
        let tokens = lex(&source).unwrap();

        let mut pos = 0;
        for tok in &tokens {
            prop_assert_eq!(tok.span.start, pos);
            prop_assert!(tok.span.end > tok.span.start);
            pos = tok.span.end;
        }
        prop_assert_eq!(pos, source.len());

        let rebuilt: String = tokens
            .iter()
            .map(|tok| &source[tok.span.start..tok.span.end])
            .collect();
        prop_assert_eq!(rebuilt, source);
    }

    // Extra spacing between lexemes never changes what the lexer sees.
    #[test]
    fn spacing_is_immaterial(lexemes in prop::collection::vec(lexeme(), 0..40)) {
        let tight = lexemes.join(" ");
        let loose = lexemes.join(" \t  ");

        let kinds = |src: &str| -> Result<Vec<_>, _> {
            lex(src).map(|toks| {
                toks.into_iter()
                    .map(|t| t.node)
                    .filter(|t| !t.is_trivia())
                    .collect::<Vec<_>>()
            })
        };
        prop_assert_eq!(kinds(&tight).unwrap(), kinds(&loose).unwrap());
    }
}
