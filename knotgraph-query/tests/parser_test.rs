use knotgraph_query::ast::{Expression, MethodCall};
use knotgraph_query::{Error, parse};
use proptest::prelude::*;

fn syntax(text: &str) -> (String, String, usize, usize) {
    match parse(text) {
        Err(Error::Syntax {
            expected,
            found,
            line,
            column,
        }) => (expected, found, line, column),
        other => panic!("expected syntax error for {text:?}, got {other:?}"),
    }
}

#[test]
fn test_parse_full_chain() {
    let query = parse("Find('User').Has('has_skill','Go').Where('n.age','>',31).Limit(5)").unwrap();
    let names: Vec<&str> = query.calls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Find", "Has", "Where", "Limit"]);

    assert_eq!(
        query.calls[2].arguments,
        vec![
            Expression::String("n.age".into()),
            Expression::String(">".into()),
            Expression::Integer(31),
        ]
    );
    assert_eq!(query.calls[3].arguments, vec![Expression::Integer(5)]);
}

#[test]
fn test_whitespace_is_insignificant() {
    let compact = parse("Find('User').Limit(3)").unwrap();
    let spaced = parse("  Find ( 'User' )\n\t. Limit ( 3 )  \r\n").unwrap();

    let strip = |calls: Vec<MethodCall>| -> Vec<(String, Vec<Expression>)> {
        calls.into_iter().map(|c| (c.name, c.arguments)).collect()
    };
    assert_eq!(strip(compact.calls), strip(spaced.calls));
}

#[test]
fn test_call_positions() {
    let query = parse("Find('A')\n  .Limit(1)").unwrap();
    assert_eq!((query.calls[0].line, query.calls[0].column), (1, 1));
    assert_eq!((query.calls[1].line, query.calls[1].column), (2, 4));
}

#[test]
fn test_empty_argument_list() {
    let query = parse("Find()").unwrap();
    assert!(query.calls[0].arguments.is_empty());
}

#[test]
fn test_empty_input() {
    let (expected, found, line, column) = syntax("");
    assert_eq!(expected, "method name");
    assert_eq!(found, "end of input");
    assert_eq!((line, column), (1, 1));
}

#[test]
fn test_leading_dot() {
    let (expected, found, _, column) = syntax(".Find('a')");
    assert_eq!(expected, "method name");
    assert_eq!(found, "'.'");
    assert_eq!(column, 1);
}

#[test]
fn test_trailing_dot() {
    let (expected, found, _, column) = syntax("Find('User').");
    assert_eq!(expected, "method name");
    assert_eq!(found, "end of input");
    assert_eq!(column, 14);
}

#[test]
fn test_missing_parens() {
    let (expected, found, _, _) = syntax("Find 'User')");
    assert_eq!(expected, "'('");
    assert_eq!(found, "string 'User'");

    let (expected, found, _, _) = syntax("Find('User'");
    assert_eq!(expected, "',' or ')'");
    assert_eq!(found, "end of input");
}

#[test]
fn test_bad_separator() {
    let (expected, found, _, column) = syntax("Find('a' 'b')");
    assert_eq!(expected, "',' or ')'");
    assert_eq!(found, "string 'b'");
    assert_eq!(column, 10);
}

#[test]
fn test_bare_identifier_argument() {
    let (expected, found, _, _) = syntax("Find(User)");
    assert_eq!(expected, "string or integer literal");
    assert_eq!(found, "identifier 'User'");
}

#[test]
fn test_trailing_comma() {
    let (expected, found, _, _) = syntax("Find('a',)");
    assert_eq!(expected, "string or integer literal");
    assert_eq!(found, "')'");
}

#[test]
fn test_illegal_character() {
    let (_, found, _, column) = syntax("Find('a')#");
    assert_eq!(found, "illegal character '#'");
    assert_eq!(column, 10);

    let (expected, _, _, _) = syntax("Limit(-1)");
    assert_eq!(expected, "string or integer literal");
}

#[test]
fn test_integer_overflow() {
    let (expected, found, _, _) = syntax("Limit(99999999999999999999)");
    assert_eq!(expected, "integer within i64 range");
    assert_eq!(found, "integer 99999999999999999999");
    assert!(parse("Limit(9223372036854775807)").is_ok());
}

#[test]
fn test_missing_dot_between_calls() {
    let (expected, found, _, _) = syntax("Find('a') Limit(1)");
    assert_eq!(expected, "'.' or end of input");
    assert_eq!(found, "identifier 'Limit'");
}

#[test]
fn test_syntax_error_display() {
    let err = parse("Find(").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 1:6: expected string or integer literal, found end of input"
    );
}

#[test]
fn test_deeply_nested_parens() {
    let (expected, found, line, column) = syntax(&format!("Find{}", "(".repeat(200_000)));
    assert_eq!(expected, "string or integer literal");
    assert_eq!(found, "'('");
    assert_eq!((line, column), (1, 6));
}

#[test]
fn test_long_runs_of_closers_and_dots() {
    let (expected, found, _, column) = syntax(&format!("Find('a'){}", ")".repeat(200_000)));
    assert_eq!(expected, "'.' or end of input");
    assert_eq!(found, "')'");
    assert_eq!(column, 10);

    let (expected, found, _, column) = syntax(&".".repeat(200_000));
    assert_eq!(expected, "method name");
    assert_eq!(found, "'.'");
    assert_eq!(column, 1);

    let (expected, found, _, column) = syntax(&format!("Find('a'){}", ".".repeat(200_000)));
    assert_eq!(expected, "method name");
    assert_eq!(found, "'.'");
    assert_eq!(column, 11);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_parse_never_panics(input in any::<String>()) {
        let _ = parse(&input);
    }

    #[test]
    fn prop_parse_never_panics_on_query_alphabet(input in "[A-Za-z_().,' 0-9\n]{0,64}") {
        if let Ok(query) = parse(&input) {
            prop_assert!(!query.calls.is_empty());
        }
    }

    #[test]
    fn prop_well_formed_chains_parse(
        calls in prop::collection::vec(("[A-Z][a-z]{0,8}", "[a-z ]{0,8}", 0i64..1_000_000), 1..6)
    ) {
        let text = calls
            .iter()
            .map(|(name, s, i)| format!("{name}('{s}', {i})"))
            .collect::<Vec<_>>()
            .join(".");
        let query = parse(&text).unwrap();
        prop_assert_eq!(query.calls.len(), calls.len());
        for (call, (name, s, i)) in query.calls.iter().zip(&calls) {
            prop_assert_eq!(&call.name, name);
            prop_assert_eq!(
                &call.arguments,
                &vec![Expression::String(s.clone()), Expression::Integer(*i)]
            );
        }
    }
}
