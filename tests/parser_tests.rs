// Integration tests for the Cuppa3 front end

use cuppa3::parser::{parse, Node, ParseError, Parser, SliceSpec, SourceLocation, Token, TokenKind};
use std::fs;
use std::path::Path;

fn token(kind: TokenKind, column: usize) -> Token {
    Token::new(kind, SourceLocation::new(1, column))
}

fn first_statement(source: &str) -> Node {
    let program = parse(source).expect("Parsing failed");
    program
        .seq_items()
        .next()
        .cloned()
        .expect("Program has no statements")
}

#[test]
fn test_precedence_scenario() {
    let stmt = first_statement("put 1 + 2 * 3");
    assert_eq!(
        stmt.to_string(),
        "('put', ('+', ('integer', 1), ('*', ('integer', 2), ('integer', 3))))"
    );
}

#[test]
fn test_left_associativity_scenario() {
    let stmt = first_statement("put 1 - 2 - 3");
    assert_eq!(
        stmt.to_string(),
        "('put', ('-', ('-', ('integer', 1), ('integer', 2)), ('integer', 3)))"
    );
}

#[test]
fn test_declare_without_init_scenario() {
    assert_eq!(
        first_statement("declare x;").to_string(),
        "('declare', 'x', ('nil',))"
    );
}

#[test]
fn test_fundecl_scenario() {
    let stmt = first_statement("declare f(a, b) { return a + b; }");

    match &stmt {
        Node::FunDecl {
            name,
            formal_args,
            body,
        } => {
            assert_eq!(name, "f");
            let args: Vec<&Node> = formal_args.seq_items().collect();
            assert_eq!(
                args,
                vec![&Node::Id("a".to_string()), &Node::Id("b".to_string())]
            );

            let Node::Block(statements) = body.as_ref() else {
                panic!("Expected block body, got {}", body);
            };
            let statements: Vec<&Node> = statements.seq_items().collect();
            assert_eq!(statements.len(), 1);
            assert_eq!(
                statements[0].to_string(),
                "('return', ('+', ('id', 'a'), ('id', 'b')))"
            );
        }
        other => panic!("Expected function declaration, got {}", other),
    }
}

#[test]
fn test_index_scenarios() {
    assert_eq!(
        first_statement("put x[1:3]"),
        Node::Put(Box::new(Node::Index {
            name: "x".to_string(),
            slice: SliceSpec::Range(1, 3),
        }))
    );
    assert_eq!(
        first_statement("put x[1]").to_string(),
        "('put', ('index', 'x', 1))"
    );
}

#[test]
fn test_dangling_else_scenario() {
    let stmt = first_statement("if (c1) if (c2) put 1 else put 2");

    let Node::If {
        then_branch,
        else_branch,
        ..
    } = &stmt
    else {
        panic!("Expected if statement");
    };
    assert!(else_branch.is_nil(), "outer if must not own the else");
    assert!(matches!(
        then_branch.as_ref(),
        Node::If { else_branch, .. } if !else_branch.is_nil()
    ));
}

#[test]
fn test_unmatched_paren_is_a_syntax_error() {
    let err = parse("put (1 + 2))").unwrap_err();
    match err {
        ParseError::Syntax {
            ref token,
            location,
            ..
        } => {
            assert_eq!(token, ")");
            assert_eq!(location, SourceLocation::new(1, 12));
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Syntax error at ')'"));
}

#[test]
fn test_token_stream_input() {
    // x = f(1, y)
    let tokens = vec![
        token(TokenKind::Ident("x".to_string()), 1),
        token(TokenKind::Eq, 3),
        token(TokenKind::Ident("f".to_string()), 5),
        token(TokenKind::LParen, 6),
        token(TokenKind::Integer(1), 7),
        token(TokenKind::Comma, 8),
        token(TokenKind::Ident("y".to_string()), 10),
        token(TokenKind::RParen, 11),
    ];

    let program = Parser::from_tokens(tokens).parse_program().expect("Parsing failed");
    assert_eq!(
        program.to_string(),
        "('seq', ('assign', 'x', ('callexp', 'f', ('seq', ('integer', 1), \
         ('seq', ('id', 'y'), ('nil',))))), ('nil',))"
    );
}

#[test]
fn test_token_stream_error_reports_token_value() {
    let tokens = vec![
        token(TokenKind::Put, 1),
        token(TokenKind::RBracket, 5),
    ];

    let err = Parser::from_tokens(tokens).parse_program().unwrap_err();
    assert_eq!(err.token(), Some("]"));
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "declare f(n) { if (n <= 1) return 1 else return n * f(n - 1) } put f(5)";
    let first = parse(source).unwrap();
    let second = parse(source).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_statement_order_is_preserved() {
    let program = parse("get a get b get c").unwrap();
    let names: Vec<String> = program
        .seq_items()
        .map(|stmt| match stmt {
            Node::Get(name) => name.clone(),
            other => panic!("Expected get, got {}", other),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_demo_program() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/fact.cuppa");
    let source = fs::read_to_string(path).expect("Failed to read demo program");

    let program = parse(&source).expect("Parsing failed");
    let tags: Vec<&str> = program.seq_items().map(Node::tag).collect();
    assert_eq!(
        tags,
        vec!["fundecl", "declare", "get", "while", "declare", "assign", "put"]
    );

    let rendered = program.to_string();
    assert!(rendered.contains("('*', ('id', 'n'), ('callexp', 'fact', ('seq', ('-', ('id', 'n'), ('integer', 1)), ('nil',))))"));
    assert!(rendered.contains("('assign', 'firsts', ('list', ('seq', ('integer', 1), ('seq', ('integer', 2), ('seq', ('integer', 6), ('nil',)))))))"));
    assert!(rendered.contains("('put', ('index', 'firsts', (0, 2)))"));
}

#[test]
fn test_json_output_mirrors_tuples() {
    let program = parse("declare f() return not x").unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            "seq",
            ["fundecl", "f", ["nil"], ["return", ["not", ["id", "x"]]]],
            ["nil"]
        ])
    );
}

#[test]
fn test_long_statement_list() {
    let program = parse(&"get x\n".repeat(100_000)).expect("Parsing failed");
    assert_eq!(program.seq_items().count(), 100_000);

    let rendered = program.to_string();
    assert!(rendered.ends_with("('get', 'x'), ('nil',)))"));

    let mut json = Vec::new();
    program
        .write_json(&mut json, &mut serde_json::ser::CompactFormatter)
        .unwrap();
    assert_eq!(json.len(), r#"["seq",["get","x"],]"#.len() * 100_000 + r#"["nil"]"#.len());

    let rows = cuppa3::ui::tree::flatten(&program, &Default::default());
    assert_eq!(rows.len(), 200_001);

    assert_eq!(program, parse(&"get x\n".repeat(100_000)).unwrap());
    drop(program);
}
