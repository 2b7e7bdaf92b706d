// tests/parser_tests.rs

use ls_lang::ast::{Expr, QueryKind, Statement};
use ls_lang::lexer::Lexer;
use ls_lang::parser::{ParseError, Parser};

fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(Lexer::new(source)).parse()
}

fn parse_one(source: &str) -> Statement {
    let mut program = parse(source).expect("program should parse");
    assert_eq!(program.len(), 1, "expected exactly one statement");
    program.remove(0)
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn test_def_is_constant_intent() {
    let stmt = parse_one("def titre = \"Bonjour\"");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: true,
            name: "titre".to_string(),
            value: Expr::String("Bonjour".to_string()),
        }
    );
}

#[test]
fn test_var_is_not_constant() {
    let stmt = parse_one("var n = 3");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: false,
            name: "n".to_string(),
            value: Expr::Integer(3),
        }
    );
}

#[test]
fn test_assign_from_variable() {
    let stmt = parse_one("var copie = original");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: false,
            name: "copie".to_string(),
            value: Expr::Variable("original".to_string()),
        }
    );
}

#[test]
fn test_assign_missing_equals() {
    let err = parse("def x 1").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

// ============================================================================
// Output statements
// ============================================================================

#[test]
fn test_msg() {
    let stmt = parse_one("msg(\"bonjour\")");
    assert_eq!(stmt, Statement::Print(Expr::String("bonjour".to_string())));
}

#[test]
fn test_popup() {
    let stmt = parse_one("popup(42)");
    assert_eq!(stmt, Statement::Notify(Expr::Integer(42)));
}

#[test]
fn test_msg_unterminated_fails_cleanly() {
    let err = parse("msg(").unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue(_)));
}

#[test]
fn test_msg_missing_close_paren() {
    let err = parse("msg(1").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: "')'".to_string(),
            found: "end of input".to_string(),
        }
    );
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_si_with_body() {
    let stmt = parse_one("si(n) { msg(n) }");
    assert_eq!(
        stmt,
        Statement::If {
            condition: Expr::Variable("n".to_string()),
            body: vec![Statement::Print(Expr::Variable("n".to_string()))],
        }
    );
}

#[test]
fn test_repeter_count_is_unparenthesized() {
    let stmt = parse_one("repeter 3 { msg(1) }");
    assert_eq!(
        stmt,
        Statement::Repeat {
            count: Expr::Integer(3),
            body: vec![Statement::Print(Expr::Integer(1))],
        }
    );
}

#[test]
fn test_nested_blocks() {
    let stmt = parse_one("si(1) { repeter 2 { msg(1) } }");
    let Statement::If { body, .. } = stmt else {
        panic!("expected an if statement");
    };
    assert!(matches!(body[0], Statement::Repeat { .. }));
}

#[test]
fn test_unterminated_block() {
    let err = parse("si(1) { msg(1)").unwrap_err();
    assert_eq!(err, ParseError::UnterminatedBlock);
}

#[test]
fn test_empty_block() {
    let stmt = parse_one("si(1) { }");
    assert_eq!(
        stmt,
        Statement::If {
            condition: Expr::Integer(1),
            body: vec![],
        }
    );
}

// ============================================================================
// Document queries
// ============================================================================

#[test]
fn test_query_by_id_stays_unresolved() {
    // Parsing is pure: the query node carries the lookup, it does not run it.
    let stmt = parse_one("def titre = doc.id(\"titre\")");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: true,
            name: "titre".to_string(),
            value: Expr::Query {
                kind: QueryKind::ById,
                key: "titre".to_string(),
            },
        }
    );
}

#[test]
fn test_query_by_tag() {
    let stmt = parse_one("var divs = doc.type(\"div\")");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: false,
            name: "divs".to_string(),
            value: Expr::Query {
                kind: QueryKind::ByTag,
                key: "div".to_string(),
            },
        }
    );
}

#[test]
fn test_query_accepts_number_key() {
    let stmt = parse_one("def x = doc.id(5)");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: true,
            name: "x".to_string(),
            value: Expr::Query {
                kind: QueryKind::ById,
                key: "5".to_string(),
            },
        }
    );
}

#[test]
fn test_unknown_query_method() {
    let err = parse("def x = doc.query(\"a\")").unwrap_err();
    assert_eq!(err, ParseError::UnknownQuery("query".to_string()));
}

#[test]
fn test_doc_without_dot_is_a_variable() {
    let stmt = parse_one("var x = doc");
    assert_eq!(
        stmt,
        Statement::Assign {
            constant: false,
            name: "x".to_string(),
            value: Expr::Variable("doc".to_string()),
        }
    );
}

// ============================================================================
// Member statements
// ============================================================================

#[test]
fn test_member_assign() {
    let stmt = parse_one("titre.texte = \"Bonjour\"");
    assert_eq!(
        stmt,
        Statement::MemberAssign {
            target: Expr::Variable("titre".to_string()),
            member: "texte".to_string(),
            value: Expr::String("Bonjour".to_string()),
        }
    );
}

#[test]
fn test_member_call_no_args() {
    let stmt = parse_one("titre.suppr()");
    assert_eq!(
        stmt,
        Statement::MemberCall {
            target: Expr::Variable("titre".to_string()),
            member: "suppr".to_string(),
            args: vec![],
        }
    );
}

#[test]
fn test_member_call_with_args() {
    let stmt = parse_one("x.machin(1, \"a\", y)");
    assert_eq!(
        stmt,
        Statement::MemberCall {
            target: Expr::Variable("x".to_string()),
            member: "machin".to_string(),
            args: vec![
                Expr::Integer(1),
                Expr::String("a".to_string()),
                Expr::Variable("y".to_string()),
            ],
        }
    );
}

#[test]
fn test_query_target_member_assign() {
    let stmt = parse_one("doc.type(\"div\").texte = \"x\"");
    assert_eq!(
        stmt,
        Statement::MemberAssign {
            target: Expr::Query {
                kind: QueryKind::ByTag,
                key: "div".to_string(),
            },
            member: "texte".to_string(),
            value: Expr::String("x".to_string()),
        }
    );
}

#[test]
fn test_query_target_member_call() {
    let stmt = parse_one("doc.id(\"note\").suppr()");
    assert_eq!(
        stmt,
        Statement::MemberCall {
            target: Expr::Query {
                kind: QueryKind::ById,
                key: "note".to_string(),
            },
            member: "suppr".to_string(),
            args: vec![],
        }
    );
}

#[test]
fn test_member_with_no_continuation_fails() {
    let err = parse("x.texte").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: "'=' or '('".to_string(),
            found: "end of input".to_string(),
        }
    );
}

// ============================================================================
// Native calls and unknown statements
// ============================================================================

#[test]
fn test_bare_call_parses_as_native_call() {
    // Registration is a runtime question; the grammar accepts any bare call.
    let stmt = parse_one("journal(\"fin\")");
    assert_eq!(
        stmt,
        Statement::NativeCall {
            name: "journal".to_string(),
            args: vec![Expr::String("fin".to_string())],
        }
    );
}

#[test]
fn test_unknown_statement_names_the_token() {
    let err = parse("bidule").unwrap_err();
    assert_eq!(err, ParseError::UnknownStatement("bidule".to_string()));
}

#[test]
fn test_statement_starting_with_symbol_fails() {
    let err = parse("= 3").unwrap_err();
    assert_eq!(err, ParseError::UnknownStatement("=".to_string()));
}

#[test]
fn test_invalid_value() {
    let err = parse("def x = {").unwrap_err();
    assert_eq!(err, ParseError::InvalidValue("{".to_string()));
}

// ============================================================================
// Programs
// ============================================================================

#[test]
fn test_multi_statement_program_preserves_order() {
    let program = parse("def a = 1 var b = 2 msg(a)").unwrap();
    assert_eq!(program.len(), 3);
    assert!(matches!(program[0], Statement::Assign { constant: true, .. }));
    assert!(matches!(
        program[1],
        Statement::Assign {
            constant: false,
            ..
        }
    ));
    assert!(matches!(program[2], Statement::Print(_)));
}

#[test]
fn test_empty_program() {
    assert_eq!(parse("").unwrap(), vec![]);
    assert_eq!(parse("   \n\t ").unwrap(), vec![]);
}
