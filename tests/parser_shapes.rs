//! Tree shapes produced for well-formed programs

use calcparse::calc::parser::{
    parse_expression, parse_source, parse_str, serialize_expr, BinOp, Condition, Expr, RelOp,
    Statement,
};
use rstest::rstest;

#[rstest]
#[case::empty("", "(program])")]
#[case::whitespace_only(" \n\t ", "(program])")]
#[case::read("read a", r#"(program(read "a")])"#)]
#[case::write_sum("write a + 1", r#"(program(write (+ (id "a") (id "1")))])"#)]
#[case::assign_group("x := (a)", r#"(program(:= "x" ((id "a")))])"#)]
#[case::decimal_literal("x := .5 * 2.", r#"(program(:= "x" (* (id ".5") (id "2.")))])"#)]
#[case::empty_if("if a <= b end", r#"(program(if (<= (id "a") (id "b")))[])])"#)]
#[case::while_loop(
    "while n > 0 n := n - 1 end",
    r#"(program(while (> (id "n") (id "0")))[(:= "n" (- (id "n") (id "1")))])])"#
)]
#[case::nested_blocks(
    "while a <> b if a >= b a := a - b end end",
    r#"(program(while (<> (id "a") (id "b")))[(if (>= (id "a") (id "b")))[(:= "a" (- (id "a") (id "b")))])])])"#
)]
#[case::double_equals("if a == b write a end", r#"(program(if (= (id "a") (id "b")))[(write (id "a"))])])"#)]
#[case::statement_sequence(
    "read a read b write a / b",
    r#"(program(read "a")(read "b")(write (/ (id "a") (id "b")))])"#
)]
fn well_formed_programs(#[case] source: &str, #[case] expected: &str) {
    let (outcome, log) = parse_source(source);
    assert_eq!(log.error_lines(), 0, "{}", log.render());
    assert!(outcome.is_well_formed());
    assert_eq!(outcome.to_sexpr(), expected);
}

#[rstest]
#[case("a - b - c", r#"(- (- (id "a") (id "b")) (id "c"))"#)]
#[case("a / b / c", r#"(/ (/ (id "a") (id "b")) (id "c"))"#)]
#[case("a + b * c", r#"(+ (id "a") (* (id "b") (id "c")))"#)]
#[case("a * b + c", r#"(+ (* (id "a") (id "b")) (id "c"))"#)]
#[case("a - (b - c)", r#"(- (id "a") ((- (id "b") (id "c"))))"#)]
#[case("1 + 2 * 3 - 4", r#"(- (+ (id "1") (* (id "2") (id "3"))) (id "4"))"#)]
fn expression_shapes(#[case] source: &str, #[case] expected: &str) {
    let (expr, errors) = parse_expression(source);
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(serialize_expr(&expr), expected);
}

#[test]
fn subtraction_chain_is_left_nested() {
    let (expr, _) = parse_expression("a - b - c");
    assert_eq!(
        expr,
        Expr::binary(
            BinOp::Sub,
            Expr::binary(BinOp::Sub, Expr::id("a"), Expr::id("b")),
            Expr::id("c")
        )
    );
}

#[test]
fn empty_input_has_no_statements() {
    let outcome = parse_str("");
    assert!(outcome.program.is_empty());
    assert!(outcome.is_well_formed());
    assert_eq!(outcome.tokens_consumed, 1);
}

#[test]
fn nested_control_statement() {
    let outcome = parse_str("if a < b write a end");
    assert!(outcome.is_well_formed());
    assert_eq!(
        outcome.program.statements,
        vec![Statement::If {
            condition: Condition::new(RelOp::Lt, Expr::id("a"), Expr::id("b")),
            body: vec![Statement::write(Expr::id("a"))],
        }]
    );
    assert_eq!(
        outcome.to_sexpr(),
        r#"(program(if (< (id "a") (id "b")))[(write (id "a"))])])"#
    );
}

#[test]
fn sample_programs_are_well_formed() {
    for name in ["gcd.calc", "countdown.calc", "average.calc"] {
        let path = format!("{}/samples/{}", env!("CARGO_MANIFEST_DIR"), name);
        let source = std::fs::read_to_string(&path).expect("sample to exist");
        let outcome = parse_str(&source);
        assert!(outcome.is_well_formed(), "{}: {:?}", name, outcome.errors);
        assert!(!outcome.program.is_empty());
    }
}
