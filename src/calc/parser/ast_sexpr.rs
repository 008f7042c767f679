//! Bracketed tree serialization
//!
//! Renders a parse tree in the parenthesized form printed on the tree
//! channel:
//!
//! ```text
//! (program(read "n")(while (> (id "n") (id "0")))[(write (id "n"))(:= "n" (- (id "n") (id "1")))])])
//! ```
//!
//! - program: `(program` + statements + `])`
//! - statements are concatenated with no separator
//! - `(:= "name" <expr>)`, `(read "name")`, `(write <expr>)`
//! - `(if <cond>)[<stmts>])` and `(while <cond>)[<stmts>])`
//! - condition and binary operators: `(<op> <lhs> <rhs>)`
//! - identifiers and literals: `(id "text")`; groups: `(<expr>)`
//!
//! Closing parentheses for an operator chain appear exactly once per
//! operator application, so a lone operand is never wrapped.

use crate::calc::parser::ast::{Condition, Expr, Program, Statement};

/// Serialize a program to its bracketed form
pub fn serialize_program(program: &Program) -> String {
    let mut out = String::from("(program");
    write_statements(&program.statements, &mut out);
    out.push_str("])");
    out
}

/// Serialize a single statement
pub fn serialize_statement(statement: &Statement) -> String {
    let mut out = String::new();
    write_statement(statement, &mut out);
    out
}

/// Serialize a single expression
pub fn serialize_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, &mut out);
    out
}

fn write_statements(statements: &[Statement], out: &mut String) {
    for statement in statements {
        write_statement(statement, out);
    }
}

fn write_statement(statement: &Statement, out: &mut String) {
    match statement {
        Statement::Assign { target, value } => {
            out.push_str("(:= ");
            write_quoted(target, out);
            out.push(' ');
            write_expr(value, out);
            out.push(')');
        }
        Statement::Read { target } => {
            out.push_str("(read ");
            write_quoted(target, out);
            out.push(')');
        }
        Statement::Write { value } => {
            out.push_str("(write ");
            write_expr(value, out);
            out.push(')');
        }
        Statement::If { condition, body } => write_block("if", condition, body, out),
        Statement::While { condition, body } => write_block("while", condition, body, out),
    }
}

fn write_block(keyword: &str, condition: &Condition, body: &[Statement], out: &mut String) {
    out.push('(');
    out.push_str(keyword);
    out.push(' ');
    write_condition(condition, out);
    out.push_str(")[");
    write_statements(body, out);
    out.push_str("])");
}

fn write_condition(condition: &Condition, out: &mut String) {
    out.push('(');
    if let Some(op) = condition.op {
        out.push_str(op.symbol());
    }
    out.push(' ');
    write_expr(&condition.lhs, out);
    out.push(' ');
    write_expr(&condition.rhs, out);
    out.push(')');
}

fn write_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Id { name } => write_leaf(name, out),
        Expr::Literal { text } => write_leaf(text, out),
        Expr::Group { inner } => {
            out.push('(');
            write_expr(inner, out);
            out.push(')');
        }
        Expr::Binary { op, lhs, rhs } => {
            out.push('(');
            out.push_str(op.symbol());
            out.push(' ');
            write_expr(lhs, out);
            out.push(' ');
            write_expr(rhs, out);
            out.push(')');
        }
        Expr::Missing => {}
    }
}

fn write_leaf(text: &str, out: &mut String) {
    out.push_str("(id ");
    write_quoted(text, out);
    out.push(')');
}

fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    out.push_str(text);
    out.push('"');
}
