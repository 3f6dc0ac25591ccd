//! canonical text form of match expressions
//!
//! Rendering normalizes user input so that equivalent expressions produce the same text:
//! keywords are lowercase, tokens are separated by a single space and parentheses only
//! appear where precedence requires them.
use super::ast::{Comparison, Expression, LogicalOperator};
use super::lexer::{Keyword, RESERVED_CHARACTERS};

impl Expression {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                render_operand(*operator, left, out);
                out.push(' ');
                out.push_str(&operator.keyword().to_ascii_lowercase());
                out.push(' ');
                render_operand(*operator, right, out);
            }
            Expression::Not(operand) => {
                out.push_str("not ");
                if matches!(**operand, Expression::Binary { .. }) {
                    render_parenthesized(operand, out);
                } else {
                    operand.render_into(out);
                }
            }
            Expression::Comparison(comparison) => comparison.render_into(out),
        }
    }
}

/// An OR below an AND is the only place where the tree shape differs from plain precedence
fn render_operand(parent: LogicalOperator, operand: &Expression, out: &mut String) {
    match operand {
        Expression::Binary {
            operator: LogicalOperator::Or,
            ..
        } if parent == LogicalOperator::And => render_parenthesized(operand, out),
        _ => operand.render_into(out),
    }
}

fn render_parenthesized(expression: &Expression, out: &mut String) {
    out.push('(');
    expression.render_into(out);
    out.push(')');
}

impl Comparison {
    fn render_into(&self, out: &mut String) {
        if let Some(entity) = self.entity {
            out.push_str(entity.keyword());
            out.push(':');
        }
        push_operand(&self.tag, out);
        out.push(' ');
        out.push_str(&self.operator.keyword().to_ascii_lowercase());
        if let Some(value) = &self.value {
            out.push(' ');
            push_operand(value, out);
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn push_operand(text: &str, out: &mut String) {
    if !needs_quotes(text) {
        out.push_str(text);
        return;
    }

    out.push('\'');
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

/// A bare word must lex back into the same word and must not be mistaken for a keyword
fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_CHARACTERS.contains(&c))
        || Keyword::from_word(text).is_some()
}
