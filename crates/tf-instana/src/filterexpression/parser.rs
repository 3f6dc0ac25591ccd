//! recursive descent parser for match expressions
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := unary (AND unary)*
//! unary      := NOT unary | primary
//! primary    := "(" expr ")" | comparison
//! comparison := [entity ":"] tag operator [value]
//! ```
//!
//! `NOT` binds tighter than `AND`, which binds tighter than `OR`. Chains of the same operator
//! associate to the left.
//!
//! Parentheses and `NOT` may nest at most [MAX_NESTING_DEPTH] levels and the resulting tree is at
//! most [MAX_NESTING_DEPTH] levels deep.
use super::ast::{Comparison, EntityOrigin, Expression, LogicalOperator};
use super::lexer::{tokenize, Keyword, Token, TokenKind};

pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses the textual form of a match expression
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, 0));
    }

    let mut parser = ExpressionParser {
        tokens: &tokens,
        position: 0,
        end_offset: text.len(),
        depth: 0,
    };

    let (expression, _) = parser.or_expression()?;

    if let Some(token) = parser.peek() {
        let kind = match token.kind {
            TokenKind::RightParen => ParseErrorKind::UnexpectedClosingParenthesis,
            _ => ParseErrorKind::UnexpectedToken(token.describe()),
        };
        return Err(ParseError::new(kind, token.offset));
    }

    Ok(expression)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid match expression: {kind} at position {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// byte offset of the offending token
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expression is empty")]
    Empty,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unbalanced parenthesis, expected ')' but found {0}")]
    UnclosedParenthesis(String),
    #[error("unbalanced parenthesis, unexpected ')'")]
    UnexpectedClosingParenthesis,
    #[error("missing operator after tag '{tag}', found {found}")]
    MissingOperator { tag: String, found: String },
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("missing value for operator {operator}, found {found}")]
    MissingValue {
        operator: &'static str,
        found: String,
    },
    #[error("unknown entity origin '{0}'")]
    UnknownEntityOrigin(String),
    #[error("tag must not be blank")]
    BlankTag,
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expression is nested deeper than {} levels", MAX_NESTING_DEPTH)]
    NestingTooDeep,
}

const END_OF_INPUT: &str = "end of input";

struct ExpressionParser<'t, 'a> {
    tokens: &'t [Token<'a>],
    position: usize,
    /// reported as position when running out of tokens
    end_offset: usize,
    /// open parentheses and `NOT`s around the current token
    depth: usize,
}

/// parsed expression and the height of its tree
type Parsed = (Expression, usize);

fn check_height(height: usize, offset: usize) -> Result<usize, ParseError> {
    if height > MAX_NESTING_DEPTH {
        return Err(ParseError::new(ParseErrorKind::NestingTooDeep, offset));
    }
    Ok(height)
}

impl<'t, 'a> ExpressionParser<'t, 'a> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.position)
    }

    fn peek_is(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Keyword(k), .. }) if *k == keyword)
    }

    fn advance(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// description and offset of the next token, used for error reporting
    fn found(&self) -> (String, usize) {
        match self.peek() {
            Some(token) => (token.describe(), token.offset),
            None => (END_OF_INPUT.to_string(), self.end_offset),
        }
    }

    /// Consumes the next token and enters one nesting level
    fn descend(&mut self, offset: usize) -> Result<(), ParseError> {
        self.advance();
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::new(ParseErrorKind::NestingTooDeep, offset));
        }
        Ok(())
    }

    fn or_expression(&mut self) -> Result<Parsed, ParseError> {
        self.logical_chain(LogicalOperator::Or)
    }

    fn and_expression(&mut self) -> Result<Parsed, ParseError> {
        self.logical_chain(LogicalOperator::And)
    }

    /// left-associative fold over one precedence tier
    fn logical_chain(&mut self, operator: LogicalOperator) -> Result<Parsed, ParseError> {
        let (keyword, operand): (Keyword, fn(&mut Self) -> Result<Parsed, ParseError>) =
            match operator {
                LogicalOperator::Or => (Keyword::Or, Self::and_expression),
                LogicalOperator::And => (Keyword::And, Self::unary),
            };

        let (mut left, mut height) = operand(self)?;
        while self.peek_is(keyword) {
            let offset = self.found().1;
            self.advance();
            let (right, right_height) = operand(self)?;
            height = check_height(height.max(right_height) + 1, offset)?;
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, height))
    }

    fn unary(&mut self) -> Result<Parsed, ParseError> {
        if self.peek_is(Keyword::Not) {
            let offset = self.found().1;
            self.descend(offset)?;
            let (operand, height) = self.unary()?;
            self.depth -= 1;
            let height = check_height(height + 1, offset)?;
            return Ok((Expression::Not(Box::new(operand)), height));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Parsed, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::new(ParseErrorKind::UnexpectedEnd, self.end_offset));
        };

        match token.kind {
            TokenKind::LeftParen => {
                self.descend(token.offset)?;
                let inner = self.or_expression()?;
                self.depth -= 1;
                match self.peek() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => {
                        self.advance();
                        Ok(inner)
                    }
                    _ => {
                        let (found, offset) = self.found();
                        Err(ParseError::new(
                            ParseErrorKind::UnclosedParenthesis(found),
                            offset,
                        ))
                    }
                }
            }
            TokenKind::RightParen => Err(ParseError::new(
                ParseErrorKind::UnexpectedClosingParenthesis,
                token.offset,
            )),
            _ => Ok((Expression::Comparison(self.comparison()?), 1)),
        }
    }

    fn comparison(&mut self) -> Result<Comparison, ParseError> {
        let entity = self.entity_origin()?;

        let tag_offset = self.found().1;
        let tag = self.text_operand().ok_or_else(|| {
            let (found, offset) = self.found();
            ParseError::new(ParseErrorKind::UnexpectedToken(found), offset)
        })?;
        if tag.trim().is_empty() {
            return Err(ParseError::new(ParseErrorKind::BlankTag, tag_offset));
        }

        let operator = match self.peek() {
            Some(Token {
                kind: TokenKind::Keyword(Keyword::Operator(operator)),
                ..
            }) => {
                self.advance();
                *operator
            }
            Some(Token {
                kind: TokenKind::Word(word),
                offset,
                ..
            }) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnknownOperator(word.clone()),
                    *offset,
                ))
            }
            _ => {
                let (found, offset) = self.found();
                return Err(ParseError::new(
                    ParseErrorKind::MissingOperator { tag, found },
                    offset,
                ));
            }
        };

        let value = if operator.is_unary() {
            None
        } else {
            let value = self.text_operand().ok_or_else(|| {
                let (found, offset) = self.found();
                ParseError::new(
                    ParseErrorKind::MissingValue {
                        operator: operator.keyword(),
                        found,
                    },
                    offset,
                )
            })?;
            Some(value)
        };

        tracing::trace!(?entity, %tag, ?operator, ?value, "comparison");
        Ok(Comparison {
            entity,
            tag,
            operator,
            value,
        })
    }

    /// Consumes `entity ":"` when the next two tokens are a word and a colon
    fn entity_origin(&mut self) -> Result<Option<EntityOrigin>, ParseError> {
        let (Some(first), Some(second)) = (
            self.tokens.get(self.position),
            self.tokens.get(self.position + 1),
        ) else {
            return Ok(None);
        };

        if second.kind != TokenKind::Colon {
            return Ok(None);
        }

        let TokenKind::Word(word) = &first.kind else {
            return Err(ParseError::new(
                ParseErrorKind::UnknownEntityOrigin(first.text.to_string()),
                first.offset,
            ));
        };

        let origin = EntityOrigin::from_keyword(word).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownEntityOrigin(word.clone()),
                first.offset,
            )
        })?;

        self.position += 2;
        Ok(Some(origin))
    }

    /// A word or quoted string, used for tags and values
    fn text_operand(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Word(text) | TokenKind::Quoted(text),
                ..
            }) => {
                let text = text.clone();
                self.advance();
                Some(text)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filterexpression::ast::ComparisonOperator::*;
    use pretty_assertions::assert_eq;

    fn eq(tag: &str, value: &str) -> Expression {
        Comparison::binary(tag, Equals, value).into()
    }

    fn error_kind(text: &str) -> ParseErrorKind {
        parse(text).expect_err("must not parse").kind
    }

    #[test]
    fn single_comparison() {
        assert_eq!(parse("entity.type EQUALS jvm").unwrap(), eq("entity.type", "jvm"));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("a EQUALS 1 OR b EQUALS 2 AND c EQUALS 3").unwrap(),
            Expression::or(eq("a", "1"), Expression::and(eq("b", "2"), eq("c", "3")))
        );
    }

    #[test]
    fn chains_are_left_associative() {
        assert_eq!(
            parse("a EQUALS 1 and b EQUALS 2 and c EQUALS 3").unwrap(),
            Expression::and(Expression::and(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
        assert_eq!(
            parse("a EQUALS 1 or b EQUALS 2 or c EQUALS 3").unwrap(),
            Expression::or(Expression::or(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            parse("(a EQUALS 1 OR b EQUALS 2) AND c EQUALS 3").unwrap(),
            Expression::and(Expression::or(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
    }

    #[test]
    fn not_binds_tightest() {
        assert_eq!(
            parse("NOT a EQUALS 1 AND b EQUALS 2").unwrap(),
            Expression::and(Expression::not(eq("a", "1")), eq("b", "2"))
        );
        assert_eq!(
            parse("not not a EQUALS 1").unwrap(),
            Expression::not(Expression::not(eq("a", "1")))
        );
    }

    #[test]
    fn unary_operators_take_no_value() {
        assert_eq!(
            parse("a IS_EMPTY and b not_blank").unwrap(),
            Expression::and(
                Comparison::unary("a", IsEmpty).into(),
                Comparison::unary("b", NotBlank).into()
            )
        );
    }

    #[test]
    fn entity_origin_and_quoted_operands() {
        assert_eq!(
            parse("src:'call name' CONTAINS 'GET /api'").unwrap(),
            Comparison::binary("call name", Contains, "GET /api")
                .with_entity(EntityOrigin::Source)
                .into()
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(error_kind(""), ParseErrorKind::Empty);
        assert_eq!(error_kind("   \t "), ParseErrorKind::Empty);
    }

    #[test]
    fn unbalanced_parentheses() {
        let err = parse("(a EQUALS 1").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnclosedParenthesis(END_OF_INPUT.into())
        );
        assert_eq!(err.position, 11);

        let err = parse("a EQUALS 1)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedClosingParenthesis);
        assert_eq!(err.position, 10);
    }

    #[test]
    fn missing_operator() {
        assert_eq!(
            error_kind("a AND b EQUALS 1"),
            ParseErrorKind::MissingOperator {
                tag: "a".into(),
                found: "'AND'".into()
            }
        );
    }

    #[test]
    fn unknown_operator() {
        let err = parse("a LIKE 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownOperator("LIKE".into()));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn missing_value() {
        assert_eq!(
            error_kind("a EQUALS"),
            ParseErrorKind::MissingValue {
                operator: "EQUALS",
                found: END_OF_INPUT.into()
            }
        );
        assert_eq!(
            error_kind("a EQUALS or b IS_EMPTY"),
            ParseErrorKind::MissingValue {
                operator: "EQUALS",
                found: "'or'".into()
            }
        );
    }

    #[test]
    fn unexpected_end() {
        assert_eq!(error_kind("a EQUALS 1 AND"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(error_kind("NOT"), ParseErrorKind::UnexpectedEnd);
    }

    #[test]
    fn unknown_entity_origin() {
        assert_eq!(
            error_kind("caller:a EQUALS 1"),
            ParseErrorKind::UnknownEntityOrigin("caller".into())
        );
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(
            error_kind("a IS_EMPTY b"),
            ParseErrorKind::UnexpectedToken("'b'".into())
        );
    }

    #[test]
    fn blank_tag() {
        assert_eq!(error_kind("'  ' EQUALS 1"), ParseErrorKind::BlankTag);
    }

    #[test]
    fn nesting_is_limited() {
        let within = format!(
            "{}a IS_EMPTY{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(parse(&within).unwrap(), Comparison::unary("a", IsEmpty).into());

        let parentheses = format!("{}a EQUALS 1{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = parse(&parentheses).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
        assert_eq!(err.position, MAX_NESTING_DEPTH);

        let negations = format!("{}a IS_EMPTY", "NOT ".repeat(200_000));
        let err = parse(&negations).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
        assert_eq!(err.position, 4 * MAX_NESTING_DEPTH);
    }

    #[test]
    fn long_chains_are_limited() {
        let chain = |length: usize| vec!["a IS_EMPTY"; length].join(" or ");

        assert!(parse(&chain(MAX_NESTING_DEPTH)).is_ok());
        assert_eq!(
            error_kind(&chain(MAX_NESTING_DEPTH + 1)),
            ParseErrorKind::NestingTooDeep
        );
        assert_eq!(error_kind(&chain(100_000)), ParseErrorKind::NestingTooDeep);
    }

    #[test]
    fn error_message_names_token_and_position() {
        let err = parse("a EQUALS 1 AND b LIKE 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid match expression: unknown operator 'LIKE' at position 17"
        );
    }
}
