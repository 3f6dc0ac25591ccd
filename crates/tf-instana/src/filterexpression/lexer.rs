//! tokenizer for match expressions
//!
//! Tokens are words, quoted strings, `(`, `)` and `:`. Whitespace separates tokens and is only
//! significant inside quotes. Words that spell a keyword (case-insensitive) become
//! [TokenKind::Keyword].
use super::ast::ComparisonOperator;
use super::parser::{ParseError, ParseErrorKind};
use winnow::{
    combinator::{alt, delimited, preceded, repeat},
    error::ContextError,
    prelude::*,
    token::{any, none_of, take_while},
};

/// Characters that end a word
pub(crate) const RESERVED_CHARACTERS: &[char] = &['(', ')', ':', '\'', '"'];

type Input<'a> = &'a str;
type LexResult<T> = winnow::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// source text of the token
    pub text: &'a str,
    /// byte offset into the expression
    pub offset: usize,
}

impl Token<'_> {
    pub fn describe(&self) -> String {
        format!("'{}'", self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Colon,
    Word(String),
    Quoted(String),
    Keyword(Keyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Or,
    Not,
    Operator(ComparisonOperator),
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("AND") {
            Some(Keyword::And)
        } else if word.eq_ignore_ascii_case("OR") {
            Some(Keyword::Or)
        } else if word.eq_ignore_ascii_case("NOT") {
            Some(Keyword::Not)
        } else {
            ComparisonOperator::from_keyword(word).map(Keyword::Operator)
        }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut input = source;
    let mut tokens = vec![];

    loop {
        input = input.trim_start();
        if input.is_empty() {
            break;
        }

        let offset = source.len() - input.len();
        let Ok(kind) = next_token.parse_next(&mut input) else {
            // words and punctuation always match, only a quote can fail
            return Err(ParseError::new(ParseErrorKind::UnterminatedString, offset));
        };

        let text = &source[offset..source.len() - input.len()];
        tracing::trace!(?kind, offset, "token");
        tokens.push(Token { kind, text, offset });
    }

    Ok(tokens)
}

fn next_token(input: &mut Input<'_>) -> LexResult<TokenKind> {
    alt((punctuation, quoted, word)).parse_next(input)
}

fn punctuation(input: &mut Input<'_>) -> LexResult<TokenKind> {
    alt((
        '('.value(TokenKind::LeftParen),
        ')'.value(TokenKind::RightParen),
        ':'.value(TokenKind::Colon),
    ))
    .parse_next(input)
}

fn quoted(input: &mut Input<'_>) -> LexResult<TokenKind> {
    alt((quoted_with('\''), quoted_with('"')))
        .map(TokenKind::Quoted)
        .parse_next(input)
}

/// A string delimited by `quote`, where a backslash escapes the following character
fn quoted_with<'a>(quote: char) -> impl Parser<Input<'a>, String, ContextError> {
    delimited(
        quote,
        repeat(0.., alt((preceded('\\', any), none_of([quote, '\\'])))).fold(
            String::new,
            |mut acc: String, c: char| {
                acc.push(c);
                acc
            },
        ),
        quote,
    )
}

fn word(input: &mut Input<'_>) -> LexResult<TokenKind> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !RESERVED_CHARACTERS.contains(&c)
    })
    .map(|word: &str| match Keyword::from_word(word) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Word(word.to_string()),
    })
    .parse_next(input)
}
