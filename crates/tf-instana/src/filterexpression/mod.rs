//! match expression language
//!
//! Text such as `entity.type EQUALS jvm AND (src:call.http.status EQUALS 500 OR call.erroneous NOT_EMPTY)`
//! is [parse]d into an [Expression], rendered back into canonical text with
//! [Expression::render] and converted from/to the API model with [to_api_model] and
//! [from_api_model].
mod ast;
mod lexer;
mod mapper;
mod parser;
mod render;

pub use ast::{Comparison, ComparisonOperator, EntityOrigin, Expression, LogicalOperator};
pub use mapper::{from_api_model, to_api_model, wire_entity, wire_operator, MappingError};
pub use parser::{parse, ParseError, ParseErrorKind};

/// Parses `text` and renders it in canonical form
pub fn normalize(text: &str) -> Result<String, ParseError> {
    parse(text).map(|expression| expression.render())
}
