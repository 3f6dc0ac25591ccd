use crate::filterexpression::{MappingError, ParseError};
use crate::resources::StateError;
use crate::restapi::{RestError, ValidationError};

/// Errors of the resource handles
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Rest(#[from] RestError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("{resource} cannot be built from a {found} data object")]
    ObjectKindMismatch {
        resource: &'static str,
        found: &'static str,
    },
    #[error("resource state of {0} has no id")]
    MissingId(&'static str),
}
