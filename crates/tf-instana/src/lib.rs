//! # tf-instana - core of a terraform provider for Instana
//!
//! ## Introduction for developers
//!
//! Read this to understand how the crate is put together.
//!
//! ### Match expressions
//!
//! Application perspectives select their entities with a textual match expression such as
//! ```text
//! entity.type EQUALS jvm AND (dest:service.name EQUALS shop OR src:call.tag NOT_EMPTY)
//! ```
//!
//! [filterexpression] turns the text into an [filterexpression::Expression] tree
//! ([filterexpression::parse]), renders a tree back into its canonical text
//! ([filterexpression::Expression::render]) and maps trees to and from the JSON model of the REST
//! API ([filterexpression::to_api_model], [filterexpression::from_api_model]).
//!
//! Precedence from strongest to weakest binding is `NOT`, `AND`, `OR`. Keywords and operators are
//! matched case-insensitively; the canonical rendering lowercases them and only keeps the
//! parentheses that change the meaning.
//!
//! ### REST resources
//!
//! [restapi] holds the data objects of the API and [restapi::RestResource], which runs
//! get/list/upsert/delete for any [restapi::InstanaDataObject] on top of a [restapi::RestClient].
//! The client is a trait; it only moves bytes and reports transport failures. Every object is
//! validated before it is sent and after it is received.
//!
//! ### Resource handles
//!
//! [resources] maps terraform resource state to data objects and back. Each
//! [resources::ResourceKind] declares its attributes as a table of [resources::FieldSpec]s.
//!
//! ### Planning
//!
//! [tf_documents::TfDocuments] loads `.tf` files. [plan::Plan] checks their structure, evaluates
//! the attributes of every `resource` block of this provider and produces the payloads that would be
//! sent, without talking to the API.
//!
//! ### Configuration
//!
//! see [config]
pub mod config;
mod error;
pub mod filterexpression;
pub mod plan;
pub mod resources;
pub mod restapi;
pub mod tf_documents;

pub use error::Error;
