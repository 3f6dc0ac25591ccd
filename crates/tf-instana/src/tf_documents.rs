//! collection of terraform documents ([Body] and path to source file)
//!
//! [TfDocuments] keeps the root blocks and root attributes of all loaded documents together with the
//! index of the source they came from. Loaded documents only have to be valid HCL to be accepted,
//! terraform rules are applied by [crate::plan::Plan].
use crate::resources::{AttributeValue, ResourceState, StateError};
use hcl::eval::Evaluate;
use hcl_edit::structure::{Attribute, Block, Body, Structure};
use std::path::{Path, PathBuf};

#[derive(Default, Debug)]
pub struct TfDocuments {
    sources: Vec<Source>,
    root_attributes: Vec<(usize, Attribute)>,
    root_blocks: Vec<(usize, Block)>,
}

impl TfDocuments {
    pub fn insert(&mut self, document: Body, path: impl Into<Option<PathBuf>>) {
        let source_index = self.sources.len();
        self.sources.push(path.into());

        for structure in document.into_iter() {
            match structure {
                Structure::Block(block) => self.root_blocks.push((source_index, block)),
                Structure::Attribute(attribute) => {
                    self.root_attributes.push((source_index, attribute))
                }
            }
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = SourceAttribute<'_>> {
        self.root_attributes
            .iter()
            .map(|(source_index, attribute)| (&self.sources[*source_index], attribute))
    }

    pub fn blocks(&self) -> impl Iterator<Item = SourceBlock<'_>> {
        self.root_blocks
            .iter()
            .map(|(source_index, block)| (&self.sources[*source_index], block))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let body = hcl_edit::parser::parse_body(&file_contents)?;

        self.insert(body, Some(file_path));
        Ok(())
    }

    /// Loads all `*.tf` files of a directory in file name order
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let mut file_paths = vec![];
        for dir_entry in std::fs::read_dir(dir_path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            if dir_entry.file_name().to_string_lossy().ends_with(".tf") {
                file_paths.push(dir_entry.path());
            }
        }

        if file_paths.is_empty() {
            return Err(LoadError::NoFilesFound(dir_path.to_path_buf()));
        }

        file_paths.sort();
        for file_path in file_paths {
            self.load_file(&file_path)?;
        }

        Ok(())
    }
}

impl From<Body> for TfDocuments {
    fn from(value: Body) -> Self {
        let mut documents = TfDocuments::default();
        documents.insert(value, None);
        documents
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No .tf files found in directory {}", .0.display())]
    NoFilesFound(PathBuf),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse terraform file")]
    HclParseFailed(#[from] hcl_edit::parser::Error),
}

/// Evaluates the attributes of a resource block body into a [ResourceState]
///
/// Expressions must be evaluable without terraform context: literals, templates without
/// references, function-free operations. `null` values leave the attribute unset.
pub fn evaluate_attributes(body: &Body) -> Result<ResourceState, StateError> {
    let context = hcl::eval::Context::new();
    let mut state = ResourceState::default();

    for attribute in body.attributes() {
        let key = attribute.key.value().as_str();
        let expression: hcl::Expression = attribute.value.clone().into();

        let value = expression
            .evaluate(&context)
            .map_err(|err| StateError::Evaluation {
                attribute: key.to_string(),
                message: err.to_string(),
            })?;

        if value.is_null() {
            tracing::trace!(attribute = key, "null attribute is unset");
            continue;
        }

        let value =
            AttributeValue::try_from(value).map_err(|reason| StateError::UnsupportedValue {
                attribute: key.to_string(),
                reason,
            })?;
        state.set(key, value);
    }

    Ok(state)
}

/// Utility macro to create [TfDocuments]
///
/// Create from a single document
/// ```
/// # use tf_instana::tf_documents;
/// tf_documents!(r#"resource "instana_alerting_channel_email" "ops" {}"#);
/// ```
///
/// Create from multiple documents (path required)
/// ```
/// # use tf_instana::tf_documents;
/// tf_documents! {
///   "main.tf" => r#"provider "instana" {}"#,
///   "channels.tf" => r#"resource "instana_alerting_channel_email" "ops" {}"#
/// };
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use tf_instana::tf_documents;
/// tf_documents!("not = valid = hcl");
/// ```
#[macro_export]
macro_rules! tf_documents {
    // single document without source
    { $expr:expr } => {
        $crate::tf_documents::TfDocuments::from(hcl_edit::parser::parse_body($expr).expect("body must parse"))
    };
    // multi document with sources
    { $($source:expr => $expr:expr),+ } => {{
        let mut docs = $crate::tf_documents::TfDocuments::default();
        $(
            docs.insert(hcl_edit::parser::parse_body($expr).expect("body must parse"), Some($source.into()));
        )+

        docs
    }};
}

pub type Source = Option<PathBuf>;
pub type SourceAttribute<'a> = (&'a Source, &'a Attribute);
pub type SourceBlock<'a> = (&'a Source, &'a Block);

/// display name of a source, documents read from stdin have no path
pub fn describe_source(source: &Source) -> String {
    match source {
        Some(path) => path.display().to_string(),
        None => "<stdin>".to_string(),
    }
}
