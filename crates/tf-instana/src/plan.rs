//! Offline plan of the Instana resources declared in terraform documents
//!
//! Building a [Plan] happens in two passes:
//! 1. structural checks of all root structures, every problem found is collected as an [Issue]
//! 2. each `resource` block is evaluated, conformed to the attribute table of its
//!    [ResourceKind], mapped to a [DataObject] and validated. The first failing resource aborts.
use crate::config::{ConfigError, ConfigOverrides, ProviderConfig};
use crate::resources::{
    conform_configuration, DataObject, ResourceKind, ResourceNameFormatter, ResourceState,
};
use crate::tf_documents::{describe_source, evaluate_attributes, TfDocuments};
use crate::Error;
use hcl_edit::structure::Block;
use serde::Serialize;

/// Prefix shared by all resource types of this provider
pub const RESOURCE_TYPE_PREFIX: &str = "instana_";

/// Meta attribute to pin the id of an object instead of generating one
pub const ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Serialize)]
pub struct Plan {
    pub config: ProviderConfig,
    pub resources: Vec<PlannedResource>,
}

#[derive(Debug, Serialize)]
pub struct PlannedResource {
    /// `<resource type>.<resource name>`
    pub address: String,
    pub resource_path: &'static str,
    /// body of the PUT request
    pub payload: serde_json::Value,
    /// state after applying the payload
    pub state: ResourceState,
}

struct ResourceBlock<'a> {
    address: String,
    kind: ResourceKind,
    block: &'a Block,
}

impl Plan {
    /// Plans all resources of `documents`
    ///
    /// `base` holds the configuration layers below the provider block, `overrides` the layer
    /// above it.
    pub fn new(
        documents: &TfDocuments,
        base: ProviderConfig,
        overrides: ConfigOverrides,
    ) -> Result<Self, PlanError> {
        let mut issues = PlanIssues::new();
        let mut resource_blocks: Vec<ResourceBlock> = vec![];
        let mut provider_blocks = vec![];

        for (source, attribute) in documents.attributes() {
            issues.log(Issue::RootAttribute {
                key: attribute.key.value().as_str().to_string(),
                file: describe_source(source),
            });
        }

        for (source, block) in documents.blocks() {
            let labels: Vec<&str> = block.labels.iter().map(|label| label.as_str()).collect();

            match block.ident.value().as_str() {
                "resource" => {
                    let [resource_type, name] = labels.as_slice() else {
                        issues.log(Issue::ResourceLabels {
                            labels: labels.len(),
                            file: describe_source(source),
                        });
                        continue;
                    };

                    let Some(kind) = ResourceKind::from_resource_name(resource_type) else {
                        if resource_type.starts_with(RESOURCE_TYPE_PREFIX) {
                            issues.log(Issue::UnknownResourceType {
                                resource_type: resource_type.to_string(),
                                file: describe_source(source),
                            });
                        } else {
                            tracing::debug!(resource_type, "skipping resource of other provider");
                        }
                        continue;
                    };

                    let address = format!("{resource_type}.{name}");
                    if resource_blocks.iter().any(|existing| existing.address == address) {
                        issues.log(Issue::DuplicateAddress {
                            address,
                            file: describe_source(source),
                        });
                        continue;
                    }

                    resource_blocks.push(ResourceBlock {
                        address,
                        kind,
                        block,
                    });
                }
                "provider" if labels.first() == Some(&"instana") => provider_blocks.push(block),
                other => tracing::trace!(block = other, "ignoring block"),
            }
        }

        if provider_blocks.len() > 1 {
            issues.log(Issue::DuplicateProvider(provider_blocks.len()));
        }

        if !issues.issues.is_empty() {
            return Err(issues.into());
        }

        let mut config = base;
        if let Some(provider) = provider_blocks.first() {
            config.apply(ConfigOverrides::from_provider_block(&provider.body)?);
        }
        config.apply(overrides);
        tracing::debug!(?config, "provider configuration");

        let formatter = config.name_formatter();
        let resources: Vec<PlannedResource> = resource_blocks
            .iter()
            .map(|resource| {
                resource
                    .plan(&formatter)
                    .map_err(|source| PlanError::Resource {
                        address: resource.address.clone(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { config, resources })
    }
}

impl ResourceBlock<'_> {
    #[tracing::instrument(level = "debug", skip_all, fields(address = %self.address))]
    fn plan(&self, formatter: &ResourceNameFormatter) -> Result<PlannedResource, Error> {
        let mut state = evaluate_attributes(&self.block.body)?;

        let pinned_id = state.string(ID_ATTRIBUTE)?.map(str::to_string);
        state.set_optional(ID_ATTRIBUTE, None::<String>);
        conform_configuration(&mut state, self.kind.schema())?;
        state.set_id(pinned_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()));

        let object: DataObject = self.kind.map_state_to_data_object(&state, formatter)?;
        object.validate()?;
        let payload = object.to_payload().map_err(crate::restapi::RestError::Serialization)?;

        self.kind.update_state(&mut state, &object)?;
        state.commit();

        Ok(PlannedResource {
            address: self.address.clone(),
            resource_path: object.resource_path(),
            payload,
            state,
        })
    }
}

#[derive(derive_new::new, Debug)]
pub struct PlanIssues {
    #[new(default)]
    issues: Vec<Issue>,
}

impl PlanIssues {
    pub fn log(&mut self, issue: Issue) {
        tracing::trace!(?issue, "issue found");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

impl std::error::Error for PlanIssues {}

impl std::fmt::Display for PlanIssues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Issue {
    #[error("{file}: root attribute {key} is not allowed")]
    RootAttribute { key: String, file: String },
    #[error("{file}: resource block needs a type and a name label, found {labels} labels")]
    ResourceLabels { labels: usize, file: String },
    #[error("{file}: unsupported resource type {resource_type}")]
    UnknownResourceType { resource_type: String, file: String },
    #[error("{file}: resource {address} is declared more than once")]
    DuplicateAddress { address: String, file: String },
    #[error("provider \"instana\" is configured {0} times")]
    DuplicateProvider(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("Invalid terraform documents")]
    Issues(#[from] PlanIssues),
    #[error("Invalid provider configuration")]
    Config(#[from] ConfigError),
    #[error("Unable to plan {address}")]
    Resource {
        address: String,
        #[source]
        source: Error,
    },
}
