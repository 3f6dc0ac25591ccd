//! transport collaborator of [super::RestResource]
//!
//! Implementations deal with endpoints, authentication, timeouts and retries. They hand back
//! raw response bodies; interpreting them is up to the resource.

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait RestClient: Send + Sync {
    fn get_one(&self, id: &str, resource_path: &str) -> Result<Vec<u8>, TransportError>;
    fn get_all(&self, resource_path: &str) -> Result<Vec<u8>, TransportError>;
    fn put(
        &self,
        id: &str,
        payload: &serde_json::Value,
        resource_path: &str,
    ) -> Result<Vec<u8>, TransportError>;
    fn delete(&self, id: &str, resource_path: &str) -> Result<(), TransportError>;
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("{resource_path}/{id} does not exist")]
    NotFound { resource_path: String, id: String },
    #[error("request against {resource_path} failed")]
    Failed {
        resource_path: String,
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    pub fn failed(resource_path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Failed {
            resource_path: resource_path.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::NotFound { .. })
    }
}
