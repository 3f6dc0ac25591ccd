//! typed CRUD on top of [RestClient]
use super::client::{RestClient, TransportError};
use super::validation::ValidationError;
use super::InstanaDataObject;
use std::marker::PhantomData;

/// CRUD operations for the data object `T` at `T::RESOURCE_PATH`
///
/// Writes are validated before anything is sent, responses are validated after they are
/// deserialized.
#[derive(derive_new::new)]
pub struct RestResource<'c, T> {
    client: &'c dyn RestClient,
    #[new(default)]
    object: PhantomData<fn() -> T>,
}

impl<T: InstanaDataObject> RestResource<'_, T> {
    pub fn resource_path(&self) -> &'static str {
        T::RESOURCE_PATH
    }

    pub fn get_one(&self, id: &str) -> Result<T, RestError> {
        tracing::debug!(resource_path = T::RESOURCE_PATH, id, "get one");
        let body = self.client.get_one(id, T::RESOURCE_PATH)?;
        self.unmarshal_object(&body)
    }

    pub fn get_all(&self) -> Result<Vec<T>, RestError> {
        tracing::debug!(resource_path = T::RESOURCE_PATH, "get all");
        let body = self.client.get_all(T::RESOURCE_PATH)?;

        let serde_json::Value::Array(elements) = self.unmarshal_json(&body)? else {
            return Err(DeserializationError::UnexpectedShape {
                resource_path: T::RESOURCE_PATH,
                expected: "an array of objects",
            }
            .into());
        };

        elements
            .into_iter()
            .map(|element| self.object_from_json(element))
            .collect()
    }

    /// Creates or updates `object`, returning the representation stored by the API
    pub fn upsert(&self, object: &T) -> Result<T, RestError> {
        object.validate()?;

        let payload = serde_json::to_value(object).map_err(RestError::Serialization)?;

        tracing::debug!(resource_path = T::RESOURCE_PATH, id = object.id(), "upsert");
        let body = self.client.put(object.id(), &payload, T::RESOURCE_PATH)?;
        self.unmarshal_object(&body)
    }

    pub fn delete(&self, object: &T) -> Result<(), RestError> {
        self.delete_by_id(object.id())
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), RestError> {
        tracing::debug!(resource_path = T::RESOURCE_PATH, id, "delete");
        self.client.delete(id, T::RESOURCE_PATH)?;
        Ok(())
    }

    fn unmarshal_object(&self, body: &[u8]) -> Result<T, RestError> {
        let json = self.unmarshal_json(body)?;
        self.object_from_json(json)
    }

    fn unmarshal_json(&self, body: &[u8]) -> Result<serde_json::Value, DeserializationError> {
        serde_json::from_slice(body).map_err(|source| DeserializationError::Malformed {
            resource_path: T::RESOURCE_PATH,
            source,
        })
    }

    fn object_from_json(&self, json: serde_json::Value) -> Result<T, RestError> {
        if !json.is_object() {
            return Err(DeserializationError::UnexpectedShape {
                resource_path: T::RESOURCE_PATH,
                expected: "a single object",
            }
            .into());
        }

        let object: T =
            serde_json::from_value(json).map_err(|source| DeserializationError::Malformed {
                resource_path: T::RESOURCE_PATH,
                source,
            })?;

        object.validate()?;
        Ok(object)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeserializationError {
    #[error("response of {resource_path} is not valid")]
    Malformed {
        resource_path: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("response of {resource_path} is not {expected}")]
    UnexpectedShape {
        resource_path: &'static str,
        expected: &'static str,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum RestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("data object cannot be serialized")]
    Serialization(#[source] serde_json::Error),
}

impl RestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RestError::Transport(transport) if transport.is_not_found())
    }
}
