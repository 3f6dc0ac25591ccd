//! resource state representation
//!
//! Attribute values of a terraform resource as seen by the resource handles:
//! - boolean (true/false)
//! - integer (i64)
//! - decimal (f64)
//! - string (utf-8)
//! - list (of values; sets are lists without duplicates)
//!
//! There is no `null`; an attribute that is null is simply not present in the state.
//! Objects/maps are not used by any resource and are rejected.
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Boolean(_) => "bool",
            AttributeValue::Integer(_) | AttributeValue::Decimal(_) => "number",
            AttributeValue::String(_) => "string",
            AttributeValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(value: Vec<T>) -> Self {
        AttributeValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<hcl::Value> for AttributeValue {
    type Error = UnsupportedValue;

    fn try_from(value: hcl::Value) -> Result<Self, Self::Error> {
        match value {
            hcl::Value::Bool(b) => Ok(b.into()),
            hcl::Value::Number(n) => {
                if let Some(int) = n.as_i64() {
                    return Ok(AttributeValue::Integer(int));
                }
                n.as_f64()
                    .map(AttributeValue::Decimal)
                    .ok_or(UnsupportedValue("out of range number"))
            }
            hcl::Value::String(s) => Ok(s.into()),
            hcl::Value::Array(array) => array
                .into_iter()
                .map(AttributeValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(AttributeValue::List),
            hcl::Value::Object(_) => Err(UnsupportedValue("object")),
            hcl::Value::Null => Err(UnsupportedValue("null")),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} values are not supported")]
pub struct UnsupportedValue(&'static str);

impl serde::ser::Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AttributeValue::Boolean(value) => serializer.serialize_bool(*value),
            AttributeValue::Integer(value) => serializer.serialize_i64(*value),
            AttributeValue::Decimal(value) => serializer.serialize_f64(*value),
            AttributeValue::String(value) => serializer.serialize_str(value),
            AttributeValue::List(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
        }
    }
}

/// State of one resource instance
///
/// `prior` holds the attributes as of the last [ResourceState::commit], which is what
/// [ResourceState::has_change] compares against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    id: Option<String>,
    attributes: IndexMap<String, AttributeValue>,
    prior: IndexMap<String, AttributeValue>,
}

impl ResourceState {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// marks the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// sets or removes `key` depending on `value`
    pub fn set_optional(&mut self, key: &str, value: Option<impl Into<AttributeValue>>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.attributes.shift_remove(key);
            }
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_change(&self, key: &str) -> bool {
        self.attributes.get(key) != self.prior.get(key)
    }

    pub fn commit(&mut self) {
        self.prior = self.attributes.clone();
    }

    pub fn string(&self, key: &str) -> Result<Option<&str>, StateError> {
        match self.attributes.get(key) {
            None => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(StateError::TypeMismatch {
                attribute: key.to_string(),
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    pub fn required_string(&self, key: &str) -> Result<&str, StateError> {
        self.string(key)?
            .ok_or_else(|| StateError::MissingAttribute(key.to_string()))
    }

    /// Elements of a list attribute, an absent attribute is an empty list
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, StateError> {
        let mismatch = |found: &'static str| StateError::TypeMismatch {
            attribute: key.to_string(),
            expected: "list of strings",
            found,
        };

        match self.attributes.get(key) {
            None => Ok(vec![]),
            Some(AttributeValue::List(elements)) => elements
                .iter()
                .map(|element| {
                    element
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| mismatch(element.type_name()))
                })
                .collect(),
            Some(other) => Err(mismatch(other.type_name())),
        }
    }

    /// Like [ResourceState::string_list] with duplicates removed, keeping the first occurrence
    pub fn string_set(&self, key: &str) -> Result<Vec<String>, StateError> {
        let mut elements = self.string_list(key)?;
        let mut seen = std::collections::HashSet::new();
        elements.retain(|element| seen.insert(element.clone()));
        Ok(elements)
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for ResourceState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            id: None,
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            prior: Default::default(),
        }
    }
}

/// Serializes the id and the attributes
impl serde::ser::Serialize for ResourceState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        ser.serialize_entry("id", &self.id)?;
        for (key, value) in &self.attributes {
            ser.serialize_entry(key, value)?;
        }
        ser.end()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("attribute {0} is required")]
    MissingAttribute(String),
    #[error("attribute {attribute} must be a {expected} but is a {found}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unsupported attribute {0}")]
    UnknownAttribute(String),
    #[error("attribute {0} is computed and cannot be configured")]
    ComputedAttribute(String),
    #[error("value of attribute {attribute} is not supported")]
    UnsupportedValue {
        attribute: String,
        #[source]
        reason: UnsupportedValue,
    },
    #[error("attribute {attribute} cannot be evaluated: {message}")]
    Evaluation { attribute: String, message: String },
}
