//! Declarative settings schema attached to a node's designer props.

use crate::error::FormError;
use crate::path::{is_index, FieldPath};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub type Props = IndexMap<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
    Void,
    Date,
    Datetime,
    #[serde(other)]
    Any,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "x-component")]
    pub component: Option<String>,
    #[serde(rename = "x-component-props")]
    pub component_props: Option<Props>,
    #[serde(rename = "x-decorator")]
    pub decorator: Option<String>,
    #[serde(rename = "x-decorator-props")]
    pub decorator_props: Option<Props>,
    #[serde(rename = "enum", alias = "dataSource")]
    pub data_source: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub properties: IndexMap<String, Schema>,
    pub items: Option<Box<Schema>>,
}

impl Schema {
    pub fn from_value(value: &Value) -> Result<Schema, FormError> {
        Ok(Schema::deserialize(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Schema, FormError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_void(&self) -> bool {
        self.kind == SchemaType::Void
    }

    /// Walks a field address down the schema: names select properties,
    /// indices select `items`.
    pub fn find(&self, address: &FieldPath) -> Option<&Schema> {
        let mut current = self;
        for segment in address.segments() {
            current = if is_index(segment) {
                current.items.as_deref()?
            } else {
                current.properties.get(segment)?
            };
        }
        Some(current)
    }
}
