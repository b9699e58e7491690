//! Field state: one mounted schema node plus its display metadata.

use crate::message::FieldMessages;
use crate::options::{entries_from_values, DataSourceEntry};
use crate::path::FieldPath;
use crate::schema::{Props, Schema, SchemaType};
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Holds a scalar value.
    Value,
    Object,
    Array,
    /// Structural only, no bound value.
    Void,
}

impl FieldKind {
    pub fn for_schema(schema: &Schema) -> FieldKind {
        match schema.kind {
            SchemaType::Void => FieldKind::Void,
            SchemaType::Array => FieldKind::Array,
            SchemaType::Object => FieldKind::Object,
            _ if !schema.properties.is_empty() => FieldKind::Object,
            _ => FieldKind::Value,
        }
    }
}

/// Component or decorator slot: a widget name plus a lazily created
/// property bag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slot {
    pub name: Option<String>,
    props: Option<Props>,
}

impl Slot {
    pub fn new(name: Option<String>, props: Option<Props>) -> Self {
        Self { name, props }
    }

    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    /// The property bag, created empty on first use.
    pub fn props_mut(&mut self) -> &mut Props {
        self.props.get_or_insert_with(Props::new)
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.as_ref()?.get(key)
    }

    pub fn set_prop(&mut self, key: &str, value: Value) {
        self.props_mut().insert(key.to_owned(), value);
    }

    pub fn has_props(&self) -> bool {
        self.props.is_some()
    }

    pub(crate) fn replace_props(&mut self, props: Option<Props>) {
        self.props = props;
    }
}

/// Initial state for [`crate::Form::create_field`].
#[derive(Clone, Debug)]
pub struct FieldProps {
    pub address: FieldPath,
    pub path: FieldPath,
    pub kind: FieldKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub component: Slot,
    pub decorator: Slot,
    pub data_source: Option<Vec<Value>>,
}

impl FieldProps {
    pub fn new(address: FieldPath, path: FieldPath, kind: FieldKind) -> Self {
        Self {
            address,
            path,
            kind,
            title: None,
            description: None,
            component: Slot::default(),
            decorator: Slot::default(),
            data_source: None,
        }
    }

    pub fn from_schema(address: FieldPath, path: FieldPath, schema: &Schema) -> Self {
        Self {
            kind: FieldKind::for_schema(schema),
            title: schema.title.clone(),
            description: schema.description.clone(),
            component: Slot::new(schema.component.clone(), schema.component_props.clone()),
            decorator: Slot::new(schema.decorator.clone(), schema.decorator_props.clone()),
            data_source: schema.data_source.clone(),
            ..Self::new(address, path, FieldKind::Value)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    address: FieldPath,
    path: FieldPath,
    kind: FieldKind,
    title: Option<String>,
    description: Option<String>,
    component: Slot,
    decorator: Slot,
    data_source: Option<Vec<DataSourceEntry>>,
    // Options as authored or last set from outside; localization always
    // starts from these.
    authored_data_source: Option<Vec<DataSourceEntry>>,
    // `${token}` component props as first seen, keyed by prop name.
    prop_templates: IndexMap<String, String>,
    messages: Option<FieldMessages>,
}

impl Field {
    pub fn new(props: FieldProps) -> Self {
        Self {
            address: props.address,
            path: props.path,
            kind: props.kind,
            title: props.title,
            description: props.description,
            component: props.component,
            decorator: props.decorator,
            authored_data_source: props.data_source.clone().map(entries_from_values),
            data_source: props.data_source.map(entries_from_values),
            prop_templates: IndexMap::new(),
            messages: None,
        }
    }

    /// Position among all mounted fields, void ones included.
    pub fn address(&self) -> &FieldPath {
        &self.address
    }

    /// Data path: the address without void ancestors.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_void(&self) -> bool {
        self.kind == FieldKind::Void
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn component(&self) -> &Slot {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Slot {
        &mut self.component
    }

    pub fn decorator(&self) -> &Slot {
        &self.decorator
    }

    pub fn decorator_mut(&mut self) -> &mut Slot {
        &mut self.decorator
    }

    pub fn data_source(&self) -> Option<&[DataSourceEntry]> {
        self.data_source.as_deref()
    }

    /// Options before localization.
    pub fn authored_data_source(&self) -> Option<&[DataSourceEntry]> {
        self.authored_data_source.as_deref()
    }

    /// Replaces the whole option list, authored options included.
    pub fn set_data_source(&mut self, entries: Option<Vec<DataSourceEntry>>) {
        self.authored_data_source = entries.clone();
        self.data_source = entries;
    }

    pub(crate) fn set_localized_data_source(&mut self, entries: Option<Vec<DataSourceEntry>>) {
        self.data_source = entries;
    }

    pub fn messages(&self) -> Option<&FieldMessages> {
        self.messages.as_ref()
    }

    pub fn set_messages(&mut self, messages: FieldMessages) {
        self.messages = Some(messages);
    }

    pub(crate) fn prop_templates(&self) -> &IndexMap<String, String> {
        &self.prop_templates
    }

    pub(crate) fn remember_prop_template(&mut self, key: &str, template: &str) {
        self.prop_templates.insert(key.to_owned(), template.to_owned());
    }

    /// Replaces component props from outside; remembered templates are
    /// dropped along with the props they came from.
    pub(crate) fn replace_component_props(&mut self, props: Option<Props>) {
        self.prop_templates.clear();
        self.component.replace_props(props);
    }
}
