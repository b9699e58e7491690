//! Localized message lookup for settings fields.

use crate::path::FieldPath;
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;
use trellis_core::{is_truthy, DesignNode, MessageRegistry};

/// Root namespace of every settings-form token.
pub const SETTINGS_NAMESPACE: &str = "settings";

/// Field attributes that can be localized.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const TOOLTIP: &str = "tooltip";
    pub const DATA_SOURCE: &str = "dataSource";
    pub const PLACEHOLDER: &str = "placeholder";
}

/// Builds lookup tokens.
pub struct MessageToken;

impl MessageToken {
    /// `settings.<path>` or `settings.<path>.<key>`.
    pub fn settings(path: &FieldPath, key: Option<&str>) -> String {
        let mut token = String::from(SETTINGS_NAMESPACE);
        if !path.is_root() {
            token.push('.');
            token.push_str(&path.to_string());
        }
        if let Some(key) = key {
            token.push('.');
            token.push_str(key);
        }
        token
    }

    /// A token that is already fully qualified.
    pub fn verbatim(token: &str) -> String {
        token.to_owned()
    }
}

/// A resolved message.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Text(String),
    /// A label that carries its own selectable value.
    Labeled { label: Value, value: Value },
    /// Replacement option labels.
    List(Vec<Value>),
    /// A nested message group, e.g. the whole `{ title, tooltip }` block of a field.
    Group(Map<String, Value>),
}

impl Message {
    /// Falsy values resolve to no message.
    pub fn from_value(value: Value) -> Option<Message> {
        if !is_truthy(&value) {
            return None;
        }
        Some(match value {
            Value::String(text) => Message::Text(text),
            Value::Array(items) => Message::List(items),
            Value::Object(mut map) => match map.remove("label") {
                Some(label) => Message::Labeled {
                    label,
                    value: map.remove("value").unwrap_or(Value::Null),
                },
                None => Message::Group(map),
            },
            other => Message::Text(other.to_string()),
        })
    }

    /// Display text, if this message has one.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Message::Text(text) => Some(text.clone()),
            Message::Labeled { label, .. } => match label {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            },
            Message::List(_) | Message::Group(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Message::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Message::Text(text) => Value::String(text.clone()),
            Message::Labeled { label, value } => {
                let mut map = Map::new();
                map.insert("label".into(), label.clone());
                map.insert("value".into(), value.clone());
                Value::Object(map)
            }
            Message::List(items) => Value::Array(items.clone()),
            Message::Group(map) => Value::Object(map.clone()),
        }
    }
}

/// Resolves tokens against a node's own messages, then the global registry.
pub struct MessageResolver {
    node: Rc<dyn DesignNode>,
    registry: Rc<dyn MessageRegistry>,
}

impl MessageResolver {
    pub fn new(node: Rc<dyn DesignNode>, registry: Rc<dyn MessageRegistry>) -> Self {
        Self { node, registry }
    }

    /// First truthy hit wins; `None` means "leave the field as it is".
    pub fn resolve(&self, token: &str) -> Option<Message> {
        let message = self
            .node
            .message(token)
            .and_then(Message::from_value)
            .or_else(|| self.registry.designer_message(token).and_then(Message::from_value));
        if message.is_none() {
            log::trace!("no message for {token}");
        }
        message
    }

    pub fn take(&self, path: &FieldPath, key: Option<&str>) -> Option<Message> {
        self.resolve(&MessageToken::settings(path, key))
    }

    pub fn take_path(&self, token: &str) -> Option<Message> {
        self.resolve(&MessageToken::verbatim(token))
    }
}

/// Message lookup bound to one field's normalized path, handed to the field
/// so nested widgets can issue their own lookups.
#[derive(Clone)]
pub struct FieldMessages {
    resolver: Rc<MessageResolver>,
    path: FieldPath,
}

impl FieldMessages {
    pub fn new(resolver: Rc<MessageResolver>, path: FieldPath) -> Self {
        Self { resolver, path }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// `settings.<path>[.<key>]`.
    pub fn take(&self, key: Option<&str>) -> Option<Message> {
        self.resolver.take(&self.path, key)
    }

    /// A fully qualified token, used as is.
    pub fn take_path(&self, token: &str) -> Option<Message> {
        self.resolver.take_path(token)
    }
}

impl PartialEq for FieldMessages {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resolver, &other.resolver) && self.path == other.path
    }
}

impl fmt::Debug for FieldMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMessages")
            .field("path", &self.path.to_string())
            .finish()
    }
}
