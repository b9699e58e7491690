//! Design-tree nodes as seen by the settings panel.

use crate::locale::{GlobalRegistry, LocaleTable};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Live property bag of a node. Forms bind to it directly, so edits made
/// through a form land on the node.
pub type SharedProps = Rc<RefCell<Map<String, Value>>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Rc<str>);

impl NodeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Rc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Designer-facing metadata attached to a node's component.
#[derive(Clone, Debug, Default)]
pub struct DesignerProps {
    /// Declarative settings schema. Identity matters: a new `Rc` means a new
    /// schema even if the contents compare equal.
    pub props_schema: Option<Rc<Value>>,
    /// Initial values for the settings form.
    pub default_props: Map<String, Value>,
}

pub trait DesignNode {
    fn id(&self) -> &NodeId;

    fn props(&self) -> SharedProps;

    fn designer_props(&self) -> &DesignerProps;

    /// Node-local message lookup, consulted before the global registry.
    fn message(&self, token: &str) -> Option<Value>;
}

/// In-memory [`DesignNode`].
pub struct TreeNode {
    id: NodeId,
    props: SharedProps,
    designer_props: DesignerProps,
    locales: LocaleTable,
    registry: Option<Rc<GlobalRegistry>>,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            props: Rc::new(RefCell::new(Map::new())),
            designer_props: DesignerProps::default(),
            locales: LocaleTable::new(),
            registry: None,
        }
    }

    pub fn with_props(self, props: Map<String, Value>) -> Self {
        *self.props.borrow_mut() = props;
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.designer_props.props_schema = Some(Rc::new(schema));
        self
    }

    pub fn with_shared_schema(mut self, schema: Rc<Value>) -> Self {
        self.designer_props.props_schema = Some(schema);
        self
    }

    pub fn with_default_props(mut self, defaults: Map<String, Value>) -> Self {
        self.designer_props.default_props = defaults;
        self
    }

    /// Attaches component-level locale packages. Lookups follow the
    /// registry's active language.
    pub fn with_locales(mut self, packages: &Value, registry: Rc<GlobalRegistry>) -> Self {
        self.locales.merge(packages);
        self.registry = Some(registry);
        self
    }

    /// Swaps the whole property bag, which gives the node a new props identity.
    pub fn replace_props(&mut self, props: Map<String, Value>) {
        self.props = Rc::new(RefCell::new(props));
    }
}

impl DesignNode for TreeNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn props(&self) -> SharedProps {
        Rc::clone(&self.props)
    }

    fn designer_props(&self) -> &DesignerProps {
        &self.designer_props
    }

    fn message(&self, token: &str) -> Option<Value> {
        let registry = self.registry.as_ref()?;
        registry.message_in(&self.locales, token)
    }
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.id)
            .field("has_schema", &self.designer_props.props_schema.is_some())
            .field("languages", &self.locales.languages())
            .finish()
    }
}
