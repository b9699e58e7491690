use serde_json::{json, Map, Value};
use std::rc::Rc;
use trellis_core::{
    DesignNode, GlobalRegistry, NodeId, OperationHistory, TreeNode, Workbench, Workspace,
};

/// Unwraps a `json!({...})` literal into its map.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Settings schema covering plain, enumerated, void-grouped, templated and
/// array fields.
pub fn sample_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "x-decorator": "FormItem",
                "x-component": "Input"
            },
            "size": {
                "type": "string",
                "x-decorator": "FormItem",
                "x-component": "Select",
                "enum": [
                    { "label": "Large", "value": "large" },
                    { "label": "Small", "value": "small" }
                ]
            },
            "style-group": {
                "type": "void",
                "x-component": "CollapseItem",
                "x-component-props": { "tab": "${settings.style-group.tab}" },
                "properties": {
                    "color": {
                        "type": "string",
                        "x-decorator": "FormItem",
                        "x-component": "ColorInput"
                    }
                }
            },
            "list": {
                "type": "array",
                "x-component": "ArrayTable",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "x-decorator": "FormItem",
                            "x-component": "Input"
                        }
                    }
                }
            }
        }
    })
}

/// English and Chinese packages matching [`sample_schema`].
pub fn sample_locales() -> Value {
    json!({
        "en-US": {
            "settings": {
                "title": {
                    "title": "Title",
                    "description": "Heading text for the card",
                    "tooltip": "Shown above the component",
                    "placeholder": "Enter a title"
                },
                "size": {
                    "title": "Size",
                    "dataSource": ["Big", "@compact: Compact layout"]
                },
                "style-group": { "title": "Style", "tab": "Appearance" },
                "color": "Color",
                "list": {
                    "title": "Rows",
                    "name": { "title": "Row name" }
                }
            }
        },
        "zh-CN": {
            "settings": {
                "title": { "title": "标题" },
                "size": { "title": "尺寸", "dataSource": ["大", "小"] },
                "style-group": { "title": "样式", "tab": "外观" },
                "list": { "name": { "title": "行名称" } }
            }
        }
    })
}

pub fn registry_with_locales(packages: &Value) -> Rc<GlobalRegistry> {
    let registry = Rc::new(GlobalRegistry::new());
    registry.register_designer_locales(packages);
    registry
}

/// Builder for [`TreeNode`]s used across tests.
pub struct NodeFixture {
    node: TreeNode,
}

impl NodeFixture {
    pub fn new(id: &str) -> Self {
        Self {
            node: TreeNode::new(id),
        }
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.node = self.node.with_schema(schema);
        self
    }

    pub fn shared_schema(mut self, schema: Rc<Value>) -> Self {
        self.node = self.node.with_shared_schema(schema);
        self
    }

    pub fn props(mut self, props: Value) -> Self {
        self.node = self.node.with_props(object(props));
        self
    }

    pub fn defaults(mut self, defaults: Value) -> Self {
        self.node = self.node.with_default_props(object(defaults));
        self
    }

    pub fn locales(mut self, packages: &Value, registry: &Rc<GlobalRegistry>) -> Self {
        self.node = self.node.with_locales(packages, Rc::clone(registry));
        self
    }

    pub fn build(self) -> Rc<dyn DesignNode> {
        Rc::new(self.node)
    }
}

/// Workspace holding `nodes` with `selected` as its selection.
pub fn selected_workspace(
    id: &str,
    nodes: &[Rc<dyn DesignNode>],
    selected: &[&str],
) -> (Rc<Workspace>, Rc<OperationHistory>) {
    let history = Rc::new(OperationHistory::new());
    let workspace = Rc::new(Workspace::new(id, history.clone()));
    for node in nodes {
        workspace.add_node(Rc::clone(node));
    }
    workspace.select(selected.iter().map(|id| NodeId::from(*id)));
    (workspace, history)
}

pub fn workbench_for(workspace: &Rc<Workspace>) -> Workbench {
    let mut workbench = Workbench::new();
    workbench.add_workspace(Rc::clone(workspace));
    workbench
}
