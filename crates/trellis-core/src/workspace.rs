//! Workspaces own the node set, the selection and the operation recorder.

use crate::collections::map::HashMap;
use crate::node::{DesignNode, NodeId};
use crate::operation::Operation;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkspaceId(Rc<str>);

impl WorkspaceId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Rc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkspaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn() + 'static>;

pub struct Workspace {
    id: WorkspaceId,
    nodes: RefCell<HashMap<NodeId, Rc<dyn DesignNode>>>,
    selection: RefCell<Vec<NodeId>>,
    operation: Rc<dyn Operation>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

impl Workspace {
    pub fn new(id: impl Into<WorkspaceId>, operation: Rc<dyn Operation>) -> Self {
        Self {
            id: id.into(),
            nodes: RefCell::new(HashMap::default()),
            selection: RefCell::new(Vec::new()),
            operation,
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn operation(&self) -> Rc<dyn Operation> {
        Rc::clone(&self.operation)
    }

    /// Registers `node`, replacing any node with the same id.
    pub fn add_node(&self, node: Rc<dyn DesignNode>) {
        let id = node.id().clone();
        self.nodes.borrow_mut().insert(id, node);
        self.notify();
    }

    pub fn remove_node(&self, id: &NodeId) -> Option<Rc<dyn DesignNode>> {
        let removed = self.nodes.borrow_mut().remove(id);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    pub fn node(&self, id: &NodeId) -> Option<Rc<dyn DesignNode>> {
        self.nodes.borrow().get(id).cloned()
    }

    pub fn select<I>(&self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        *self.selection.borrow_mut() = ids.into_iter().collect();
        self.notify();
    }

    pub fn selected(&self) -> Vec<NodeId> {
        self.selection.borrow().clone()
    }

    /// The node behind the first selected id, if it is registered.
    pub fn current_node(&self) -> Option<Rc<dyn DesignNode>> {
        let selection = self.selection.borrow();
        let nodes = self.nodes.borrow();
        selection.first().and_then(|id| nodes.get(id).cloned())
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    // Listeners are cloned out first so they can touch the workspace.
    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.id)
            .field("selection", &self.selection.borrow())
            .field("nodes", &self.nodes.borrow().len())
            .finish()
    }
}

#[derive(Default)]
pub struct Workbench {
    workspaces: Vec<Rc<Workspace>>,
    active: Option<WorkspaceId>,
    current: Option<WorkspaceId>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `workspace` and makes it current if nothing was current yet.
    pub fn add_workspace(&mut self, workspace: Rc<Workspace>) {
        if self.current.is_none() {
            self.current = Some(workspace.id().clone());
        }
        self.workspaces.push(workspace);
    }

    pub fn set_active(&mut self, id: Option<WorkspaceId>) {
        self.active = id;
    }

    pub fn set_current(&mut self, id: Option<WorkspaceId>) {
        self.current = id;
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<Rc<Workspace>> {
        self.workspaces.iter().find(|w| w.id() == id).cloned()
    }

    pub fn active_workspace(&self) -> Option<Rc<Workspace>> {
        self.active.as_ref().and_then(|id| self.workspace(id))
    }

    pub fn current_workspace(&self) -> Option<Rc<Workspace>> {
        self.current.as_ref().and_then(|id| self.workspace(id))
    }

    /// The workspace a settings panel follows: active first, then current.
    pub fn focused_workspace(&self) -> Option<Rc<Workspace>> {
        self.active_workspace().or_else(|| self.current_workspace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;
    use crate::operation::OperationHistory;

    fn workspace() -> Workspace {
        Workspace::new("main", Rc::new(OperationHistory::new()))
    }

    #[test]
    fn current_node_follows_first_selected_id() {
        let workspace = workspace();
        workspace.add_node(Rc::new(TreeNode::new("a")));
        workspace.add_node(Rc::new(TreeNode::new("b")));
        workspace.select(["b".into(), "a".into()]);

        let current = workspace.current_node().expect("b is registered");
        assert_eq!(current.id().as_str(), "b");
        assert_eq!(workspace.selected().len(), 2);

        workspace.select(["missing".into(), "a".into()]);
        assert!(workspace.current_node().is_none());
    }

    #[test]
    fn listeners_fire_until_unsubscribed() {
        let workspace = workspace();
        let hits = Rc::new(Cell::new(0));
        let id = workspace.subscribe({
            let hits = Rc::clone(&hits);
            move || hits.set(hits.get() + 1)
        });

        workspace.select(["a".into()]);
        workspace.add_node(Rc::new(TreeNode::new("a")));
        assert_eq!(hits.get(), 2);

        workspace.unsubscribe(id);
        workspace.select(Vec::new());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn focused_workspace_prefers_active() {
        let mut workbench = Workbench::new();
        workbench.add_workspace(Rc::new(workspace()));
        workbench.add_workspace(Rc::new(Workspace::new(
            "side",
            Rc::new(OperationHistory::new()),
        )));
        assert_eq!(workbench.focused_workspace().unwrap().id().as_str(), "main");

        workbench.set_active(Some("side".into()));
        assert_eq!(workbench.focused_workspace().unwrap().id().as_str(), "side");

        workbench.set_active(Some("gone".into()));
        assert_eq!(workbench.focused_workspace().unwrap().id().as_str(), "main");
    }
}
