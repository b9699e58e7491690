//! The settings panel: picks the node to edit, keeps its form alive and
//! paces re-renders through idle time.

use crate::config::{FormLayout, SettingsFormOptions};
use crate::debounce::Debouncer;
use crate::effects::FormEffect;
use crate::form::{AppInfo, Form, FormHandle, FormId};
use crate::lifecycle::{FormContext, FormKey, FormLifecycle};
use std::rc::Rc;
use trellis_core::{
    DesignNode, IdleScheduler, MessageRegistry, NodeId, SubscriptionId, Workbench, Workspace,
    WorkspaceId,
};

/// A form is shown only for exactly one selected node that carries a schema.
pub fn should_render_form(selected: &[NodeId], node: Option<&dyn DesignNode>) -> bool {
    selected.len() == 1 && node.is_some_and(|node| node.designer_props().props_schema.is_some())
}

#[derive(Clone, Debug)]
pub enum SettingsView {
    /// Nothing to edit: no workspace, no single selection, or no schema.
    Empty,
    Active {
        workspace_id: WorkspaceId,
        node_id: NodeId,
        form: FormHandle,
        layout: FormLayout,
    },
}

impl SettingsView {
    pub fn is_empty(&self) -> bool {
        matches!(self, SettingsView::Empty)
    }

    pub fn form(&self) -> Option<&FormHandle> {
        match self {
            SettingsView::Active { form, .. } => Some(form),
            SettingsView::Empty => None,
        }
    }
}

pub struct SettingsForm {
    options: SettingsFormOptions,
    context: FormContext,
    render_debouncer: Rc<Debouncer>,
    lifecycle: FormLifecycle,
    app_info: Option<AppInfo>,
    // Registry revision the current form was last localized against.
    localized: Option<(FormId, u64)>,
}

impl SettingsForm {
    pub fn new(
        registry: Rc<dyn MessageRegistry>,
        scheduler: Rc<dyn IdleScheduler>,
        options: SettingsFormOptions,
    ) -> Self {
        let render_debouncer = Rc::new(Debouncer::new(Rc::clone(&scheduler), options.idle_timeout()));
        let snapshot_debouncer = Rc::new(Debouncer::new(scheduler, options.snapshot_delay()));
        Self {
            options,
            context: FormContext {
                registry,
                snapshot_debouncer,
                effects: Vec::new(),
            },
            render_debouncer,
            lifecycle: FormLifecycle::new(),
            app_info: None,
            localized: None,
        }
    }

    /// Adds an effect run on every form this panel builds.
    pub fn with_effect(mut self, effect: impl Fn(&mut Form) + 'static) -> Self {
        let effect: FormEffect = Rc::new(effect);
        self.context.effects.push(effect);
        self
    }

    pub fn options(&self) -> &SettingsFormOptions {
        &self.options
    }

    pub fn app_info(&self) -> Option<&AppInfo> {
        self.app_info.as_ref()
    }

    /// Takes effect on the next render, which builds a new form.
    pub fn set_app_info(&mut self, app_info: Option<AppInfo>) {
        self.app_info = app_info;
    }

    pub fn form(&self) -> Option<&FormHandle> {
        self.lifecycle.current()
    }

    /// Resolves what the panel shows for the focused workspace.
    pub fn render(&mut self, workbench: &Workbench) -> SettingsView {
        let Some(workspace) = workbench.focused_workspace() else {
            return self.render_empty();
        };
        let selected = workspace.selected();
        let node = workspace.current_node();
        let node = match node {
            Some(node) if should_render_form(&selected, Some(node.as_ref())) => node,
            _ => return self.render_empty(),
        };

        let key = FormKey::new(Rc::clone(&node), Some(workspace.operation()), self.app_info.clone());
        let form = match self.lifecycle.form_for(key, &self.context) {
            Ok(form) => form,
            Err(error) => {
                log::error!("cannot build settings form for node {}: {error}", node.id());
                return self.render_empty();
            }
        };
        self.sync_locale(&form);

        SettingsView::Active {
            workspace_id: workspace.id().clone(),
            node_id: node.id().clone(),
            form,
            layout: self.options.layout.clone(),
        }
    }

    /// Defers `update` to idle time, replacing any update still pending.
    pub fn schedule_update(&self, update: impl FnOnce() + 'static) {
        self.render_debouncer.schedule(update);
    }

    /// Turns every change notification of `workspace` into a debounced call
    /// of `on_update`. Notifications arriving after this panel is dropped
    /// are ignored.
    pub fn observe(&self, workspace: &Workspace, on_update: impl Fn() + 'static) -> SubscriptionId {
        let debouncer = Rc::downgrade(&self.render_debouncer);
        let on_update: Rc<dyn Fn()> = Rc::new(on_update);
        workspace.subscribe(move || {
            let Some(debouncer) = debouncer.upgrade() else {
                return;
            };
            let on_update = Rc::clone(&on_update);
            debouncer.schedule(move || on_update());
        })
    }

    pub fn is_update_pending(&self) -> bool {
        self.render_debouncer.is_pending()
    }

    fn render_empty(&mut self) -> SettingsView {
        self.lifecycle.clear();
        self.localized = None;
        SettingsView::Empty
    }

    // Fields are localized at mount; a later language or locale change only
    // shows up after every field is revisited.
    fn sync_locale(&mut self, form: &FormHandle) {
        let revision = self.context.registry.revision();
        match self.localized {
            Some((id, seen)) if id == form.id() && seen != revision => {
                log::debug!("locale revision {seen} -> {revision}, refreshing form");
                form.borrow_mut().refresh();
            }
            _ => {}
        }
        self.localized = Some((form.id(), revision));
    }
}
