//! One form per (node, props, schema, operation, app info) combination.

use crate::debounce::Debouncer;
use crate::effects::{use_locales, use_snapshot, FormEffect};
use crate::error::FormError;
use crate::form::{AppInfo, Form, FormHandle};
use crate::schema::Schema;
use serde_json::Value;
use std::rc::Rc;
use trellis_core::{DesignNode, MessageRegistry, Operation, SharedProps};

fn same_rc<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

fn same_option_rc<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_rc(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Memo key of a settings form. Identities are compared by pointer: a new
/// props bag or schema `Rc` means a new form even if the contents match.
#[derive(Clone)]
pub struct FormKey {
    node: Rc<dyn DesignNode>,
    props: SharedProps,
    schema: Option<Rc<Value>>,
    operation: Option<Rc<dyn Operation>>,
    app_info: Option<AppInfo>,
}

impl FormKey {
    pub fn new(
        node: Rc<dyn DesignNode>,
        operation: Option<Rc<dyn Operation>>,
        app_info: Option<AppInfo>,
    ) -> Self {
        let props = node.props();
        let schema = node.designer_props().props_schema.clone();
        Self {
            node,
            props,
            schema,
            operation,
            app_info,
        }
    }

    pub fn node(&self) -> &Rc<dyn DesignNode> {
        &self.node
    }

    /// A node without a schema gets an empty form.
    pub fn is_empty(&self) -> bool {
        self.schema.is_none()
    }

    fn same(&self, other: &FormKey) -> bool {
        same_rc(&self.node, &other.node)
            && same_rc(&self.props, &other.props)
            && same_option_rc(&self.schema, &other.schema)
            && same_option_rc(&self.operation, &other.operation)
            && self.app_info == other.app_info
    }
}

/// What every form built by a panel shares.
#[derive(Clone)]
pub struct FormContext {
    pub registry: Rc<dyn MessageRegistry>,
    pub snapshot_debouncer: Rc<Debouncer>,
    pub effects: Vec<FormEffect>,
}

/// Builds a form bound to the node's live props, with the node's default
/// props as initial values. Effects are installed before the schema is
/// mounted so every field passes through them.
pub fn build_form(key: &FormKey, context: &FormContext) -> Result<FormHandle, FormError> {
    let node = &key.node;
    let schema = key.schema.as_deref().map(Schema::from_value).transpose()?;

    let mut form = Form::new(node.designer_props().default_props.clone(), Rc::clone(&key.props));
    form.set_app_info(key.app_info.clone());
    use_locales(&mut form, Rc::clone(node), Rc::clone(&context.registry));
    use_snapshot(
        &mut form,
        key.operation.clone(),
        Rc::clone(&context.snapshot_debouncer),
    );
    for effect in &context.effects {
        effect(&mut form);
    }
    if let Some(schema) = schema {
        form.mount_schema(Rc::new(schema))?;
    }
    Ok(FormHandle::new(form))
}

/// Holds the form for the most recent key and rebuilds it when the key
/// changes. In-flight edits of a replaced form are not carried over.
#[derive(Default)]
pub struct FormLifecycle {
    current: Option<(FormKey, FormHandle)>,
}

impl FormLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form_for(&mut self, key: FormKey, context: &FormContext) -> Result<FormHandle, FormError> {
        if let Some((cached, form)) = &self.current {
            if cached.same(&key) {
                return Ok(form.clone());
            }
        }
        self.current = None;
        log::debug!("building settings form for node {}", key.node.id());
        let form = build_form(&key, context)?;
        self.current = Some((key, form.clone()));
        Ok(form)
    }

    pub fn current(&self) -> Option<&FormHandle> {
        self.current.as_ref().map(|(_, form)| form)
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            log::debug!("settings form discarded");
        }
    }
}
