//! Form instance: mounted fields, bound values and reaction dispatch.
//!
//! Reactions are registered per field selector. A field is (re)visited by
//! every matching reaction when it is mounted and whenever it is marked
//! dirty: its value changed, its options or component props were replaced
//! from outside, or the whole form was refreshed. Mutations performed by
//! reactions themselves never mark anything dirty, so a pass cannot
//! re-trigger itself.

use crate::error::FormError;
use crate::field::{Field, FieldKind, FieldProps};
use crate::options::entries_from_values;
use crate::path::FieldPath;
use crate::reaction::{
    FieldPattern, FieldReaction, InputListener, InputListenerEntry, ReactionEntry,
};
use crate::schema::{Props, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use trellis_core::collections::map::HashSet;
use trellis_core::{get_in_map, set_in, SharedProps};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormId(usize);

static NEXT_FORM_ID: AtomicUsize = AtomicUsize::new(1);

fn next_form_id() -> FormId {
    FormId(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
}

/// Application identity made available to nested field widgets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl AppInfo {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            extra: BTreeMap::new(),
        }
    }
}

pub struct Form {
    id: FormId,
    schema: Option<Rc<Schema>>,
    fields: IndexMap<String, Field>,
    values: SharedProps,
    initial_values: Map<String, Value>,
    reactions: Vec<ReactionEntry>,
    input_listeners: Vec<InputListenerEntry>,
    dirty: HashSet<String>,
    app_info: Option<AppInfo>,
}

impl Form {
    /// `values` is bound, not copied: every write lands in the shared map.
    pub fn new(initial_values: Map<String, Value>, values: SharedProps) -> Self {
        Self {
            id: next_form_id(),
            schema: None,
            fields: IndexMap::new(),
            values,
            initial_values,
            reactions: Vec::new(),
            input_listeners: Vec::new(),
            dirty: HashSet::default(),
            app_info: None,
        }
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn app_info(&self) -> Option<&AppInfo> {
        self.app_info.as_ref()
    }

    pub fn set_app_info(&mut self, app_info: Option<AppInfo>) {
        self.app_info = app_info;
    }

    pub fn schema(&self) -> Option<&Rc<Schema>> {
        self.schema.as_ref()
    }

    /// Registers `reaction` for every current and future field matching
    /// `pattern` and runs it on the current ones.
    pub fn on_field_react(&mut self, pattern: FieldPattern, reaction: impl Fn(&mut Field) + 'static) {
        let reaction: FieldReaction = Rc::new(reaction);
        for field in self.fields.values_mut() {
            if pattern.matches(field) {
                reaction(field);
            }
        }
        self.reactions.push(ReactionEntry { pattern, reaction });
    }

    pub fn on_field_input_value_change(
        &mut self,
        pattern: FieldPattern,
        listener: impl Fn(&Field, &Value) + 'static,
    ) {
        let listener: InputListener = Rc::new(listener);
        self.input_listeners.push(InputListenerEntry { pattern, listener });
    }

    /// Mounts one field per schema node, depth first in document order.
    pub fn mount_schema(&mut self, schema: Rc<Schema>) -> Result<(), FormError> {
        self.schema = Some(Rc::clone(&schema));
        self.mount_properties(&schema, &FieldPath::root(), &FieldPath::root())
    }

    /// Creates a field and runs the matching reactions on it. An existing
    /// field at the same address is returned untouched.
    pub fn create_field(&mut self, props: FieldProps) -> Result<&Field, FormError> {
        let key = props.address.to_string();
        if !self.fields.contains_key(&key) {
            log::trace!("mounting field {key}");
            self.fields.insert(key.clone(), Field::new(props));
            self.run_reactions(&key);
        }
        self.fields.get(&key).ok_or(FormError::FieldNotFound(key))
    }

    pub fn field(&self, address: &str) -> Option<&Field> {
        self.fields.get(address)
    }

    pub fn field_by_path(&self, path: &FieldPath) -> Option<&Field> {
        self.fields
            .values()
            .find(|field| !field.is_void() && field.path() == path)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Live value at `path`, falling back to the initial values.
    pub fn value(&self, path: &FieldPath) -> Option<Value> {
        if path.is_root() {
            return Some(Value::Object(self.values.borrow().clone()));
        }
        let segments = path.segments();
        if let Some(value) = get_in_map(&self.values.borrow(), segments) {
            return Some(value.clone());
        }
        get_in_map(&self.initial_values, segments).cloned()
    }

    pub fn values(&self) -> Map<String, Value> {
        self.values.borrow().clone()
    }

    pub fn initial_values(&self) -> &Map<String, Value> {
        &self.initial_values
    }

    /// Writes `value` at `path` in the bound values and revisits the fields
    /// at or below it. Array fields below `path` remount their items.
    pub fn set_value(&mut self, path: &FieldPath, value: Value) -> Result<(), FormError> {
        if path.is_root() {
            return Err(FormError::InvalidPath(String::new()));
        }
        set_in(&mut self.values.borrow_mut(), path.segments(), value)?;

        let mut arrays: Vec<(FieldPath, FieldPath)> = Vec::new();
        for field in self.fields.values() {
            if field.kind() != FieldKind::Array || !field.path().starts_with(path) {
                continue;
            }
            // Nested arrays are remounted along with their outermost parent.
            if arrays.iter().any(|(outer, _)| field.address().starts_with(outer)) {
                continue;
            }
            arrays.push((field.address().clone(), field.path().clone()));
        }
        for (address, array_path) in arrays {
            self.remount_items(&address, &array_path)?;
        }

        let touched: Vec<String> = self
            .fields
            .iter()
            .filter(|(_, field)| !field.is_void() && field.path().starts_with(path))
            .map(|(key, _)| key.clone())
            .collect();
        self.dirty.extend(touched);
        self.flush();
        Ok(())
    }

    /// A user edit: writes the value, then notifies input listeners.
    pub fn input(&mut self, address: &str, value: Value) -> Result<(), FormError> {
        let field = self
            .fields
            .get(address)
            .ok_or_else(|| FormError::FieldNotFound(address.to_owned()))?;
        if field.is_void() {
            return Err(FormError::VoidField(address.to_owned()));
        }
        let path = field.path().clone();
        self.set_value(&path, value.clone())?;

        let Some(field) = self.fields.get(address) else {
            return Ok(());
        };
        let listeners: Vec<InputListener> = self
            .input_listeners
            .iter()
            .filter(|entry| entry.pattern.matches(field))
            .map(|entry| Rc::clone(&entry.listener))
            .collect();
        for listener in listeners {
            listener(field, &value);
        }
        Ok(())
    }

    /// Replaces a field's options from outside the reaction pipeline.
    pub fn set_data_source(&mut self, address: &str, options: Vec<Value>) -> Result<(), FormError> {
        let field = self.field_mut(address)?;
        field.set_data_source(Some(entries_from_values(options)));
        self.mark_dirty(address);
        Ok(())
    }

    /// Replaces a field's component props from outside the reaction pipeline.
    pub fn set_component_props(&mut self, address: &str, props: Option<Props>) -> Result<(), FormError> {
        let field = self.field_mut(address)?;
        field.replace_component_props(props);
        self.mark_dirty(address);
        Ok(())
    }

    /// Revisits every field, e.g. after the active language changed.
    pub fn refresh(&mut self) {
        let all: Vec<String> = self.fields.keys().cloned().collect();
        self.dirty.extend(all);
        self.flush();
    }

    pub fn push_array_item(&mut self, path: &FieldPath, item: Value) -> Result<(), FormError> {
        let mut items = self.array_items(path)?;
        items.push(item);
        self.set_value(path, Value::Array(items))
    }

    /// Removing past the end is a no-op.
    pub fn remove_array_item(&mut self, path: &FieldPath, index: usize) -> Result<(), FormError> {
        let mut items = self.array_items(path)?;
        if index >= items.len() {
            return Ok(());
        }
        items.remove(index);
        self.set_value(path, Value::Array(items))
    }

    fn array_items(&self, path: &FieldPath) -> Result<Vec<Value>, FormError> {
        let field = self
            .field_by_path(path)
            .ok_or_else(|| FormError::FieldNotFound(path.to_string()))?;
        if field.kind() != FieldKind::Array {
            return Err(FormError::NotArray(path.to_string()));
        }
        Ok(match self.value(path) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    fn field_mut(&mut self, address: &str) -> Result<&mut Field, FormError> {
        self.fields
            .get_mut(address)
            .ok_or_else(|| FormError::FieldNotFound(address.to_owned()))
    }

    fn mark_dirty(&mut self, address: &str) {
        self.dirty.insert(address.to_owned());
        self.flush();
    }

    // Dirty fields are visited in mount order.
    fn flush(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        let pending: Vec<String> = self
            .fields
            .keys()
            .filter(|key| self.dirty.contains(*key))
            .cloned()
            .collect();
        self.dirty.clear();
        for key in pending {
            self.run_reactions(&key);
        }
    }

    fn run_reactions(&mut self, key: &str) {
        let Some(field) = self.fields.get_mut(key) else {
            return;
        };
        for entry in &self.reactions {
            if entry.pattern.matches(field) {
                (entry.reaction)(field);
            }
        }
    }

    fn mount_properties(
        &mut self,
        schema: &Schema,
        address: &FieldPath,
        path: &FieldPath,
    ) -> Result<(), FormError> {
        for (name, child) in &schema.properties {
            if name.is_empty() || name.contains('.') {
                return Err(FormError::InvalidPath(format!("{address}.{name}")));
            }
            self.mount_field(child, address.child(name.as_str()), path.child(name.as_str()))?;
        }
        Ok(())
    }

    fn mount_field(
        &mut self,
        schema: &Schema,
        address: FieldPath,
        path: FieldPath,
    ) -> Result<(), FormError> {
        let kind = FieldKind::for_schema(schema);
        if kind != FieldKind::Void {
            self.seed_value(&path, schema)?;
        }
        self.create_field(FieldProps::from_schema(address.clone(), path.clone(), schema))?;

        // Void fields keep their own name out of their children's data path.
        let children_path = match kind {
            FieldKind::Void => path.parent().unwrap_or_default(),
            _ => path.clone(),
        };
        self.mount_properties(schema, &address, &children_path)?;
        if kind == FieldKind::Array {
            self.mount_items(schema, &address, &path)?;
        }
        Ok(())
    }

    // Copies the initial (or schema default) value into the live values when
    // the live values have nothing at `path` yet.
    fn seed_value(&mut self, path: &FieldPath, schema: &Schema) -> Result<(), FormError> {
        let segments = path.segments();
        if get_in_map(&self.values.borrow(), segments).is_some() {
            return Ok(());
        }
        let initial = get_in_map(&self.initial_values, segments)
            .cloned()
            .or_else(|| schema.default.clone());
        if let Some(initial) = initial {
            set_in(&mut self.values.borrow_mut(), segments, initial)?;
        }
        Ok(())
    }

    fn mount_items(
        &mut self,
        schema: &Schema,
        address: &FieldPath,
        path: &FieldPath,
    ) -> Result<(), FormError> {
        let Some(items) = schema.items.as_deref() else {
            return Ok(());
        };
        let len = match self.value(path) {
            Some(Value::Array(values)) => values.len(),
            _ => 0,
        };
        for index in 0..len {
            let segment = index.to_string();
            self.mount_field(items, address.child(segment.as_str()), path.child(segment))?;
        }
        Ok(())
    }

    fn remount_items(&mut self, address: &FieldPath, path: &FieldPath) -> Result<(), FormError> {
        self.fields
            .retain(|_, field| field.address() == address || !field.address().starts_with(address));
        let Some(root) = self.schema.clone() else {
            return Ok(());
        };
        match root.find(address) {
            Some(schema) => self.mount_items(schema, address, path),
            None => Ok(()),
        }
    }
}

/// Shared handle to a form. Cloning shares the instance.
#[derive(Clone)]
pub struct FormHandle {
    inner: Rc<RefCell<Form>>,
}

impl FormHandle {
    pub fn new(form: Form) -> Self {
        Self {
            inner: Rc::new(RefCell::new(form)),
        }
    }

    pub fn id(&self) -> FormId {
        self.inner.borrow().id()
    }

    pub fn borrow(&self) -> Ref<'_, Form> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Form> {
        self.inner.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &FormHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for FormHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(form) => f
                .debug_struct("FormHandle")
                .field("id", &form.id)
                .field("fields", &form.fields.len())
                .finish(),
            Err(_) => f.write_str("FormHandle(<borrowed>)"),
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
