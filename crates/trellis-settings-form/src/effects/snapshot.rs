use crate::debounce::Debouncer;
use crate::form::Form;
use crate::reaction::FieldPattern;
use std::rc::Rc;
use trellis_core::{Operation, UPDATE_NODE_PROPS};

/// Records a node-props snapshot after user edits, at most once per
/// debounce window. Without an operation recorder this does nothing.
pub fn use_snapshot(form: &mut Form, operation: Option<Rc<dyn Operation>>, debouncer: Rc<Debouncer>) {
    let Some(operation) = operation else {
        return;
    };
    form.on_field_input_value_change(FieldPattern::All, move |field, _| {
        log::trace!("input on {}, snapshot scheduled", field.address());
        let operation = Rc::clone(&operation);
        debouncer.schedule(move || operation.snapshot(UPDATE_NODE_PROPS));
    });
}
