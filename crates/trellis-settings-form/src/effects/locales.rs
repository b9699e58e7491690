use crate::field::Field;
use crate::form::Form;
use crate::icon::extract_interpolation;
use crate::message::{keys, FieldMessages, Message, MessageResolver};
use crate::options::localize_options;
use crate::reaction::FieldPattern;
use serde_json::Value;
use std::rc::Rc;
use trellis_core::{DesignNode, MessageRegistry};

/// Localizes every field of `form`, now and on every later pass.
pub fn use_locales(form: &mut Form, node: Rc<dyn DesignNode>, registry: Rc<dyn MessageRegistry>) {
    let resolver = Rc::new(MessageResolver::new(node, registry));
    form.on_field_react(FieldPattern::All, move |field| localize_field(field, &resolver));
}

/// One localization pass over `field`. Safe to repeat: every write
/// overwrites, and a message that does not resolve leaves the field alone.
pub fn localize_field(field: &mut Field, resolver: &Rc<MessageResolver>) {
    let path = field.path().normalized();
    log::trace!("localizing {} as {}", field.address(), path);

    let title = resolver
        .take(&path, Some(keys::TITLE))
        .or_else(|| resolver.take(&path, None));
    let description = resolver.take(&path, Some(keys::DESCRIPTION));
    let tooltip = resolver.take(&path, Some(keys::TOOLTIP));
    let data_source = resolver.take(&path, Some(keys::DATA_SOURCE));
    let placeholder = resolver.take(&path, Some(keys::PLACEHOLDER));

    if field.component().has_props() {
        interpolate_component_props(field, resolver);
    }
    field.set_messages(FieldMessages::new(Rc::clone(resolver), path));

    if let Some(text) = title.as_ref().and_then(Message::as_text) {
        field.set_title(text);
    }
    if let Some(text) = description.as_ref().and_then(Message::as_text) {
        field.set_description(text);
    }
    if let Some(tooltip) = tooltip {
        field.decorator_mut().set_prop(keys::TOOLTIP, tooltip.to_value());
    }
    if let Some(placeholder) = placeholder {
        field.component_mut().set_prop(keys::PLACEHOLDER, placeholder.to_value());
    }
    if !field.is_void() {
        let localized = data_source.as_ref().and_then(Message::as_list);
        let options = localize_options(field.authored_data_source(), localized);
        field.set_localized_data_source(options);
    }
}

// `${token}` props resolve `token` as a fully qualified lookup. The template
// is remembered so later passes resolve it again after the language changed.
fn interpolate_component_props(field: &mut Field, resolver: &MessageResolver) {
    let Some(props) = field.component().props() else {
        return;
    };
    let mut templates: Vec<(String, String)> = Vec::new();
    for (key, value) in props {
        if let Some(template) = field.prop_templates().get(key) {
            templates.push((key.clone(), template.clone()));
        } else if let Value::String(text) = value {
            if extract_interpolation(text).is_some() {
                templates.push((key.clone(), text.clone()));
            }
        }
    }

    for (key, template) in templates {
        field.remember_prop_template(&key, &template);
        let Some(token) = extract_interpolation(&template) else {
            continue;
        };
        let Some(text) = resolver.take_path(token).as_ref().and_then(Message::as_text) else {
            continue;
        };
        field
            .component_mut()
            .set_prop(&key, Value::String(text.trim().to_owned()));
    }
}
