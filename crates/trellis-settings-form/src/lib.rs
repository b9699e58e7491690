//! Schema-driven settings form for the selected design-tree node.
//!
//! A [`SettingsForm`] watches the focused workspace. When exactly one node
//! with a settings schema is selected it builds a [`Form`] bound to the
//! node's live props, localizes every field through the node's own messages
//! and the global registry, and hands the renderer a [`SettingsView`].

mod config;
mod debounce;
pub mod effects;
mod error;
mod field;
mod form;
pub mod icon;
mod lifecycle;
pub mod message;
pub mod options;
mod path;
mod reaction;
mod schema;
mod settings_form;

pub use config::{Align, FeedbackLayout, FormLayout, SettingsFormOptions, TooltipLayout};
pub use debounce::Debouncer;
pub use effects::{localize_field, use_locales, use_snapshot, FormEffect};
pub use error::FormError;
pub use field::{Field, FieldKind, FieldProps, Slot};
pub use form::{AppInfo, Form, FormHandle, FormId};
pub use icon::{extract_icon, extract_icon_str, extract_interpolation, IconRef};
pub use lifecycle::{build_form, FormContext, FormKey, FormLifecycle};
pub use message::{keys, FieldMessages, Message, MessageResolver, MessageToken};
pub use options::{
    filter_falsy, localize_options, DataSourceEntry, OptionItem, OptionLabel, UNKNOWN_LABEL,
};
pub use path::FieldPath;
pub use reaction::{FieldPattern, FieldReaction, InputListener};
pub use schema::{Props, Schema, SchemaType};
pub use settings_form::{should_render_form, SettingsForm, SettingsView};
