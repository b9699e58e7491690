//! Effects installed on every settings form at construction.

mod locales;
mod snapshot;

pub use locales::{localize_field, use_locales};
pub use snapshot::use_snapshot;

use crate::form::Form;
use std::rc::Rc;

/// Caller-supplied setup run against a freshly constructed form, before its
/// schema is mounted.
pub type FormEffect = Rc<dyn Fn(&mut Form) + 'static>;
