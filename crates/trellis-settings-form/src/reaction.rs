//! Field selectors and the reactions registered against them.

use crate::error::FormError;
use crate::field::Field;
use crate::path::FieldPath;
use serde_json::Value;
use std::rc::Rc;

/// Runs against a field whenever it is mounted or marked dirty.
pub type FieldReaction = Rc<dyn Fn(&mut Field) + 'static>;

/// Runs after a user edit has been written to the form values.
pub type InputListener = Rc<dyn Fn(&Field, &Value) + 'static>;

/// `*` selects every field, `a.b.*` everything below `a.b`, anything else
/// one exact address or data path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldPattern {
    All,
    Exact(FieldPath),
    Descendants(FieldPath),
}

impl FieldPattern {
    pub fn parse(pattern: &str) -> Result<FieldPattern, FormError> {
        if pattern == "*" {
            return Ok(FieldPattern::All);
        }
        if let Some(prefix) = pattern.strip_suffix(".*") {
            return Ok(FieldPattern::Descendants(FieldPath::parse(prefix)?));
        }
        if pattern.contains('*') {
            return Err(FormError::InvalidPath(pattern.to_owned()));
        }
        Ok(FieldPattern::Exact(FieldPath::parse(pattern)?))
    }

    pub fn matches(&self, field: &Field) -> bool {
        self.matches_path(field.address()) || self.matches_path(field.path())
    }

    fn matches_path(&self, path: &FieldPath) -> bool {
        match self {
            FieldPattern::All => true,
            FieldPattern::Exact(exact) => path == exact,
            FieldPattern::Descendants(prefix) => path != prefix && path.starts_with(prefix),
        }
    }
}

pub(crate) struct ReactionEntry {
    pub(crate) pattern: FieldPattern,
    pub(crate) reaction: FieldReaction,
}

pub(crate) struct InputListenerEntry {
    pub(crate) pattern: FieldPattern,
    pub(crate) listener: InputListener,
}
