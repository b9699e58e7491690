use crate::error::FormError;
use smallvec::SmallVec;
use std::fmt;

/// Dotted position of a field, e.g. `list.2.name`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 4]>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a dotted path. The empty string is the root; empty segments
    /// (`a..b`, `.a`) are rejected.
    pub fn parse(path: &str) -> Result<Self, FormError> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = SmallVec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(FormError::InvalidPath(path.to_owned()));
            }
            segments.push(segment.to_owned());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    pub fn child(&self, segment: impl Into<String>) -> FieldPath {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// True when `self` equals `prefix` or lies below it.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments.iter().zip(prefix.segments.iter()).all(|(a, b)| a == b)
    }

    /// Drops purely numeric segments so every element of a repeated group
    /// shares one localization key: `list.2.name` becomes `list.name`.
    pub fn normalized(&self) -> FieldPath {
        let segments = self
            .segments
            .iter()
            .filter(|segment| !is_index(segment))
            .cloned()
            .collect();
        Self { segments }
    }
}

pub(crate) fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
