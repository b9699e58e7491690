//! Locale packages and the process-wide designer message registry.

use crate::collections::map::HashMap;
use crate::value::{deep_merge, get_in};
use serde_json::Value;
use std::cell::{Cell, RefCell};

pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Looks up designer messages by dotted token.
pub trait MessageRegistry {
    fn designer_message(&self, token: &str) -> Option<Value>;

    /// Bumped whenever lookups may start returning different values.
    fn revision(&self) -> u64 {
        0
    }
}

/// Message trees keyed by lowercase language tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTable {
    languages: HashMap<String, Value>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a `{ "<language>": <tree> }` package.
    pub fn from_packages(packages: &Value) -> Self {
        let mut table = Self::new();
        table.merge(packages);
        table
    }

    /// Deep-merges a `{ "<language>": <tree> }` package into the table.
    /// Non-object packages are ignored.
    pub fn merge(&mut self, packages: &Value) {
        let Value::Object(packages) = packages else {
            log::warn!("ignoring locale package that is not an object");
            return;
        };
        for (language, tree) in packages {
            let slot = self
                .languages
                .entry(language.to_lowercase())
                .or_insert_with(|| Value::Object(Default::default()));
            deep_merge(slot, tree);
        }
    }

    /// Registered languages in sorted order.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn lookup(&self, language: &str, token: &str) -> Option<&Value> {
        let tree = self.tree_for(language)?;
        let segments: Vec<&str> = token.split('.').collect();
        get_in(tree, &segments)
    }

    fn tree_for(&self, language: &str) -> Option<&Value> {
        let language = language.to_lowercase();
        if let Some(tree) = self.languages.get(&language) {
            return Some(tree);
        }
        // `zh` matches `zh-cn` and the other way round.
        self.languages()
            .into_iter()
            .find(|candidate| candidate.contains(language.as_str()) || language.contains(candidate))
            .and_then(|candidate| self.languages.get(candidate))
    }
}

/// Registry of designer locale packages plus the active language.
pub struct GlobalRegistry {
    locales: RefCell<LocaleTable>,
    language: RefCell<String>,
    revision: Cell<u64>,
}

impl Default for GlobalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self {
            locales: RefCell::new(LocaleTable::new()),
            language: RefCell::new(DEFAULT_LANGUAGE.to_owned()),
            revision: Cell::new(0),
        }
    }

    pub fn register_designer_locales(&self, packages: &Value) {
        self.locales.borrow_mut().merge(packages);
        self.bump();
    }

    pub fn set_designer_language(&self, language: &str) {
        let language = language.to_lowercase();
        if *self.language.borrow() == language {
            return;
        }
        log::debug!("designer language changed to {language}");
        *self.language.borrow_mut() = language;
        self.bump();
    }

    pub fn designer_language(&self) -> String {
        self.language.borrow().clone()
    }

    /// Resolves `token` against an arbitrary table using the active language.
    pub fn message_in(&self, table: &LocaleTable, token: &str) -> Option<Value> {
        table.lookup(&self.language.borrow(), token).cloned()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }
}

impl MessageRegistry for GlobalRegistry {
    fn designer_message(&self, token: &str) -> Option<Value> {
        let locales = self.locales.borrow();
        self.message_in(&locales, token)
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}
