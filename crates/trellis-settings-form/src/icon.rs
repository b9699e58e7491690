//! Pattern sniffing on message text.
//!
//! Two formats carry meaning beyond plain text:
//! - `@name` or `@name: tooltip` anywhere in a label marks an icon reference.
//! - a component prop whose whole value is `${token}` is a message lookup.
//!
//! Neither format has an escape, so text that happens to match is always
//! treated as the special form.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconRef {
    pub name: String,
    pub tooltip: Option<String>,
}

fn icon_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"@([^:\s]+)(?:\s*:\s*([\s\S]+))?").expect("icon pattern is valid")
    })
}

fn interpolation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$\{(.+)\}$").expect("interpolation pattern is valid"))
}

/// Finds an icon reference in `message`. Only strings can carry one.
pub fn extract_icon(message: &Value) -> Option<IconRef> {
    extract_icon_str(message.as_str()?)
}

pub fn extract_icon_str(message: &str) -> Option<IconRef> {
    let captures = icon_pattern().captures(message)?;
    let name = captures.get(1)?.as_str().to_owned();
    let tooltip = captures
        .get(2)
        .map(|tooltip| tooltip.as_str().trim().to_owned())
        .filter(|tooltip| !tooltip.is_empty());
    Some(IconRef { name, tooltip })
}

/// Returns the trimmed token inside a `${...}` template.
pub fn extract_interpolation(text: &str) -> Option<&str> {
    let captures = interpolation_pattern().captures(text)?;
    Some(captures.get(1)?.as_str().trim())
}
