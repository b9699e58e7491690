//! Option lists (`dataSource`) of choice fields and their localization.

use crate::icon::{extract_icon_str, IconRef};
use serde_json::{Map, Value};
use trellis_core::is_truthy;

/// Label used when neither localization nor the schema provides one.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Clone, Debug, PartialEq)]
pub enum OptionLabel {
    Text(String),
    Icon(IconRef),
    /// Any other JSON label, kept as authored.
    Value(Value),
}

impl OptionLabel {
    /// `null` is no label; strings are plain text until [`finalize_label`]
    /// decides otherwise.
    pub fn from_value(value: Value) -> Option<OptionLabel> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(OptionLabel::Text(text)),
            other => Some(OptionLabel::Value(other)),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            OptionLabel::Text(text) => Value::String(text.clone()),
            OptionLabel::Icon(icon) => {
                let mut map = Map::new();
                map.insert("icon".into(), Value::String(icon.name.clone()));
                if let Some(tooltip) = &icon.tooltip {
                    map.insert("tooltip".into(), Value::String(tooltip.clone()));
                }
                Value::Object(map)
            }
            OptionLabel::Value(value) => value.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionItem {
    /// Never absent: a missing `value` is `null`.
    pub value: Value,
    pub label: Option<OptionLabel>,
    /// Remaining keys of the authored entry, carried through relabeling.
    pub extra: Map<String, Value>,
}

impl OptionItem {
    pub fn new(value: Value, label: &str) -> Self {
        Self {
            value,
            label: Some(OptionLabel::Text(label.to_owned())),
            extra: Map::new(),
        }
    }
}

/// One entry of a field's option list as authored: either a `{value, label}`
/// object or a bare scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum DataSourceEntry {
    Item(OptionItem),
    Scalar(Value),
}

impl DataSourceEntry {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let value = map.remove("value").unwrap_or(Value::Null);
                let label = map.remove("label").and_then(OptionLabel::from_value);
                DataSourceEntry::Item(OptionItem {
                    value,
                    label,
                    extra: map,
                })
            }
            other => DataSourceEntry::Scalar(other),
        }
    }

    pub fn is_falsy(&self) -> bool {
        match self {
            DataSourceEntry::Item(_) => false,
            DataSourceEntry::Scalar(value) => !is_truthy(value),
        }
    }

    /// The option value; a bare scalar is its own value.
    pub fn value(&self) -> &Value {
        match self {
            DataSourceEntry::Item(item) => &item.value,
            DataSourceEntry::Scalar(value) => value,
        }
    }

    pub fn label(&self) -> Option<&OptionLabel> {
        match self {
            DataSourceEntry::Item(item) => item.label.as_ref(),
            DataSourceEntry::Scalar(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DataSourceEntry::Item(item) => {
                let mut map = item.extra.clone();
                map.insert("value".into(), item.value.clone());
                if let Some(label) = &item.label {
                    map.insert("label".into(), label.to_value());
                }
                Value::Object(map)
            }
            DataSourceEntry::Scalar(value) => value.clone(),
        }
    }
}

pub fn entries_from_values(values: impl IntoIterator<Item = Value>) -> Vec<DataSourceEntry> {
    values.into_iter().map(DataSourceEntry::from_value).collect()
}

/// Drops falsy entries, leaving labels untouched.
pub fn filter_falsy(entries: &[DataSourceEntry]) -> Vec<DataSourceEntry> {
    entries.iter().filter(|entry| !entry.is_falsy()).cloned().collect()
}

/// Rewrites an option list with localized labels.
///
/// - No localized labels: existing entries minus falsy ones.
/// - Existing entries: one option per entry, same order and value; the label
///   comes from `localized[index]`, then `localized[value]` when the value is
///   an index, then the authored label.
/// - No existing entries: the localized list becomes the option list, each
///   entry shaped the way a relabel would shape it, so localizing the result
///   again changes nothing.
///
/// `None` in, `None` out when there is nothing to localize.
pub fn localize_options(
    existing: Option<&[DataSourceEntry]>,
    localized: Option<&[Value]>,
) -> Option<Vec<DataSourceEntry>> {
    let localized = localized.filter(|labels| !labels.is_empty());
    let Some(localized) = localized else {
        return existing.map(filter_falsy);
    };
    match existing {
        Some(entries) if !entries.is_empty() => Some(
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| relabel(entry, index, localized))
                .collect(),
        ),
        _ => Some(localized.iter().filter_map(seed).collect()),
    }
}

// Bare scalars stand for `{ value: s, label: s }`; falsy entries are dropped.
fn seed(localized: &Value) -> Option<DataSourceEntry> {
    if !is_truthy(localized) {
        return None;
    }
    let mut item = match DataSourceEntry::from_value(localized.clone()) {
        DataSourceEntry::Item(item) => item,
        DataSourceEntry::Scalar(value) => OptionItem {
            label: OptionLabel::from_value(value.clone()),
            value,
            extra: Map::new(),
        },
    };
    item.label = Some(finalize_label(item.label.take()));
    Some(DataSourceEntry::Item(item))
}

fn relabel(entry: &DataSourceEntry, index: usize, localized: &[Value]) -> DataSourceEntry {
    let (value, authored, extra) = match entry {
        DataSourceEntry::Item(item) => (item.value.clone(), item.label.clone(), item.extra.clone()),
        DataSourceEntry::Scalar(value) => {
            let authored = Some(value)
                .filter(|value| is_truthy(value))
                .and_then(|value| OptionLabel::from_value(value.clone()));
            (value.clone(), authored, Map::new())
        }
    };
    let label = localized
        .get(index)
        .filter(|label| is_truthy(label))
        .or_else(|| lookup_by_value(localized, &value))
        .and_then(|label| OptionLabel::from_value(label.clone()))
        .or(authored);
    DataSourceEntry::Item(OptionItem {
        value,
        label: Some(finalize_label(label)),
        extra,
    })
}

fn lookup_by_value<'a>(localized: &'a [Value], value: &Value) -> Option<&'a Value> {
    let index = match value {
        Value::Number(number) => usize::try_from(number.as_u64()?).ok()?,
        Value::String(text) => text.parse::<usize>().ok()?,
        _ => return None,
    };
    localized.get(index).filter(|label| is_truthy(label))
}

/// Icon references win; structured labels unwrap their `label` key; a
/// missing label becomes [`UNKNOWN_LABEL`].
pub fn finalize_label(label: Option<OptionLabel>) -> OptionLabel {
    match label {
        Some(OptionLabel::Text(text)) => match extract_icon_str(&text) {
            Some(icon) => OptionLabel::Icon(icon),
            None => OptionLabel::Text(text),
        },
        Some(OptionLabel::Value(Value::Object(map))) => {
            let inner = map.get("label").filter(|inner| !inner.is_null()).cloned();
            inner
                .and_then(OptionLabel::from_value)
                .unwrap_or(OptionLabel::Value(Value::Object(map)))
        }
        Some(other) => other,
        None => OptionLabel::Text(UNKNOWN_LABEL.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: Value) -> Vec<DataSourceEntry> {
        match value {
            Value::Array(items) => entries_from_values(items),
            _ => unreachable!(),
        }
    }

    fn labels(entries: &[DataSourceEntry]) -> Vec<Value> {
        entries
            .iter()
            .map(|entry| entry.label().map(OptionLabel::to_value).unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn empty_inputs_stay_empty() {
        assert_eq!(localize_options(Some(&[][..]), Some(&[][..])), Some(vec![]));
        assert_eq!(localize_options(None, None), None);
    }

    #[test]
    fn no_localization_only_filters_falsy() {
        let existing = entries(json!([{ "value": 1, "label": "A" }, null, "", 0, "keep"]));
        let result = localize_options(Some(existing.as_slice()), Some(&[][..])).unwrap();
        assert_eq!(
            result,
            entries(json!([{ "value": 1, "label": "A" }, "keep"]))
        );
    }

    #[test]
    fn positional_relabel_keeps_values() {
        let existing = entries(json!([{ "value": "x", "label": "old" }]));
        let result = localize_options(Some(existing.as_slice()), Some(&[json!("New X")][..])).unwrap();
        assert_eq!(result, vec![DataSourceEntry::Item(OptionItem::new(json!("x"), "New X"))]);
    }

    #[test]
    fn index_valued_options_fall_back_to_value_lookup() {
        let existing = entries(json!([
            { "value": 2, "label": "two" },
            { "value": "0", "label": "zero" }
        ]));
        let localized = [json!(null), json!(""), json!("Two")];
        let result = localize_options(Some(existing.as_slice()), Some(&localized[..])).unwrap();
        assert_eq!(labels(&result), vec![json!("Two"), json!("zero")]);
    }

    #[test]
    fn authored_label_survives_short_localization() {
        let existing = entries(json!([
            { "value": "a", "label": "A" },
            { "value": "b", "label": "B", "disabled": true }
        ]));
        let result = localize_options(Some(existing.as_slice()), Some(&[json!("Alpha")][..])).unwrap();
        assert_eq!(labels(&result), vec![json!("Alpha"), json!("B")]);
        assert_eq!(
            result[1].to_value(),
            json!({ "disabled": true, "value": "b", "label": "B" })
        );
    }

    #[test]
    fn icon_labels_become_icon_descriptors() {
        let existing = entries(json!([{ "value": "bold", "label": "Bold" }]));
        let result =
            localize_options(Some(existing.as_slice()), Some(&[json!("@TextBold: Make it bold")][..])).unwrap();
        assert_eq!(
            result[0].label(),
            Some(&OptionLabel::Icon(IconRef {
                name: "TextBold".into(),
                tooltip: Some("Make it bold".into()),
            }))
        );
    }

    #[test]
    fn structured_and_missing_labels_fall_back() {
        let existing = entries(json!([{ "value": 1 }, { "value": 2 }, null]));
        let localized = [json!({ "label": "One", "value": "ignored" })];
        let result = localize_options(Some(existing.as_slice()), Some(&localized[..])).unwrap();
        assert_eq!(labels(&result), vec![json!("One"), json!("Unknown"), json!("Unknown")]);
        assert_eq!(result[2].value(), &Value::Null);
    }

    #[test]
    fn missing_options_are_seeded_as_items() {
        let localized = [
            json!({ "label": "Yes", "value": true }),
            json!("Fast"),
            json!(""),
            json!("@slow: Slow mode"),
        ];
        let result = localize_options(None, Some(&localized[..])).unwrap();
        assert_eq!(
            result,
            vec![
                DataSourceEntry::Item(OptionItem::new(json!(true), "Yes")),
                DataSourceEntry::Item(OptionItem::new(json!("Fast"), "Fast")),
                DataSourceEntry::Item(OptionItem {
                    value: json!("@slow: Slow mode"),
                    label: Some(OptionLabel::Icon(IconRef {
                        name: "slow".into(),
                        tooltip: Some("Slow mode".into()),
                    })),
                    extra: Map::new(),
                }),
            ]
        );
    }

    #[test]
    fn seeded_options_are_a_fixed_point() {
        let localized = [json!("Fast"), json!("@slow: Slow mode"), json!({ "label": "Off", "value": 0, "tag": "x" })];
        let seeded = localize_options(None, Some(&localized[..])).unwrap();
        let again = localize_options(Some(seeded.as_slice()), Some(&localized[..])).unwrap();
        assert_eq!(seeded, again);
    }

    #[test]
    fn scalar_options_are_their_own_value_and_label() {
        let existing = entries(json!(["small", "large", null]));
        let result = localize_options(Some(existing.as_slice()), Some(&[json!("Small")][..])).unwrap();
        let values: Vec<&Value> = result.iter().map(DataSourceEntry::value).collect();
        assert_eq!(values, vec![&json!("small"), &json!("large"), &Value::Null]);
        assert_eq!(labels(&result), vec![json!("Small"), json!("large"), json!("Unknown")]);
    }

    #[test]
    fn relabeling_twice_is_stable() {
        let existing = entries(json!([{ "value": "a", "label": "A" }, { "value": "b" }]));
        let localized = [json!("Alpha"), json!("@beta")];
        let once = localize_options(Some(existing.as_slice()), Some(&localized[..])).unwrap();
        let twice = localize_options(Some(once.as_slice()), Some(&localized[..])).unwrap();
        assert_eq!(once, twice);
    }
}
