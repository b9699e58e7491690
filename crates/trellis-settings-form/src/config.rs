//! Panel configuration.

use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLayout {
    None,
    Loose,
    Terse,
    Popover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipLayout {
    Icon,
    Text,
}

/// Presentation hints handed to the renderer along with an active form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormLayout {
    pub colon: bool,
    /// Label column span out of 24.
    pub label_col: u8,
    pub wrapper_col: u8,
    pub label_align: Align,
    pub wrapper_align: Align,
    pub feedback_layout: FeedbackLayout,
    pub tooltip_layout: TooltipLayout,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self {
            colon: false,
            label_col: 8,
            wrapper_col: 16,
            label_align: Align::Left,
            wrapper_align: Align::Right,
            feedback_layout: FeedbackLayout::None,
            tooltip_layout: TooltipLayout::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFormOptions {
    /// Longest a render update may wait for idle time.
    pub idle_timeout_ms: u64,
    /// Longest a snapshot may wait after the last input.
    pub snapshot_delay_ms: u64,
    pub layout: FormLayout,
}

impl SettingsFormOptions {
    pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 500;
    pub const DEFAULT_SNAPSHOT_DELAY_MS: u64 = 1000;

    /// Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn snapshot_delay(&self) -> Duration {
        Duration::from_millis(self.snapshot_delay_ms)
    }
}

impl Default for SettingsFormOptions {
    fn default() -> Self {
        Self {
            idle_timeout_ms: Self::DEFAULT_IDLE_TIMEOUT_MS,
            snapshot_delay_ms: Self::DEFAULT_SNAPSHOT_DELAY_MS,
            layout: FormLayout::default(),
        }
    }
}
