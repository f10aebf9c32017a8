//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so that partial config files fill in the rest.

use crate::types::LogLevel;

// ── Session persistence ────────────────────────────────────────────────────

pub fn autosave_delay_ms() -> u64 {
    1000
}

pub fn session_key() -> String {
    "scratchpadSession".to_string()
}

pub fn session_dir() -> Option<String> {
    None
}

// ── Tabs ───────────────────────────────────────────────────────────────────

pub fn default_tab_name() -> String {
    "scratchpad.js".to_string()
}

pub fn default_tab_content() -> String {
    "// This is a JavaScript scratchpad.\n( function () {} () );".to_string()
}

pub fn placeholder_tab_name() -> String {
    "New Script".to_string()
}

pub fn new_tab_name_template() -> String {
    "scratchpad{n}.js".to_string()
}

pub fn untitled_label() -> String {
    "Untitled".to_string()
}

// ── Editing ────────────────────────────────────────────────────────────────

pub fn tab_size() -> usize {
    2
}

// ── Diagnostics ────────────────────────────────────────────────────────────

pub fn log_level() -> LogLevel {
    LogLevel::Off
}
