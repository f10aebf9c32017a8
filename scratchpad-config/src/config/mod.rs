//! The `Config` struct and its derived helpers.
//!
//! File I/O and path resolution live in [`persistence`].

mod persistence;

use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};

/// Largest tab width accepted by `validate`.
const MAX_TAB_SIZE: usize = 16;

/// Placeholder replaced by the tab number in `new_tab_name_template`.
const TAB_NUMBER_PLACEHOLDER: &str = "{n}";

/// Scratchpad configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Quiet period after the last qualifying event before the session is written
    #[serde(default = "crate::defaults::autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Key under which the session blob is stored
    #[serde(default = "crate::defaults::session_key")]
    pub session_key: String,

    /// Directory for the file-backed session store (`None` = `<config dir>/sessions`)
    #[serde(default = "crate::defaults::session_dir")]
    pub session_dir: Option<String>,

    /// Name of the fallback tab created when no session can be restored
    #[serde(default = "crate::defaults::default_tab_name")]
    pub default_tab_name: String,

    /// Content of the fallback tab created when no session can be restored
    #[serde(default = "crate::defaults::default_tab_content")]
    pub default_tab_content: String,

    /// Name given to tabs created without an explicit name
    #[serde(default = "crate::defaults::placeholder_tab_name")]
    pub placeholder_tab_name: String,

    /// Name template for tabs created by the new-tab action (`{n}` = tab number)
    #[serde(default = "crate::defaults::new_tab_name_template")]
    pub new_tab_name_template: String,

    /// Tab strip label shown for tabs with an empty name
    #[serde(default = "crate::defaults::untitled_label")]
    pub untitled_label: String,

    /// Tab stop width used for status bar column math
    #[serde(default = "crate::defaults::tab_size")]
    pub tab_size: usize,

    /// Debug log verbosity
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_delay_ms: crate::defaults::autosave_delay_ms(),
            session_key: crate::defaults::session_key(),
            session_dir: crate::defaults::session_dir(),
            default_tab_name: crate::defaults::default_tab_name(),
            default_tab_content: crate::defaults::default_tab_content(),
            placeholder_tab_name: crate::defaults::placeholder_tab_name(),
            new_tab_name_template: crate::defaults::new_tab_name_template(),
            untitled_label: crate::defaults::untitled_label(),
            tab_size: crate::defaults::tab_size(),
            log_level: crate::defaults::log_level(),
        }
    }
}

impl Config {
    /// Autosave quiet period as a `Duration`
    pub fn autosave_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_delay_ms)
    }

    /// Name for a tab created by the new-tab action, numbered `n`
    pub fn new_tab_name(&self, n: usize) -> String {
        self.new_tab_name_template
            .replace(TAB_NUMBER_PLACEHOLDER, &n.to_string())
    }

    /// Check field values that serde cannot constrain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "autosave_delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.tab_size == 0 || self.tab_size > MAX_TAB_SIZE {
            return Err(ConfigError::Validation(format!(
                "tab_size must be between 1 and {MAX_TAB_SIZE}, got {}",
                self.tab_size
            )));
        }
        if self.session_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "session_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
