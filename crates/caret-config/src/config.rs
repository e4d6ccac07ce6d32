/// Editor configuration: load, save, and sanitize.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Characters that end a word, in addition to whitespace.
pub const DEFAULT_WORD_SEPARATORS: &str = "`~!@#$%^&*()-=+[{]}\\|;:'\",.<>/?";

/// Cursor-related editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of a tab stop in visible columns.
    pub tab_size: usize,
    /// Lines moved by one page-up / page-down.
    pub page_size: usize,
    /// Characters that separate words for word navigation and selection.
    pub word_separators: String,
    /// Column at which lines are soft-wrapped. `None` disables wrapping.
    pub wrapping_column: Option<usize>,
    /// Number of view lines shown in the viewport.
    pub viewport_height: usize,
    /// Whether select-all toggles between the editable range and the whole buffer.
    pub select_all_toggles_editable_range: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            page_size: 30,
            word_separators: DEFAULT_WORD_SEPARATORS.to_string(),
            wrapping_column: None,
            viewport_height: 30,
            select_all_toggles_editable_range: true,
        }
    }
}

impl EditorConfig {
    /// Returns the config file path: platform config directory + `caret/caret.json`,
    /// falling back to `caret.json` in the working directory.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("caret").join("caret.json"))
            .unwrap_or_else(|| PathBuf::from("caret.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<EditorConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Return defaults on error (don't overwrite broken file)
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.tab_size = self.tab_size.clamp(1, 32);
        self.page_size = self.page_size.max(1);
        self.viewport_height = self.viewport_height.max(1);
        if self.wrapping_column == Some(0) {
            self.wrapping_column = None;
        }
        // Whitespace always separates words; keeping it here would double-classify it.
        self.word_separators.retain(|c| c != ' ' && c != '\t');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.page_size, 30);
        assert_eq!(config.word_separators, DEFAULT_WORD_SEPARATORS);
        assert!(config.wrapping_column.is_none());
        assert!(config.select_all_toggles_editable_range);
    }

    #[test]
    fn test_sanitize_clamps_tab_size() {
        let mut config = EditorConfig::default();
        config.tab_size = 0;
        config.sanitize();
        assert_eq!(config.tab_size, 1);

        config.tab_size = 100;
        config.sanitize();
        assert_eq!(config.tab_size, 32);
    }

    #[test]
    fn test_sanitize_page_and_viewport_minimum() {
        let mut config = EditorConfig::default();
        config.page_size = 0;
        config.viewport_height = 0;
        config.sanitize();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.viewport_height, 1);
    }

    #[test]
    fn test_sanitize_zero_wrapping_column_disables_wrap() {
        let mut config = EditorConfig::default();
        config.wrapping_column = Some(0);
        config.sanitize();
        assert!(config.wrapping_column.is_none());

        config.wrapping_column = Some(80);
        config.sanitize();
        assert_eq!(config.wrapping_column, Some(80));
    }

    #[test]
    fn test_sanitize_strips_whitespace_separators() {
        let mut config = EditorConfig::default();
        config.word_separators = " .,\t".to_string();
        config.sanitize();
        assert_eq!(config.word_separators, ".,");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut config = EditorConfig::default();
        config.wrapping_column = Some(40);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let json = r#"{"tab_size": 8}"#;
        let parsed: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tab_size, 8);
        assert_eq!(parsed.page_size, 30);
        assert!(parsed.wrapping_column.is_none());
    }
}
