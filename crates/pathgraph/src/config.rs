//! Configuration types for pathgraph sessions.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as TOML files.
//!
//! - [`AppConfig`] - Top-level configuration combining style and registry settings.
//! - [`StyleConfig`] - Colors applied by scene utilities.
//! - [`RegistryConfig`] - Behaviour of the display-name registry.
//!
//! # Example
//!
//! ```
//! # use pathgraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().highlight_color().is_ok());
//! assert_eq!(config.registry().unique_name_separator(), "");
//! ```

use serde::Deserialize;

use pathgraph_core::color::{Color, ColorError};

const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff99";

/// Top-level configuration combining style and registry settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Registry configuration section.
    #[serde(default)]
    registry: RegistryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, registry: RegistryConfig) -> Self {
        Self { style, registry }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }
}

/// Colors applied by scene utilities.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background forced onto the target of a render-info switch, as a color string.
    #[serde(default = "default_highlight_color")]
    highlight_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            highlight_color: default_highlight_color(),
        }
    }
}

impl StyleConfig {
    /// Creates a style section with the given highlight color string.
    pub fn new(highlight_color: impl Into<String>) -> Self {
        Self {
            highlight_color: highlight_color.into(),
        }
    }

    /// Returns the parsed highlight [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn highlight_color(&self) -> Result<Color, ColorError> {
        Color::new(&self.highlight_color)
    }
}

fn default_highlight_color() -> String {
    DEFAULT_HIGHLIGHT_COLOR.to_string()
}

/// Behaviour of the display-name registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Inserted between a base name and its numeric suffix when generating
    /// unique names.
    #[serde(default)]
    unique_name_separator: String,
}

impl RegistryConfig {
    pub fn new(unique_name_separator: impl Into<String>) -> Self {
        Self {
            unique_name_separator: unique_name_separator.into(),
        }
    }

    pub fn unique_name_separator(&self) -> &str {
        &self.unique_name_separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.style().highlight_color().unwrap(),
            Color::new("#ffff99").unwrap()
        );
        assert_eq!(config.registry().unique_name_separator(), "");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [registry]
            unique_name_separator = "_"
            "#,
        )
        .unwrap();

        assert_eq!(config.registry().unique_name_separator(), "_");
        assert!(config.style().highlight_color().is_ok());
    }

    #[test]
    fn test_parse_highlight_color() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            highlight_color = "orange"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.style().highlight_color().unwrap(),
            Color::new("orange").unwrap()
        );
    }

    #[test]
    fn test_invalid_highlight_color() {
        let style = StyleConfig::new("not-a-color");
        assert!(style.highlight_color().is_err());
    }
}
