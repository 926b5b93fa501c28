//! Configuration for SVG rendering

use serde::Deserialize;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Padding around the viewBox
    pub viewbox_padding: f64,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "al-" for "al-widget")
    pub class_prefix: Option<String>,

    /// Label each widget with its script name
    pub show_names: bool,

    /// Draw every anchor line as a dashed segment
    pub show_anchors: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 20.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("al-".to_string()),
            show_names: true,
            show_anchors: false,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_names(mut self, show: bool) -> Self {
        self.show_names = show;
        self
    }

    pub fn with_anchors(mut self, show: bool) -> Self {
        self.show_anchors = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert_eq!(config.viewbox_padding, 20.0);
        assert!(config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("al-".to_string()));
        assert!(config.show_names);
        assert!(!config.show_anchors);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_viewbox_padding(10.0)
            .with_standalone(false)
            .with_pretty_print(false)
            .with_class_prefix("my-")
            .with_anchors(true);

        assert_eq!(config.viewbox_padding, 10.0);
        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("my-".to_string()));
        assert!(config.show_anchors);
    }

    #[test]
    fn test_partial_toml() {
        let config: SvgConfig = toml::from_str("show_anchors = true").unwrap();
        assert!(config.show_anchors);
        assert_eq!(config.viewbox_padding, 20.0);
    }
}
