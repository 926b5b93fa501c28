//! Anchor Layout - an anchor-based layout engine for widget trees
//!
//! Widgets expose anchor lines for their edges and centers. Binding a line to
//! another widget's line makes it follow that line at an offset; the engine
//! re-resolves bound lines whenever a participating widget moves or resizes.
//!
//! The crate also ships a small scene script language for driving the engine
//! from text, a geometry report and an SVG renderer.
//!
//! # Example
//!
//! ```rust
//! use anchor_layout::report;
//!
//! let out = report(r#"
//!     widget container size 600 400
//!     widget frame in container size 100 50
//!     anchor frame.right to container.horizontal_center
//! "#).unwrap();
//!
//! assert!(out.contains("frame: x=200 y=0 w=100 h=50"));
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod scene;

pub use config::{Settings, SettingsError};
pub use error::ParseError;
pub use geometry::{Orientation, Point, Rect};
pub use host::{GeometryEvent, GeometryEventKind, WidgetHost, WidgetId, WidgetTree};
pub use layout::{AnchorLayout, Edge, LayoutConfig, LineId, NodeId, OffsetDirection};
pub use parser::{parse, Script};
pub use renderer::{render_svg, SvgConfig};
pub use scene::{Scene, SceneError};

use thiserror::Error;

/// Errors that can occur while running a script
#[derive(Debug, Error)]
pub enum RunError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while executing a statement
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

impl From<Vec<ParseError>> for RunError {
    fn from(errors: Vec<ParseError>) -> Self {
        RunError::Parse(errors)
    }
}

impl RunError {
    /// Format every contained error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RunError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RunError::Scene(err) => err.format(source, filename),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete run pipeline
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Debug mode: draw anchor lines
    pub debug: bool,
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Take both tables of a settings file
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.layout = settings.layout;
        self.svg = settings.svg;
        self
    }

    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Parse and run a script with default configuration, returning the settled scene
pub fn run(source: &str) -> Result<Scene, RunError> {
    run_with_config(source, &RunConfig::default())
}

pub fn run_with_config(source: &str, config: &RunConfig) -> Result<Scene, RunError> {
    let script = parse(source)?;
    let mut scene = Scene::new(config.layout.clone());
    scene.run(&script)?;
    Ok(scene)
}

/// Run a script and return the geometry report
pub fn report(source: &str) -> Result<String, RunError> {
    Ok(run(source)?.report())
}

/// Run a script and render the result to SVG with default configuration
///
/// # Example
///
/// ```rust
/// use anchor_layout::render;
///
/// let svg = render("widget a size 10 10").unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn render(source: &str) -> Result<String, RunError> {
    render_with_config(source, RunConfig::default())
}

/// Run a script and render the result to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use anchor_layout::{render_with_config, RunConfig, SvgConfig};
///
/// let config = RunConfig::new()
///     .with_svg(SvgConfig::default().with_viewbox_padding(0.0))
///     .with_debug(true);
///
/// let svg = render_with_config("widget a size 10 10", config).unwrap();
/// assert!(svg.contains(r#"viewBox="0 0 10 10""#));
/// ```
pub fn render_with_config(source: &str, config: RunConfig) -> Result<String, RunError> {
    let scene = run_with_config(source, &config)?;
    let svg = if config.debug {
        config.svg.clone().with_anchors(true)
    } else {
        config.svg.clone()
    };
    Ok(render_svg(&scene, &svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_simple_tree() {
        let out = report("widget p size 10 10\nwidget c in p size 4 4").unwrap();
        assert_eq!(out, "p: x=0 y=0 w=10 h=10\n  c: x=0 y=0 w=4 h=4\n");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = run("widget").unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
        assert!(err.to_string().starts_with("parse errors:"));
    }

    #[test]
    fn test_scene_error_is_reported() {
        let err = run("fill a with none").unwrap_err();
        assert!(matches!(err, RunError::Scene(SceneError::UndefinedWidget { .. })));
    }

    #[test]
    fn test_formatted_error_names_file() {
        let source = "widget a\nmove b 1 2";
        let err = run(source).unwrap_err();
        let formatted = err.format(source, "demo.anchor");
        assert!(formatted.contains("demo.anchor"));
        assert!(formatted.contains("undefined widget 'b'"));
    }

    #[test]
    fn test_layout_config_reaches_engine() {
        let config = RunConfig::new().with_layout(LayoutConfig::default().with_default_margin(3));
        let scene = run_with_config(
            "widget p size 100 100\nwidget c in p size 10 10\nanchor c.left to p.left",
            &config,
        )
        .unwrap();
        assert_eq!(scene.geometry_of("c"), Some(Rect::new(3, 0, 10, 10)));
    }

    #[test]
    fn test_debug_draws_anchors() {
        let source = "widget p size 100 100\nwidget c in p size 10 10\nanchor c.left to p.left";
        let plain = render(source).unwrap();
        let debug = render_with_config(source, RunConfig::new().with_debug(true)).unwrap();
        assert!(!plain.contains("<line"));
        assert!(debug.contains("<line"));
    }
}
