//! SVG renderer for settled scenes
//!
//! Widgets are drawn as nested groups of rectangles in top-level
//! coordinates. With `show_anchors` every anchor line is overlaid as a dashed
//! segment across its widget.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_svg;
