//! Anchor layout engine
//!
//! Widgets expose anchor lines (edges, centers, percent lines). Binding a line
//! to another widget's line makes it follow that line at an offset whenever
//! either widget moves or resizes.

pub mod config;
pub mod engine;
pub mod line;
pub mod node;

pub use config::LayoutConfig;
pub use engine::{relationship, AnchorLayout, GeometryObserver, LineMut, Relationship};
pub use line::{normalize_percent, AnchorLine, Edge, LineId, OffsetDirection};
pub use node::{LayoutNode, NodeId};
