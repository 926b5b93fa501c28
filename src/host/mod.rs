//! Host widget system boundary
//!
//! The layout engine never owns widgets. It talks to whatever widget tree the
//! application uses through [`WidgetHost`], a narrow capability interface:
//! read and write geometry, walk parent/child links, and subscribe to geometry
//! changes. [`WidgetTree`] is an in-memory implementation.

pub mod tree;

use slotmap::new_key_type;

use crate::geometry::Rect;

pub use tree::WidgetTree;

new_key_type! {
    /// Identity of a widget in the host tree
    pub struct WidgetId;
}

/// What happened to a watched widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEventKind {
    Moved,
    Resized,
    Destroyed,
}

/// A notification queued by the host for a watched widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryEvent {
    pub widget: WidgetId,
    pub kind: GeometryEventKind,
}

impl GeometryEvent {
    pub fn new(widget: WidgetId, kind: GeometryEventKind) -> Self {
        Self { widget, kind }
    }
}

/// Capabilities the layout engine needs from the host widget system
pub trait WidgetHost {
    /// Whether the widget is alive
    fn contains(&self, widget: WidgetId) -> bool;

    /// Geometry in the parent's coordinate space
    fn geometry(&self, widget: WidgetId) -> Option<Rect>;

    /// Replace the geometry. Hosts queue `Moved`/`Resized` events for watched
    /// widgets whose position or size actually changed.
    fn set_geometry(&mut self, widget: WidgetId, rect: Rect);

    fn parent(&self, widget: WidgetId) -> Option<WidgetId>;

    fn children(&self, widget: WidgetId) -> Vec<WidgetId>;

    /// Start reporting geometry changes of `widget` through [`drain_events`](Self::drain_events)
    fn watch_geometry(&mut self, widget: WidgetId);

    /// Take every queued event, oldest first
    fn drain_events(&mut self) -> Vec<GeometryEvent>;

    /// Geometry with the origin at (0, 0), i.e. the widget's own coordinate space
    fn local_rect(&self, widget: WidgetId) -> Option<Rect> {
        self.geometry(widget).map(|g| g.local())
    }
}
