//! In-memory widget tree

use slotmap::SlotMap;

use crate::geometry::{Point, Rect};

use super::{GeometryEvent, GeometryEventKind, WidgetHost, WidgetId};

#[derive(Debug, Clone)]
struct Widget {
    name: String,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    geometry: Rect,
    watched: bool,
}

/// A named widget hierarchy with geometry and a change queue
#[derive(Debug, Clone, Default)]
pub struct WidgetTree {
    widgets: SlotMap<WidgetId, Widget>,
    roots: Vec<WidgetId>,
    events: Vec<GeometryEvent>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget. Returns `None` when `parent` is not alive.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        parent: Option<WidgetId>,
        geometry: Rect,
    ) -> Option<WidgetId> {
        if let Some(p) = parent {
            if !self.widgets.contains_key(p) {
                return None;
            }
        }

        let id = self.widgets.insert(Widget {
            name: name.into(),
            parent,
            children: vec![],
            geometry,
            watched: false,
        });

        match parent {
            Some(p) => self.widgets[p].children.push(id),
            None => self.roots.push(id),
        }
        Some(id)
    }

    pub fn name(&self, widget: WidgetId) -> Option<&str> {
        self.widgets.get(widget).map(|w| w.name.as_str())
    }

    /// Top-level widgets in creation order
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn is_watched(&self, widget: WidgetId) -> bool {
        self.widgets.get(widget).is_some_and(|w| w.watched)
    }

    pub fn resize(&mut self, widget: WidgetId, width: i32, height: i32) {
        if let Some(g) = self.geometry(widget) {
            self.set_geometry(widget, Rect::new(g.x, g.y, width, height));
        }
    }

    pub fn move_to(&mut self, widget: WidgetId, x: i32, y: i32) {
        if let Some(g) = self.geometry(widget) {
            self.set_geometry(widget, Rect::new(x, y, g.width, g.height));
        }
    }

    /// Geometry in the coordinate space of the top-level widget
    pub fn absolute_geometry(&self, widget: WidgetId) -> Option<Rect> {
        let mut rect = self.widgets.get(widget)?.geometry;
        let mut parent = self.widgets[widget].parent;
        while let Some(p) = parent {
            let w = &self.widgets[p];
            rect = rect.translated(Point::new(w.geometry.x, w.geometry.y));
            parent = w.parent;
        }
        Some(rect)
    }

    /// Destroy a widget and all of its descendants.
    ///
    /// Watched widgets get a `Destroyed` event. Returns every removed id,
    /// children before parents.
    pub fn destroy(&mut self, widget: WidgetId) -> Vec<WidgetId> {
        let Some(parent) = self.widgets.get(widget).map(|w| w.parent) else {
            return vec![];
        };
        match parent {
            Some(p) => {
                if let Some(pw) = self.widgets.get_mut(p) {
                    pw.children.retain(|c| *c != widget);
                }
            }
            None => self.roots.retain(|r| *r != widget),
        }

        let mut removed = vec![];
        self.destroy_subtree(widget, &mut removed);
        removed
    }

    fn destroy_subtree(&mut self, widget: WidgetId, removed: &mut Vec<WidgetId>) {
        let Some(w) = self.widgets.remove(widget) else {
            return;
        };
        for child in w.children {
            self.destroy_subtree(child, removed);
        }
        if w.watched {
            self.events
                .push(GeometryEvent::new(widget, GeometryEventKind::Destroyed));
        }
        removed.push(widget);
    }
}

impl WidgetHost for WidgetTree {
    fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains_key(widget)
    }

    fn geometry(&self, widget: WidgetId) -> Option<Rect> {
        self.widgets.get(widget).map(|w| w.geometry)
    }

    fn set_geometry(&mut self, widget: WidgetId, rect: Rect) {
        let Some(w) = self.widgets.get_mut(widget) else {
            return;
        };
        let old = std::mem::replace(&mut w.geometry, rect);
        if !w.watched {
            return;
        }
        if old.top_left() != rect.top_left() {
            self.events
                .push(GeometryEvent::new(widget, GeometryEventKind::Moved));
        }
        if (old.width, old.height) != (rect.width, rect.height) {
            self.events
                .push(GeometryEvent::new(widget, GeometryEventKind::Resized));
        }
    }

    fn parent(&self, widget: WidgetId) -> Option<WidgetId> {
        self.widgets.get(widget).and_then(|w| w.parent)
    }

    fn children(&self, widget: WidgetId) -> Vec<WidgetId> {
        self.widgets
            .get(widget)
            .map(|w| w.children.clone())
            .unwrap_or_default()
    }

    fn watch_geometry(&mut self, widget: WidgetId) {
        if let Some(w) = self.widgets.get_mut(widget) {
            w.watched = true;
        }
    }

    fn drain_events(&mut self) -> Vec<GeometryEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_relationships() {
        let mut tree = WidgetTree::new();
        let root = tree.add("root", None, Rect::new(0, 0, 100, 100)).unwrap();
        let a = tree.add("a", Some(root), Rect::new(10, 10, 20, 20)).unwrap();
        let b = tree.add("b", Some(root), Rect::default()).unwrap();

        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), vec![a, b]);
        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.name(a), Some("a"));
    }

    #[test]
    fn test_add_with_dead_parent_fails() {
        let mut tree = WidgetTree::new();
        let root = tree.add("root", None, Rect::default()).unwrap();
        tree.destroy(root);
        assert!(tree.add("orphan", Some(root), Rect::default()).is_none());
    }

    #[test]
    fn test_events_only_for_watched_widgets() {
        let mut tree = WidgetTree::new();
        let w = tree.add("w", None, Rect::new(0, 0, 10, 10)).unwrap();
        tree.move_to(w, 5, 5);
        assert!(tree.drain_events().is_empty());

        tree.watch_geometry(w);
        tree.move_to(w, 6, 6);
        tree.resize(w, 20, 10);
        tree.set_geometry(w, Rect::new(6, 6, 20, 10));
        assert_eq!(
            tree.drain_events(),
            vec![
                GeometryEvent::new(w, GeometryEventKind::Moved),
                GeometryEvent::new(w, GeometryEventKind::Resized),
            ]
        );
        assert!(tree.drain_events().is_empty());
    }

    #[test]
    fn test_move_and_resize_in_one_call() {
        let mut tree = WidgetTree::new();
        let w = tree.add("w", None, Rect::new(0, 0, 10, 10)).unwrap();
        tree.watch_geometry(w);
        tree.set_geometry(w, Rect::new(1, 1, 11, 11));
        assert_eq!(tree.drain_events().len(), 2);
    }

    #[test]
    fn test_destroy_subtree() {
        let mut tree = WidgetTree::new();
        let root = tree.add("root", None, Rect::default()).unwrap();
        let a = tree.add("a", Some(root), Rect::default()).unwrap();
        let b = tree.add("b", Some(a), Rect::default()).unwrap();
        tree.watch_geometry(b);

        let removed = tree.destroy(a);
        assert_eq!(removed, vec![b, a]);
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.children(root).is_empty());
        assert_eq!(
            tree.drain_events(),
            vec![GeometryEvent::new(b, GeometryEventKind::Destroyed)]
        );
    }

    #[test]
    fn test_absolute_geometry() {
        let mut tree = WidgetTree::new();
        let root = tree.add("root", None, Rect::new(5, 5, 100, 100)).unwrap();
        let a = tree.add("a", Some(root), Rect::new(10, 20, 30, 30)).unwrap();
        let b = tree.add("b", Some(a), Rect::new(1, 2, 3, 4)).unwrap();
        assert_eq!(tree.absolute_geometry(b), Some(Rect::new(16, 27, 3, 4)));
        assert_eq!(tree.local_rect(a), Some(Rect::new(0, 0, 30, 30)));
    }
}
