//! Executes scene scripts against a widget tree and its anchor layout
//!
//! A [`Scene`] keeps the name tables a script refers to. Layout nodes are
//! created the first time a layout statement mentions a widget, so widgets
//! that are only declared never join the anchor graph.

mod error;

pub use error::SceneError;

use std::collections::HashMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::geometry::Rect;
use crate::host::{WidgetHost, WidgetId, WidgetTree};
use crate::layout::{AnchorLayout, LayoutConfig, LineId, NodeId};
use crate::parser::ast::{
    AnchorDecl, CustomLineDecl, Identifier, LineRef, Script, Spanned, Statement, WidgetDecl,
};

use error::find_similar;

/// Maximum edit distance for "did you mean" suggestions
const SUGGESTION_DISTANCE: usize = 2;

/// A widget tree, its anchor graph and the names a script gave them
#[derive(Debug, Default)]
pub struct Scene {
    tree: WidgetTree,
    layout: AnchorLayout,
    widgets: IndexMap<String, WidgetId>,
    lines: HashMap<String, LineId>,
}

impl Scene {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            tree: WidgetTree::new(),
            layout: AnchorLayout::new(config),
            widgets: IndexMap::new(),
            lines: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn layout(&self) -> &AnchorLayout {
        &self.layout
    }

    /// Live widgets in declaration order
    pub fn widgets(&self) -> impl Iterator<Item = (&str, WidgetId)> {
        self.widgets.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Geometry of a named widget, relative to its parent
    pub fn geometry_of(&self, name: &str) -> Option<Rect> {
        self.widgets
            .get(name)
            .and_then(|id| self.tree.geometry(*id))
    }

    /// Geometry of a named widget in top-level coordinates
    pub fn absolute_geometry_of(&self, name: &str) -> Option<Rect> {
        self.widgets
            .get(name)
            .and_then(|id| self.tree.absolute_geometry(*id))
    }

    /// Custom line by script name, while it is alive
    pub fn custom_line(&self, name: &str) -> Option<LineId> {
        self.lines
            .get(name)
            .copied()
            .filter(|id| self.layout.line(*id).is_some())
    }

    /// Run every statement, then settle the layout
    pub fn run(&mut self, script: &Script) -> Result<(), SceneError> {
        for statement in &script.statements {
            self.apply(&statement.node)?;
        }
        self.settle();
        Ok(())
    }

    /// Run the layout event loop until the tree is quiet. Returns the turns taken.
    pub fn settle(&mut self) -> usize {
        let turns = self.layout.process(&mut self.tree);
        let layout = &self.layout;
        self.lines.retain(|_, id| layout.line(*id).is_some());
        debug!(turns, "scene settled");
        turns
    }

    pub fn apply(&mut self, statement: &Statement) -> Result<(), SceneError> {
        match statement {
            Statement::Widget(decl) => self.declare_widget(decl),
            Statement::Line(decl) => self.declare_line(decl),
            Statement::Anchor(decl) => self.anchor(decl),
            Statement::Margin { line, value } => {
                let line = self.resolve_line(line)?;
                let margin = integer(value)?;
                self.layout.set_offset(line, margin);
                Ok(())
            }
            Statement::Fill { widget, target } => {
                let node = self.node(widget)?;
                let target = target.as_ref().map(|t| self.node(t)).transpose()?;
                self.layout.fill(&self.tree, node, target);
                if target.is_some_and(|t| !self.layout.is_anchor_allowed(&self.tree, node, t)) {
                    warn!(widget = %widget.node, "fill ignored: widgets are not siblings or parent/child");
                }
                Ok(())
            }
            Statement::CenterIn { widget, target } => {
                let node = self.node(widget)?;
                let target = target.as_ref().map(|t| self.node(t)).transpose()?;
                self.layout.center_in(&self.tree, node, target);
                if target.is_some_and(|t| !self.layout.is_anchor_allowed(&self.tree, node, t)) {
                    warn!(widget = %widget.node, "center ignored: widgets are not siblings or parent/child");
                }
                Ok(())
            }
            Statement::Margins { widget, value } => {
                let node = self.node(widget)?;
                let margin = integer(value)?;
                self.layout.set_margins(node, margin);
                Ok(())
            }
            Statement::Resize {
                widget,
                width,
                height,
            } => {
                let id = self.widget(widget)?;
                self.tree.resize(id, integer(width)?, integer(height)?);
                Ok(())
            }
            Statement::Move { widget, x, y } => {
                let id = self.widget(widget)?;
                self.tree.move_to(id, integer(x)?, integer(y)?);
                Ok(())
            }
            Statement::Remove(name) => {
                let line = self.custom(name)?;
                self.lines.remove(name.node.as_str());
                self.layout.remove_custom_line(line);
                Ok(())
            }
            Statement::Destroy(name) => {
                let id = self.widget(name)?;
                let removed = self.tree.destroy(id);
                self.widgets.retain(|_, w| !removed.contains(w));
                debug!(widget = %name.node, count = removed.len(), "destroyed widgets");
                Ok(())
            }
            Statement::Settle => {
                self.settle();
                Ok(())
            }
        }
    }

    /// Widget geometry in tree order, one line per widget, children indented
    pub fn report(&self) -> String {
        let mut out = String::new();
        for root in self.tree.roots() {
            self.report_widget(&mut out, *root, 0);
        }
        out
    }

    fn report_widget(&self, out: &mut String, widget: WidgetId, depth: usize) {
        let (Some(name), Some(geometry)) = (self.tree.name(widget), self.tree.geometry(widget))
        else {
            return;
        };
        let _ = writeln!(out, "{}{}: {}", "  ".repeat(depth), name, geometry);
        for child in self.tree.children(widget) {
            self.report_widget(out, child, depth + 1);
        }
    }

    fn declare_widget(&mut self, decl: &WidgetDecl) -> Result<(), SceneError> {
        let name = decl.name.node.as_str();
        if self.widgets.contains_key(name) {
            return Err(SceneError::DuplicateName {
                kind: "widget",
                name: name.to_string(),
                span: decl.name.span.clone(),
            });
        }
        let parent = decl.parent.as_ref().map(|p| self.widget(p)).transpose()?;

        let (x, y) = match &decl.position {
            Some((x, y)) => (integer(x)?, integer(y)?),
            None => (0, 0),
        };
        let (width, height) = match &decl.size {
            Some((w, h)) => (integer(w)?, integer(h)?),
            None => (0, 0),
        };

        let Some(id) = self.tree.add(name, parent, Rect::new(x, y, width, height)) else {
            // Only reachable if the parent vanished between lookup and insert
            return Err(self.undefined_widget(decl.parent.as_ref().unwrap_or(&decl.name)));
        };
        self.widgets.insert(name.to_string(), id);
        Ok(())
    }

    fn declare_line(&mut self, decl: &CustomLineDecl) -> Result<(), SceneError> {
        let name = decl.name.node.as_str();
        if self.custom_line(name).is_some() {
            return Err(SceneError::DuplicateName {
                kind: "line",
                name: name.to_string(),
                span: decl.name.span.clone(),
            });
        }
        let node = self.node(&decl.widget)?;
        let line = self
            .layout
            .custom_line(node, decl.orientation, decl.percent.node, decl.direction);
        self.lines.insert(name.to_string(), line);
        Ok(())
    }

    fn anchor(&mut self, decl: &AnchorDecl) -> Result<(), SceneError> {
        let line = self.resolve_line(&decl.line)?;
        let target = decl
            .target
            .as_ref()
            .map(|t| self.resolve_line(t))
            .transpose()?;
        let margin = decl.margin.as_ref().map(integer).transpose()?;

        self.layout.anchor_to(line, target);
        if target.is_some() && self.layout.anchored_to(line) != target {
            warn!(line = %decl.line.node, "anchor ignored");
        }
        if let Some(margin) = margin {
            self.layout.set_offset(line, margin);
        }
        Ok(())
    }

    fn widget(&self, name: &Spanned<Identifier>) -> Result<WidgetId, SceneError> {
        self.widgets
            .get(name.node.as_str())
            .copied()
            .ok_or_else(|| self.undefined_widget(name))
    }

    fn node(&mut self, name: &Spanned<Identifier>) -> Result<NodeId, SceneError> {
        let widget = self.widget(name)?;
        match self.layout.get_or_create(&mut self.tree, widget) {
            Some(node) => Ok(node),
            None => Err(self.undefined_widget(name)),
        }
    }

    fn custom(&self, name: &Spanned<Identifier>) -> Result<LineId, SceneError> {
        self.custom_line(name.node.as_str()).ok_or_else(|| {
            let live = self
                .lines
                .iter()
                .filter(|(_, id)| self.layout.line(**id).is_some())
                .map(|(n, _)| n.as_str());
            SceneError::UndefinedLine {
                name: name.node.to_string(),
                span: name.span.clone(),
                suggestions: find_similar(live, name.node.as_str(), SUGGESTION_DISTANCE),
            }
        })
    }

    fn resolve_line(&mut self, line: &Spanned<LineRef>) -> Result<LineId, SceneError> {
        match &line.node {
            LineRef::Edge { widget, edge } => {
                let node = self.node(widget)?;
                Ok(self.layout.line_for(node, *edge))
            }
            LineRef::Custom(name) => self.custom(name),
        }
    }

    fn undefined_widget(&self, name: &Spanned<Identifier>) -> SceneError {
        SceneError::UndefinedWidget {
            name: name.node.to_string(),
            span: name.span.clone(),
            suggestions: find_similar(
                self.widgets.keys().map(String::as_str),
                name.node.as_str(),
                SUGGESTION_DISTANCE,
            ),
        }
    }
}

/// Pixel values must be whole numbers that fit an `i32`
fn integer(value: &Spanned<f64>) -> Result<i32, SceneError> {
    let v = value.node;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return Err(SceneError::NotAnInteger {
            value: v,
            span: value.span.clone(),
        });
    }
    Ok(v as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Result<Scene, SceneError> {
        let script = parse(source).expect("script should parse");
        let mut scene = Scene::default();
        scene.run(&script)?;
        Ok(scene)
    }

    #[test]
    fn test_declared_widget_keeps_geometry() {
        let scene = run("widget a at 5 6 size 7 8").unwrap();
        assert_eq!(scene.geometry_of("a"), Some(Rect::new(5, 6, 7, 8)));
        assert_eq!(scene.layout().node_count(), 0);
    }

    #[test]
    fn test_layout_statement_creates_nodes_lazily() {
        let scene = run(
            "widget p size 100 100
             widget a in p size 10 10
             widget b in p size 10 10
             anchor a.left to p.left",
        )
        .unwrap();
        assert_eq!(scene.layout().node_count(), 2);
    }

    #[test]
    fn test_anchor_with_margin() {
        let scene = run(
            "widget p size 400 300
             widget a in p at 50 50 size 40 20
             anchor a.left to p.left margin 10
             anchor a.top to p.top margin 5",
        )
        .unwrap();
        assert_eq!(scene.geometry_of("a"), Some(Rect::new(10, 5, 40, 20)));
    }

    #[test]
    fn test_undefined_widget_suggests_names() {
        let err = run("widget container\nfill contianer with none").unwrap_err();
        match err {
            SceneError::UndefinedWidget {
                name, suggestions, ..
            } => {
                assert_eq!(name, "contianer");
                assert_eq!(suggestions, vec!["container".to_string()]);
            }
            other => panic!("Expected UndefinedWidget, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_widget() {
        let err = run("widget a\nwidget a").unwrap_err();
        assert!(matches!(err, SceneError::DuplicateName { kind: "widget", .. }));
        assert_eq!(err.span(), &(16..17));
    }

    #[test]
    fn test_fractional_pixels_rejected() {
        let err = run("widget a size 10.5 3").unwrap_err();
        assert!(matches!(err, SceneError::NotAnInteger { value, .. } if value == 10.5));
    }

    #[test]
    fn test_removed_line_is_undefined() {
        let err = run(
            "widget c size 100 100
             line q = c.horizontal(0.5)
             remove q
             remove q",
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::UndefinedLine { .. }));
    }

    #[test]
    fn test_destroy_forgets_subtree_names() {
        let scene = run(
            "widget p size 100 100
             widget a in p
             widget b
             destroy p",
        )
        .unwrap();
        let names: Vec<&str> = scene.widgets().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_custom_lines_of_destroyed_widgets_are_dropped() {
        let scene = run(
            "widget p size 100 100
             widget c in p size 50 50
             line q = c.vertical(0.5)
             anchor c.left to p.left
             destroy c",
        )
        .unwrap();
        assert!(scene.custom_line("q").is_none());
        assert_eq!(scene.layout().node_count(), 1);
    }

    #[test]
    fn test_report_is_indented_by_depth() {
        let scene = run("widget p size 10 10\nwidget a in p at 1 2 size 3 4").unwrap();
        assert_eq!(
            scene.report(),
            "p: x=0 y=0 w=10 h=10\n  a: x=1 y=2 w=3 h=4\n"
        );
    }
}
