//! Anchor graph bookkeeping and geometry propagation
//!
//! [`AnchorLayout`] owns every [`LayoutNode`] and [`AnchorLine`]. Lines refer to
//! each other by [`LineId`]: a line's source and its dependents are relations,
//! never ownership, so removing a line only has to clear the ids on the other
//! side.
//!
//! Nothing is recomputed synchronously. Binds, offset changes and host
//! geometry events put the affected node into an insertion-ordered pending
//! set; [`AnchorLayout::flush`] then runs one update pass per pending node, and
//! [`AnchorLayout::process`] repeats drain-events/flush until the host is quiet.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::geometry::{Orientation, Rect};
use crate::host::{GeometryEvent, GeometryEventKind, WidgetHost, WidgetId};

use super::config::LayoutConfig;
use super::line::{AnchorLine, Edge, LineId, OffsetDirection};
use super::node::{LayoutNode, NodeId};

/// Callback receiving a widget's new geometry after a move or resize
pub type GeometryObserver = Box<dyn FnMut(Rect)>;

/// How a line's widget relates to its source's widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Both widgets have the same parent; the source geometry is already in
    /// the shared coordinate space
    Sibling,
    /// The source widget is the parent; its local rect is used
    ParentChild,
}

/// Relationship between `widget` and `source`, if binding is meaningful.
///
/// Two top-level widgets (no parent) count as siblings.
pub fn relationship<H: WidgetHost + ?Sized>(
    host: &H,
    widget: WidgetId,
    source: WidgetId,
) -> Option<Relationship> {
    let parent = host.parent(widget);
    if parent == Some(source) {
        return Some(Relationship::ParentChild);
    }
    if host.parent(source) == parent {
        return Some(Relationship::Sibling);
    }
    None
}

/// The anchor graph for a widget tree
pub struct AnchorLayout {
    config: LayoutConfig,
    nodes: SlotMap<NodeId, LayoutNode>,
    lines: SlotMap<LineId, AnchorLine>,
    by_widget: HashMap<WidgetId, NodeId>,
    pending: IndexSet<NodeId>,
    observers: HashMap<NodeId, Vec<GeometryObserver>>,
    passes: u64,
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for AnchorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorLayout")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .field("lines", &self.lines.len())
            .field("pending", &self.pending)
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

impl AnchorLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: SlotMap::with_key(),
            lines: SlotMap::with_key(),
            by_widget: HashMap::new(),
            pending: IndexSet::new(),
            observers: HashMap::new(),
            passes: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The node for `widget`, created on first access.
    ///
    /// Creating a node starts watching the widget's geometry on the host.
    /// Returns `None` when the host does not know the widget.
    pub fn get_or_create<H: WidgetHost + ?Sized>(
        &mut self,
        host: &mut H,
        widget: WidgetId,
    ) -> Option<NodeId> {
        if !host.contains(widget) {
            return None;
        }
        if let Some(node) = self.by_widget.get(&widget) {
            return Some(*node);
        }

        let node = self
            .nodes
            .insert(LayoutNode::new(widget, self.config.default_margin));
        self.by_widget.insert(widget, node);
        host.watch_geometry(widget);
        debug!(?widget, ?node, "created layout node");
        Some(node)
    }

    pub fn node_for(&self, widget: WidgetId) -> Option<NodeId> {
        self.by_widget.get(&widget).copied()
    }

    pub fn node(&self, node: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LayoutNode)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop a node and every line it owns.
    ///
    /// Lines elsewhere that followed one of its lines become unbound.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(data) = self.nodes.remove(node) else {
            return false;
        };
        let lines: Vec<LineId> = data.all_lines().collect();
        for line in lines {
            self.destroy_line(line);
        }
        self.by_widget.remove(&data.widget);
        self.pending.shift_remove(&node);
        self.observers.remove(&node);
        debug!(?node, widget = ?data.widget, "removed layout node");
        true
    }

    pub fn line(&self, line: LineId) -> Option<&AnchorLine> {
        self.lines.get(line)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Chaining handle for line setters
    pub fn line_mut(&mut self, line: LineId) -> LineMut<'_> {
        LineMut { layout: self, id: line }
    }

    /// The well-known line for `edge`, created with the node's margin on first access.
    ///
    /// Returns a null id for percent edges and removed nodes; every line
    /// operation ignores null ids.
    pub fn line_for(&mut self, node: NodeId, edge: Edge) -> LineId {
        let Some(slot) = edge.slot() else {
            return LineId::default();
        };
        let Some(data) = self.nodes.get(node) else {
            return LineId::default();
        };
        if let Some(existing) = data.well_known[slot] {
            return existing;
        }

        let mut line = AnchorLine::new(node, edge, 0.0);
        line.offset = data.margins;
        let id = self.lines.insert(line);
        self.nodes[node].well_known[slot] = Some(id);
        trace!(?node, %edge, "created anchor line");
        id
    }

    pub fn left(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::Left)
    }

    pub fn top(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::Top)
    }

    pub fn right(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::Right)
    }

    pub fn bottom(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::Bottom)
    }

    pub fn horizontal_center(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::HorizontalCenter)
    }

    pub fn vertical_center(&mut self, node: NodeId) -> LineId {
        self.line_for(node, Edge::VerticalCenter)
    }

    /// Add a reference line at a signed percentage of the node's widget.
    ///
    /// `percent` is clamped to `[-1, 1]`; negative values measure from the
    /// right/bottom edge.
    pub fn custom_line(
        &mut self,
        node: NodeId,
        orientation: Orientation,
        percent: f64,
        direction: OffsetDirection,
    ) -> LineId {
        if !self.nodes.contains_key(node) {
            return LineId::default();
        }
        let edge = match orientation {
            Orientation::Horizontal => Edge::Horizontal,
            Orientation::Vertical => Edge::Vertical,
        };
        let mut line = AnchorLine::new(node, edge, percent);
        line.offset_direction = direction.sign_for(percent);
        let id = self.lines.insert(line);
        self.nodes[node].custom_lines.push(id);
        trace!(?node, %edge, percent, "created custom line");
        id
    }

    /// Destroy a custom line. Well-known lines live as long as their node.
    pub fn remove_custom_line(&mut self, line: LineId) -> bool {
        let Some(node) = self.lines.get(line).map(|l| l.node) else {
            return false;
        };
        let Some(data) = self.nodes.get_mut(node) else {
            return false;
        };
        let Some(index) = data.custom_lines.iter().position(|l| *l == line) else {
            return false;
        };
        data.custom_lines.remove(index);
        self.destroy_line(line);
        true
    }

    /// Bind `line` to follow `target`, or unbind with `None`.
    ///
    /// Silently ignored for percent lines, redundant binds, targets on the
    /// same node, targets of the other orientation and stale ids. Callers
    /// check [`AnchorLine::anchored_to`] to see whether the bind took effect.
    pub fn anchor_to(&mut self, line: LineId, target: Option<LineId>) -> LineId {
        let Some(this) = self.lines.get(line) else {
            return line;
        };
        if this.edge.is_percent() || this.anchored_to == target {
            return line;
        }
        if let Some(target_id) = target {
            let Some(t) = self.lines.get(target_id) else {
                return line;
            };
            if t.node == this.node || !this.edge.can_anchor_to(t.edge) {
                trace!(from = %this.edge, to = %t.edge, "bind rejected");
                return line;
            }
        }

        let previous = this.anchored_to;
        if let Some(previous) = previous {
            self.lines[line].anchored_to = None;
            self.remove_dependent(previous, line);
        }
        if let Some(target_id) = target {
            self.lines[line].anchored_to = Some(target_id);
            self.add_dependent(target_id, line);
        }
        trace!(?line, ?previous, ?target, "anchor changed");
        line
    }

    pub fn anchored_to(&self, line: LineId) -> Option<LineId> {
        self.lines.get(line).and_then(|l| l.anchored_to)
    }

    /// Change the pixel offset; an unchanged value schedules nothing
    pub fn set_offset(&mut self, line: LineId, offset: i32) {
        let Some(l) = self.lines.get_mut(line) else {
            return;
        };
        if l.offset == offset {
            return;
        }
        l.offset = offset;
        let node = l.node;
        self.update(node);
    }

    /// Change the direction a percent line's offset points; ignored for well-known lines
    pub fn set_offset_direction(&mut self, line: LineId, direction: i32) {
        let Some(l) = self.lines.get_mut(line) else {
            return;
        };
        if !l.edge.is_percent() {
            return;
        }
        let direction = if direction < 0 { -1 } else { 1 };
        if l.offset_direction == direction {
            return;
        }
        l.offset_direction = direction;
        let node = l.node;
        self.update(node);
    }

    fn add_dependent(&mut self, source: LineId, dependent: LineId) {
        let Some(s) = self.lines.get_mut(source) else {
            return;
        };
        if s.dependents.contains(&dependent) {
            return;
        }
        s.dependents.push(dependent);
        let node = s.node;
        self.update(node);
    }

    fn remove_dependent(&mut self, source: LineId, dependent: LineId) {
        let Some(s) = self.lines.get_mut(source) else {
            return;
        };
        let Some(index) = s.dependents.iter().position(|d| *d == dependent) else {
            return;
        };
        s.dependents.remove(index);
        let node = s.node;
        self.update(node);
    }

    fn destroy_line(&mut self, line: LineId) {
        let Some(data) = self.lines.remove(line) else {
            return;
        };
        if let Some(source) = data.anchored_to {
            self.remove_dependent(source, line);
        }
        for dependent in data.dependents {
            if let Some(d) = self.lines.get_mut(dependent) {
                if d.anchored_to == Some(line) {
                    d.anchored_to = None;
                }
            }
        }
        trace!(?line, edge = %data.edge, "destroyed anchor line");
    }

    /// Whether `node` may bind to `other`: `other`'s widget is the parent of
    /// `node`'s widget, or both widgets share a parent
    pub fn is_anchor_allowed<H: WidgetHost + ?Sized>(
        &self,
        host: &H,
        node: NodeId,
        other: NodeId,
    ) -> bool {
        let (Some(a), Some(b)) = (self.nodes.get(node), self.nodes.get(other)) else {
            return false;
        };
        let parent = host.parent(a.widget);
        parent == Some(b.widget) || host.parent(b.widget) == parent
    }

    /// Center `node` on `other`, dropping any edge bindings.
    ///
    /// `None` clears every edge and center binding.
    pub fn center_in<H: WidgetHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        other: Option<NodeId>,
    ) {
        if let Some(other) = other {
            if !self.is_anchor_allowed(host, node, other) {
                trace!(?node, ?other, "center_in rejected");
                return;
            }
        }

        self.clear_bindings(node, &[Edge::Left, Edge::Top, Edge::Right, Edge::Bottom]);
        match other {
            Some(other) => {
                for edge in [Edge::HorizontalCenter, Edge::VerticalCenter] {
                    let target = self.line_for(other, edge);
                    let line = self.line_for(node, edge);
                    self.anchor_to(line, Some(target));
                }
            }
            None => self.clear_bindings(node, &[Edge::HorizontalCenter, Edge::VerticalCenter]),
        }
    }

    /// Bind all four edges of `node` to the same edges of `other`.
    ///
    /// `None` clears the edges. Center bindings are always cleared.
    pub fn fill<H: WidgetHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        other: Option<NodeId>,
    ) -> NodeId {
        match other {
            Some(other) => {
                if !self.is_anchor_allowed(host, node, other) {
                    trace!(?node, ?other, "fill rejected");
                    return node;
                }
                for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
                    let target = self.line_for(other, edge);
                    let line = self.line_for(node, edge);
                    self.anchor_to(line, Some(target));
                }
            }
            None => {
                self.clear_bindings(node, &[Edge::Left, Edge::Top, Edge::Right, Edge::Bottom])
            }
        }
        self.clear_bindings(node, &[Edge::HorizontalCenter, Edge::VerticalCenter]);
        node
    }

    fn clear_bindings(&mut self, node: NodeId, edges: &[Edge]) {
        let Some(data) = self.nodes.get(node) else {
            return;
        };
        let lines: Vec<LineId> = edges.iter().filter_map(|e| data.line(*e)).collect();
        for line in lines {
            self.anchor_to(line, None);
        }
    }

    /// Set the default margin and apply it to every created well-known line
    pub fn set_margins(&mut self, node: NodeId, margin: i32) {
        let Some(data) = self.nodes.get_mut(node) else {
            return;
        };
        data.margins = margin;
        let lines: Vec<LineId> = data.well_known.iter().flatten().copied().collect();
        for line in lines {
            self.set_offset(line, margin);
        }
    }

    /// Schedule an update pass for `node`; repeated calls before the next
    /// flush collapse into one
    pub fn update(&mut self, node: NodeId) {
        if !self.nodes.contains_key(node) {
            return;
        }
        if self.pending.insert(node) {
            trace!(?node, "update scheduled");
        }
    }

    pub fn is_update_pending(&self, node: NodeId) -> bool {
        self.pending.contains(&node)
    }

    pub fn pending_updates(&self) -> usize {
        self.pending.len()
    }

    /// Node update passes run since creation
    pub fn update_passes(&self) -> u64 {
        self.passes
    }

    /// Observe the geometry of `node`'s widget; called for every move and every resize
    pub fn on_geometry_changed(&mut self, node: NodeId, observer: impl FnMut(Rect) + 'static) {
        if !self.nodes.contains_key(node) {
            return;
        }
        self.observers
            .entry(node)
            .or_default()
            .push(Box::new(observer));
    }

    /// React to one host notification
    pub fn handle_event<H: WidgetHost + ?Sized>(&mut self, host: &H, event: GeometryEvent) {
        let Some(node) = self.node_for(event.widget) else {
            return;
        };
        match event.kind {
            GeometryEventKind::Moved | GeometryEventKind::Resized => {
                if let Some(rect) = host.geometry(event.widget) {
                    if let Some(observers) = self.observers.get_mut(&node) {
                        for observer in observers.iter_mut() {
                            observer(rect);
                        }
                    }
                }
                self.update(node);
            }
            GeometryEventKind::Destroyed => {
                self.remove_node(node);
            }
        }
    }

    /// Run one update pass for every pending node. Returns the number of passes.
    pub fn flush<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut ran = 0;
        for node in pending {
            let Some(data) = self.nodes.get(node) else {
                continue;
            };
            let lines = data.update_order();
            debug!(?node, lines = lines.len(), "update pass");
            for line in lines {
                self.update_line(host, line, 0);
            }
            self.passes += 1;
            ran += 1;
        }
        ran
    }

    /// Drive the event loop until no events or updates remain.
    ///
    /// Each turn drains the host's events, then flushes. Stops after
    /// `max_turns` turns, leaving leftover work pending. Returns the number of
    /// turns run.
    pub fn process<H: WidgetHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut turns = 0;
        loop {
            for event in host.drain_events() {
                self.handle_event(&*host, event);
            }
            if self.pending.is_empty() {
                break;
            }
            if turns >= self.config.max_turns {
                warn!(
                    turns,
                    pending = self.pending.len(),
                    "anchor layout did not settle"
                );
                break;
            }
            self.flush(host);
            turns += 1;
        }
        turns
    }

    fn update_line<H: WidgetHost + ?Sized>(&mut self, host: &mut H, line: LineId, depth: usize) {
        if depth > self.config.max_cascade_depth {
            warn!(?line, depth, "anchor cascade too deep, stopping");
            return;
        }
        self.resolve_geometry(host, line);
        let Some(l) = self.lines.get(line) else {
            return;
        };
        let dependents = l.dependents.clone();
        for dependent in dependents {
            self.update_line(host, dependent, depth + 1);
        }
    }

    fn resolve_geometry<H: WidgetHost + ?Sized>(&self, host: &mut H, line: LineId) {
        let Some(this) = self.lines.get(line) else {
            return;
        };
        let Some(source) = this.anchored_to.and_then(|s| self.lines.get(s)) else {
            return;
        };
        let (Some(node), Some(source_node)) =
            (self.nodes.get(this.node), self.nodes.get(source.node))
        else {
            return;
        };

        let Some(relation) = relationship(&*host, node.widget, source_node.widget) else {
            trace!(?line, "no relationship to source widget");
            return;
        };
        let source_rect = match relation {
            Relationship::Sibling => host.geometry(source_node.widget),
            Relationship::ParentChild => host.local_rect(source_node.widget),
        };
        let (Some(source_rect), Some(mut geometry)) = (source_rect, host.geometry(node.widget))
        else {
            return;
        };

        let coordinate = source
            .position(source_rect)
            .saturating_add(this.offset_direction.saturating_mul(this.offset));
        let opposite_bound = this
            .edge
            .opposite()
            .and_then(|edge| node.line(edge))
            .and_then(|id| self.lines.get(id))
            .is_some_and(|l| l.is_bound());
        this.apply(&mut geometry, coordinate, opposite_bound);
        host.set_geometry(node.widget, geometry);
    }
}

/// Borrowed handle for chaining line setters
pub struct LineMut<'a> {
    layout: &'a mut AnchorLayout,
    id: LineId,
}

impl LineMut<'_> {
    pub fn anchor_to(self, target: Option<LineId>) -> Self {
        self.layout.anchor_to(self.id, target);
        self
    }

    pub fn set_offset(self, offset: i32) -> Self {
        self.layout.set_offset(self.id, offset);
        self
    }

    pub fn set_margin(self, margin: i32) -> Self {
        self.set_offset(margin)
    }

    pub fn set_offset_direction(self, direction: i32) -> Self {
        self.layout.set_offset_direction(self.id, direction);
        self
    }
}
