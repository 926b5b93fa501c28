//! Anchor lines: the edges, centers and percent lines a widget exposes

use std::fmt;

use slotmap::new_key_type;

use crate::geometry::{Orientation, Rect};

use super::node::NodeId;

new_key_type! {
    /// Handle to an anchor line owned by an [`AnchorLayout`](super::AnchorLayout)
    pub struct LineId;
}

/// Which position on a widget a line tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    /// Vertical line through the horizontal center (an x-coordinate)
    HorizontalCenter,
    /// Horizontal line through the vertical center (a y-coordinate)
    VerticalCenter,
    /// Custom horizontal line at a percentage of the height
    Horizontal,
    /// Custom vertical line at a percentage of the width
    Vertical,
}

impl Edge {
    /// The six well-known edges in slot order
    pub const WELL_KNOWN: [Edge; 6] = [
        Edge::Left,
        Edge::Top,
        Edge::Right,
        Edge::Bottom,
        Edge::HorizontalCenter,
        Edge::VerticalCenter,
    ];

    /// Order in which an update pass visits the well-known lines
    pub(crate) const UPDATE_ORDER: [Edge; 6] = [
        Edge::Left,
        Edge::Top,
        Edge::Right,
        Edge::Bottom,
        Edge::VerticalCenter,
        Edge::HorizontalCenter,
    ];

    /// Percent lines are fixed reference lines and never follow a source
    pub fn is_percent(self) -> bool {
        matches!(self, Edge::Horizontal | Edge::Vertical)
    }

    /// Lines that pin an x-coordinate
    pub fn is_vertical_line(self) -> bool {
        matches!(
            self,
            Edge::Left | Edge::Right | Edge::HorizontalCenter | Edge::Vertical
        )
    }

    /// Lines that pin a y-coordinate
    pub fn is_horizontal_line(self) -> bool {
        matches!(
            self,
            Edge::Top | Edge::Bottom | Edge::VerticalCenter | Edge::Horizontal
        )
    }

    pub fn orientation(self) -> Orientation {
        if self.is_vertical_line() {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Whether a line of this kind may follow a line of kind `target`
    pub fn can_anchor_to(self, target: Edge) -> bool {
        if self.is_vertical_line() && !target.is_vertical_line() {
            return false;
        }
        !(self.is_horizontal_line() && !target.is_horizontal_line())
    }

    /// The edge whose binding decides between moving and resizing
    pub fn opposite(self) -> Option<Edge> {
        match self {
            Edge::Left => Some(Edge::Right),
            Edge::Right => Some(Edge::Left),
            Edge::Top => Some(Edge::Bottom),
            Edge::Bottom => Some(Edge::Top),
            _ => None,
        }
    }

    /// Offsets push right/bottom edges inward, everything else outward
    pub fn default_offset_direction(self) -> i32 {
        match self {
            Edge::Right | Edge::Bottom => -1,
            _ => 1,
        }
    }

    pub(crate) fn slot(self) -> Option<usize> {
        Edge::WELL_KNOWN.iter().position(|e| *e == self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::HorizontalCenter => "horizontal_center",
            Edge::VerticalCenter => "vertical_center",
            Edge::Horizontal => "horizontal",
            Edge::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offset direction requested for a custom line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetDirection {
    /// `Lower` for negative percentages, `Higher` otherwise
    #[default]
    Auto,
    /// Toward smaller coordinates (left / up)
    Lower,
    /// Toward larger coordinates (right / down)
    Higher,
}

impl OffsetDirection {
    pub const LEFT: OffsetDirection = OffsetDirection::Lower;
    pub const UP: OffsetDirection = OffsetDirection::Lower;
    pub const RIGHT: OffsetDirection = OffsetDirection::Higher;
    pub const DOWN: OffsetDirection = OffsetDirection::Higher;

    /// Resolve to ±1 for a line created at `percent`
    pub fn sign_for(self, percent: f64) -> i32 {
        match self {
            OffsetDirection::Auto if percent < 0.0 => -1,
            OffsetDirection::Auto => 1,
            OffsetDirection::Lower => -1,
            OffsetDirection::Higher => 1,
        }
    }
}

/// Map a signed percentage to a fraction of the extent measured from the near edge.
///
/// The magnitude is clamped to `[0, 1]`; negative inputs measure from the far
/// edge, so `-0.25` becomes `0.75`.
pub fn normalize_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    let pc = percent.abs().clamp(0.0, 1.0);
    if percent < 0.0 {
        1.0 - pc
    } else {
        pc
    }
}

/// A single line in the anchor graph
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorLine {
    pub(crate) node: NodeId,
    pub(crate) edge: Edge,
    pub(crate) percent: f64,
    pub(crate) offset: i32,
    pub(crate) offset_direction: i32,
    pub(crate) anchored_to: Option<LineId>,
    pub(crate) dependents: Vec<LineId>,
}

impl AnchorLine {
    pub(crate) fn new(node: NodeId, edge: Edge, percent: f64) -> Self {
        let percent = if edge.is_percent() {
            normalize_percent(percent)
        } else {
            0.0
        };
        Self {
            node,
            edge,
            percent,
            offset: 0,
            offset_direction: edge.default_offset_direction(),
            anchored_to: None,
            dependents: vec![],
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Fraction in `[0, 1]`; zero for well-known lines
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Pixel offset from the source line, also called the margin
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn margin(&self) -> i32 {
        self.offset
    }

    /// +1 or -1
    pub fn offset_direction(&self) -> i32 {
        self.offset_direction
    }

    pub fn anchored_to(&self) -> Option<LineId> {
        self.anchored_to
    }

    /// Lines currently following this one
    pub fn dependents(&self) -> &[LineId] {
        &self.dependents
    }

    pub fn is_bound(&self) -> bool {
        self.anchored_to.is_some()
    }

    /// Coordinate of this line within `rect`, along the axis it pins
    pub fn position(&self, rect: Rect) -> i32 {
        match self.edge {
            Edge::Left => rect.left(),
            Edge::Top => rect.top(),
            Edge::Right => rect.right(),
            Edge::Bottom => rect.bottom(),
            Edge::HorizontalCenter => rect.center_x(),
            Edge::VerticalCenter => rect.center_y(),
            Edge::Horizontal => {
                let y = rect.top() as f64 + rect.height as f64 * self.percent;
                y.round() as i32
            }
            Edge::Vertical => {
                let x = rect.left() as f64 + rect.width as f64 * self.percent;
                x.round() as i32
            }
        }
    }

    /// Write `coordinate` into `geometry` for this edge.
    ///
    /// `opposite_bound` says whether the opposing edge follows a source; if it
    /// does the rect is resized, otherwise it is translated.
    pub(crate) fn apply(&self, geometry: &mut Rect, coordinate: i32, opposite_bound: bool) {
        match (self.edge, opposite_bound) {
            (Edge::Left, false) => geometry.move_left(coordinate),
            (Edge::Left, true) => geometry.set_left(coordinate),
            (Edge::Top, false) => geometry.move_top(coordinate),
            (Edge::Top, true) => geometry.set_top(coordinate),
            (Edge::Right, false) => geometry.move_right(coordinate),
            (Edge::Right, true) => geometry.set_right(coordinate),
            (Edge::Bottom, false) => geometry.move_bottom(coordinate),
            (Edge::Bottom, true) => geometry.set_bottom(coordinate),
            (Edge::HorizontalCenter, _) => geometry.move_center_x(coordinate),
            (Edge::VerticalCenter, _) => geometry.move_center_y(coordinate),
            (Edge::Horizontal | Edge::Vertical, _) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_classes() {
        for edge in [Edge::Left, Edge::Right, Edge::HorizontalCenter, Edge::Vertical] {
            assert!(edge.is_vertical_line(), "{edge}");
            assert!(!edge.is_horizontal_line(), "{edge}");
        }
        for edge in [Edge::Top, Edge::Bottom, Edge::VerticalCenter, Edge::Horizontal] {
            assert!(edge.is_horizontal_line(), "{edge}");
            assert_eq!(edge.orientation(), Orientation::Horizontal);
        }
    }

    #[test]
    fn test_can_anchor_to() {
        assert!(Edge::Left.can_anchor_to(Edge::Right));
        assert!(Edge::Left.can_anchor_to(Edge::HorizontalCenter));
        assert!(Edge::Right.can_anchor_to(Edge::Vertical));
        assert!(Edge::Top.can_anchor_to(Edge::Horizontal));
        assert!(!Edge::Left.can_anchor_to(Edge::Top));
        assert!(!Edge::VerticalCenter.can_anchor_to(Edge::HorizontalCenter));
        assert!(!Edge::Bottom.can_anchor_to(Edge::Vertical));
    }

    #[test]
    fn test_normalize_percent() {
        assert_eq!(normalize_percent(0.25), 0.25);
        assert_eq!(normalize_percent(-0.25), 0.75);
        assert_eq!(normalize_percent(3.0), 1.0);
        assert_eq!(normalize_percent(-3.0), 0.0);
        assert_eq!(normalize_percent(f64::NAN), 0.0);
    }

    #[test]
    fn test_offset_direction_sign() {
        assert_eq!(OffsetDirection::Auto.sign_for(-0.5), -1);
        assert_eq!(OffsetDirection::Auto.sign_for(0.0), 1);
        assert_eq!(OffsetDirection::LEFT.sign_for(0.5), -1);
        assert_eq!(OffsetDirection::DOWN.sign_for(-0.5), 1);
    }

    #[test]
    fn test_default_offset_directions() {
        assert_eq!(Edge::Left.default_offset_direction(), 1);
        assert_eq!(Edge::Top.default_offset_direction(), 1);
        assert_eq!(Edge::Right.default_offset_direction(), -1);
        assert_eq!(Edge::Bottom.default_offset_direction(), -1);
        assert_eq!(Edge::HorizontalCenter.default_offset_direction(), 1);
    }

    #[test]
    fn test_position_in_rect() {
        let rect = Rect::new(10, 20, 400, 200);
        let node = NodeId::default();
        assert_eq!(AnchorLine::new(node, Edge::Right, 0.0).position(rect), 410);
        assert_eq!(AnchorLine::new(node, Edge::VerticalCenter, 0.0).position(rect), 120);
        assert_eq!(AnchorLine::new(node, Edge::Vertical, -0.25).position(rect), 310);
        assert_eq!(AnchorLine::new(node, Edge::Horizontal, 0.25).position(rect), 70);
    }

    #[test]
    fn test_percent_line_position_ignores_its_own_offset() {
        let rect = Rect::new(0, 0, 100, 100);
        let mut line = AnchorLine::new(NodeId::default(), Edge::Vertical, 0.5);
        line.offset = 10;
        line.offset_direction = -1;
        assert_eq!(line.position(rect), 50);
    }

    #[test]
    fn test_apply_moves_or_resizes() {
        let line = AnchorLine::new(NodeId::default(), Edge::Left, 0.0);
        let mut rect = Rect::new(0, 0, 50, 50);
        line.apply(&mut rect, 20, false);
        assert_eq!(rect, Rect::new(20, 0, 50, 50));
        line.apply(&mut rect, 30, true);
        assert_eq!(rect, Rect::new(30, 0, 40, 50));
    }
}
