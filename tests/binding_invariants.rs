//! Bookkeeping guarantees of the anchor graph, through the public API

use anchor_layout::{
    AnchorLayout, Edge, LineId, NodeId, OffsetDirection, Orientation, Rect, WidgetTree,
};
use pretty_assertions::assert_eq;

fn siblings() -> (WidgetTree, AnchorLayout, NodeId, NodeId) {
    let mut tree = WidgetTree::new();
    let p = tree.add("p", None, Rect::new(0, 0, 200, 200)).unwrap();
    let x = tree.add("x", Some(p), Rect::new(0, 0, 10, 10)).unwrap();
    let y = tree.add("y", Some(p), Rect::new(50, 50, 10, 10)).unwrap();
    let mut layout = AnchorLayout::default();
    let x = layout.get_or_create(&mut tree, x).unwrap();
    let y = layout.get_or_create(&mut tree, y).unwrap();
    (tree, layout, x, y)
}

/// Every bound line appears exactly once in its source's dependents
fn assert_consistent(layout: &AnchorLayout) {
    for (_, node) in layout.nodes() {
        let lines = Edge::WELL_KNOWN
            .iter()
            .filter_map(|e| node.line(*e))
            .chain(node.custom_lines().iter().copied());
        for id in lines {
            let line = layout.line(id).unwrap();
            if let Some(source) = line.anchored_to() {
                let count = layout
                    .line(source)
                    .unwrap()
                    .dependents()
                    .iter()
                    .filter(|d| **d == id)
                    .count();
                assert_eq!(count, 1, "{} missing from its source", line.edge());
            }
            for dependent in line.dependents() {
                assert_eq!(layout.anchored_to(*dependent), Some(id));
            }
        }
    }
}

#[test]
fn test_bind_rebind_unbind_keeps_graph_consistent() {
    let (_tree, mut layout, x, y) = siblings();
    let x_left = layout.left(x);
    let y_left = layout.left(y);
    let y_right = layout.right(y);
    let y_center = layout.horizontal_center(y);

    for target in [Some(y_left), Some(y_right), Some(y_right), Some(y_center), None] {
        layout.anchor_to(x_left, target);
        assert_eq!(layout.anchored_to(x_left), target);
        assert_consistent(&layout);
    }
}

#[test]
fn test_redundant_bind_schedules_one_update() {
    let (_tree, mut layout, x, y) = siblings();
    let x_top = layout.top(x);
    let y_bottom = layout.bottom(y);
    layout.anchor_to(x_top, Some(y_bottom));
    layout.anchor_to(x_top, Some(y_bottom));
    assert_eq!(layout.pending_updates(), 1);
    assert!(layout.is_update_pending(y));
}

#[test]
fn test_orientation_guard() {
    let (_tree, mut layout, x, y) = siblings();
    let pairs = [
        (Edge::Left, Edge::Top),
        (Edge::Right, Edge::VerticalCenter),
        (Edge::HorizontalCenter, Edge::Bottom),
        (Edge::Top, Edge::Left),
        (Edge::VerticalCenter, Edge::HorizontalCenter),
    ];
    for (from, to) in pairs {
        let line = layout.line_for(x, from);
        let target = layout.line_for(y, to);
        layout.anchor_to(line, Some(target));
        assert_eq!(layout.anchored_to(line), None, "{from} -> {to}");
    }

    let top = layout.top(x);
    let across = layout.custom_line(y, Orientation::Vertical, 0.5, OffsetDirection::Auto);
    layout.anchor_to(top, Some(across));
    assert_eq!(layout.anchored_to(top), None);
    assert_eq!(layout.pending_updates(), 0);
}

#[test]
fn test_self_bind_guard() {
    let (_tree, mut layout, x, _y) = siblings();
    let custom = layout.custom_line(x, Orientation::Vertical, 0.5, OffsetDirection::Auto);
    let left = layout.left(x);
    let center = layout.horizontal_center(x);
    layout.anchor_to(left, Some(custom));
    layout.anchor_to(left, Some(center));
    assert_eq!(layout.anchored_to(left), None);
}

#[test]
fn test_percent_mapping() {
    let (_tree, mut layout, x, _y) = siblings();
    let cases = [
        (-0.25, OffsetDirection::Auto, 0.75, -1),
        (0.25, OffsetDirection::Auto, 0.25, 1),
        (-1.5, OffsetDirection::Auto, 0.0, -1),
        (0.5, OffsetDirection::LEFT, 0.5, -1),
        (-0.5, OffsetDirection::DOWN, 0.5, 1),
    ];
    for (percent, direction, expected, sign) in cases {
        let id = layout.custom_line(x, Orientation::Horizontal, percent, direction);
        let line = layout.line(id).unwrap();
        assert_eq!(line.percent(), expected, "percent {percent}");
        assert_eq!(line.offset_direction(), sign, "percent {percent}");
        assert_eq!(line.edge(), Edge::Horizontal);
    }
}

#[test]
fn test_percent_edges_have_no_well_known_line() {
    let (_tree, mut layout, x, _y) = siblings();
    assert_eq!(layout.line_for(x, Edge::Horizontal), LineId::default());
    assert_eq!(layout.line_for(x, Edge::Vertical), LineId::default());
    assert_eq!(layout.line_count(), 0);
}

#[test]
fn test_unchanged_offset_is_not_rescheduled() {
    let (mut tree, mut layout, x, _y) = siblings();
    let right = layout.right(x);
    layout.set_offset(right, 4);
    layout.process(&mut tree);
    let passes = layout.update_passes();

    layout.set_offset(right, 4);
    assert_eq!(layout.pending_updates(), 0);
    layout.process(&mut tree);
    assert_eq!(layout.update_passes(), passes);
}

#[test]
fn test_removing_a_node_cleans_both_directions() {
    let (_tree, mut layout, x, y) = siblings();
    let x_left = layout.left(x);
    let y_left = layout.left(y);
    let y_top = layout.top(y);
    let x_top = layout.top(x);
    layout.anchor_to(x_left, Some(y_left));
    layout.anchor_to(y_top, Some(x_top));

    layout.remove_node(y);
    assert_eq!(layout.anchored_to(x_left), None);
    assert!(layout.line(x_top).unwrap().dependents().is_empty());
    assert!(layout.line(y_left).is_none());
    assert_consistent(&layout);
}
