//! Per-widget layout nodes

use slotmap::new_key_type;

use crate::host::WidgetId;

use super::line::{Edge, LineId};

new_key_type! {
    /// Handle to a layout node owned by an [`AnchorLayout`](super::AnchorLayout)
    pub struct NodeId;
}

/// The anchor lines of one widget
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub(crate) widget: WidgetId,
    pub(crate) margins: i32,
    pub(crate) well_known: [Option<LineId>; 6],
    pub(crate) custom_lines: Vec<LineId>,
}

impl LayoutNode {
    pub(crate) fn new(widget: WidgetId, margins: i32) -> Self {
        Self {
            widget,
            margins,
            well_known: [None; 6],
            custom_lines: vec![],
        }
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Default margin for well-known lines
    pub fn margins(&self) -> i32 {
        self.margins
    }

    /// The well-known line for `edge`, if it has been created
    pub fn line(&self, edge: Edge) -> Option<LineId> {
        edge.slot().and_then(|slot| self.well_known[slot])
    }

    pub fn custom_lines(&self) -> &[LineId] {
        &self.custom_lines
    }

    /// Created well-known lines in update order, then custom lines
    pub(crate) fn update_order(&self) -> Vec<LineId> {
        Edge::UPDATE_ORDER
            .iter()
            .filter_map(|edge| self.line(*edge))
            .chain(self.custom_lines.iter().copied())
            .collect()
    }

    /// Every line owned by this node
    pub(crate) fn all_lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.well_known
            .iter()
            .flatten()
            .copied()
            .chain(self.custom_lines.iter().copied())
    }
}
