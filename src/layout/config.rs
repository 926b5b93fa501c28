//! Configuration for the anchor layout engine

use serde::Deserialize;

/// Configuration options for anchor resolution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Margin given to well-known lines of newly created nodes
    pub default_margin: i32,

    /// Deepest dependent chain a single cascade will follow
    pub max_cascade_depth: usize,

    /// Event-loop turns `process` runs before giving up on a graph that never settles
    pub max_turns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_margin: 0,
            max_cascade_depth: 256,
            max_turns: 64,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the margin applied to new nodes
    pub fn with_default_margin(mut self, margin: i32) -> Self {
        self.default_margin = margin;
        self
    }

    /// Set the cascade depth limit
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = depth;
        self
    }

    /// Set the event-loop turn limit
    pub fn with_max_turns(mut self, turns: usize) -> Self {
        self.max_turns = turns;
        self
    }
}
