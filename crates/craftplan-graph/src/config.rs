use serde::{Deserialize, Serialize};

/// Default expansion depth below the root.
pub const MAX_DEPTH: usize = 6;

/// Tunables for graph discovery and layout. Every field has a default so
/// partial config files deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Items at this depth are not expanded further.
    pub max_depth: usize,
    /// Horizontal distance between neighbouring nodes on one level.
    pub node_spacing: f64,
    /// Vertical distance between levels.
    pub level_spacing: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            node_spacing: 200.0,
            level_spacing: 120.0,
        }
    }
}
