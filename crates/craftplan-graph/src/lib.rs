//! Craftplan Graph -- deduplicated item dependency graphs for visualization.
//!
//! Where the recipe tree repeats an item under every consumer, the item graph
//! holds one node per distinct item. Requirements from several consumers are
//! summed into that node, loops are flagged with catalog-wide cycle
//! detection, and [`layout::layout`] assigns each node a level and canvas
//! position.

pub mod builder;
pub mod config;
pub mod cycle;
pub mod graph;
pub mod layout;

pub use builder::{build_graph, build_graph_for_item};
pub use config::GraphConfig;
pub use cycle::find_cyclic_items;
pub use graph::{ItemEdge, ItemEdgeId, ItemGraph, ItemNode, ItemNodeId};
pub use layout::{PositionedNode, layout};
