//! Layered layout for rendering an [`ItemGraph`].
//!
//! Raw materials sit on level 0 and every producer sits one level above its
//! highest ingredient. Feedback edges are ignored, so an item that closes a
//! loop stays on the level its own ingredients put it on.

use crate::config::GraphConfig;
use crate::graph::{ItemGraph, ItemNodeId};
use serde::Serialize;
use slotmap::SecondaryMap;
use std::collections::BTreeMap;

/// A node with its level and canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: ItemNodeId,
    pub item: String,
    pub level: usize,
    pub x: f64,
    pub y: f64,
}

/// Level of every node: 0 with no forward ingredient edges, otherwise one
/// more than the highest ingredient.
pub fn levels(graph: &ItemGraph) -> SecondaryMap<ItemNodeId, usize> {
    let (order, _) = graph.order_from_root();
    let mut levels: SecondaryMap<ItemNodeId, usize> = SecondaryMap::new();

    // Ingredients come after their consumers in `order`, so walk it backwards.
    for &id in order.iter().rev() {
        let level = graph
            .ingredients_of(id)
            .iter()
            .filter_map(|&eid| graph.edge(eid))
            .filter(|edge| !edge.feedback)
            .filter_map(|edge| levels.get(edge.ingredient))
            .map(|l| l + 1)
            .max()
            .unwrap_or(0);
        levels.insert(id, level);
    }
    levels
}

/// Position every node. Within a level, nodes are sorted by item name and
/// centered on `x = 0`; `y` grows with the level.
pub fn layout(graph: &ItemGraph, config: &GraphConfig) -> Vec<PositionedNode> {
    let levels = levels(graph);

    let mut by_level: BTreeMap<usize, Vec<(&str, ItemNodeId)>> = BTreeMap::new();
    for (id, node) in graph.nodes() {
        let level = levels.get(id).copied().unwrap_or(0);
        by_level
            .entry(level)
            .or_default()
            .push((node.item.as_str(), id));
    }

    let mut positioned = Vec::with_capacity(graph.node_count());
    for (level, mut row) in by_level {
        row.sort_by(|a, b| a.0.cmp(b.0));
        let center = (row.len() as f64 - 1.0) / 2.0;
        for (i, (item, id)) in row.into_iter().enumerate() {
            positioned.push(PositionedNode {
                id,
                item: item.to_string(),
                level,
                x: (i as f64 - center) * config.node_spacing,
                y: level as f64 * config.level_spacing,
            });
        }
    }
    positioned
}
