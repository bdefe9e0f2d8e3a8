use craftplan_core::PlanWarning;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::collections::{HashMap, HashSet};

new_key_type! {
    /// Identifies an item node in an [`ItemGraph`].
    pub struct ItemNodeId;

    /// Identifies a consumer -> ingredient edge in an [`ItemGraph`].
    pub struct ItemEdgeId;
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Adjacency lists for a single node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeAdjacency {
    /// Edges from this node to the items it consumes.
    ingredients: Vec<ItemEdgeId>,
    /// Edges from items that consume this node.
    consumers: Vec<ItemEdgeId>,
}

/// One distinct item in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemNode {
    pub item: String,
    /// Recipe used to produce the item. `None` for raw materials and for
    /// items left unexpanded at the depth limit.
    pub recipe: Option<String>,
    /// Total units required across every consumer.
    pub quantity: f64,
    /// Runs of `recipe` needed for `quantity`.
    pub attempts: u64,
    /// The item is reachable from itself somewhere in the catalog.
    pub cyclic: bool,
    /// The item has recipes but was not expanded because of the depth limit.
    pub truncated: bool,
    /// Breadth-first distance from the root.
    pub depth: usize,
}

impl ItemNode {
    pub(crate) fn new(item: &str, depth: usize, cyclic: bool) -> Self {
        Self {
            item: item.to_string(),
            recipe: None,
            quantity: 0.0,
            attempts: 0,
            cyclic,
            truncated: false,
            depth,
        }
    }

    /// True if nothing below this node was expanded.
    pub fn is_leaf(&self) -> bool {
        self.recipe.is_none()
    }
}

/// A consumer needs `quantity` units of an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEdge {
    pub consumer: ItemNodeId,
    pub ingredient: ItemNodeId,
    /// Units consumed per attempt of the consumer's recipe.
    pub per_attempt: f64,
    /// Units consumed across all attempts of the consumer's recipe.
    pub quantity: f64,
    /// The edge closes a loop back to an item already being produced above
    /// it; its quantity is not pushed further down.
    pub feedback: bool,
}

// ---------------------------------------------------------------------------
// ItemGraph
// ---------------------------------------------------------------------------

/// Deduplicated item-level dependency graph: one node per distinct item,
/// edges from consumers to their ingredients.
///
/// Adjacency is stored in a `SecondaryMap` keyed by `ItemNodeId`, so it stays
/// in step with the primary `nodes` SlotMap.
#[derive(Debug, Clone, Serialize)]
pub struct ItemGraph {
    nodes: SlotMap<ItemNodeId, ItemNode>,
    edges: SlotMap<ItemEdgeId, ItemEdge>,
    adjacency: SecondaryMap<ItemNodeId, NodeAdjacency>,
    #[serde(skip)]
    by_item: HashMap<String, ItemNodeId>,
    root: ItemNodeId,
    warnings: Vec<PlanWarning>,
}

impl ItemGraph {
    /// Create a graph holding only the root item.
    pub(crate) fn with_root(root: ItemNode) -> Self {
        let mut graph = Self {
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            adjacency: SecondaryMap::new(),
            by_item: HashMap::new(),
            root: ItemNodeId::default(),
            warnings: Vec::new(),
        };
        graph.root = graph.insert_node(root);
        graph
    }

    /// Insert a node for an item not yet in the graph.
    pub(crate) fn insert_node(&mut self, node: ItemNode) -> ItemNodeId {
        let item = node.item.clone();
        let id = self.nodes.insert(node);
        self.adjacency.insert(id, NodeAdjacency::default());
        self.by_item.insert(item, id);
        id
    }

    /// Connect `consumer` to `ingredient`. A repeated pair accumulates onto
    /// the existing edge.
    pub(crate) fn connect(
        &mut self,
        consumer: ItemNodeId,
        ingredient: ItemNodeId,
        per_attempt: f64,
    ) -> ItemEdgeId {
        let existing = self.adjacency.get(consumer).and_then(|adj| {
            adj.ingredients
                .iter()
                .copied()
                .find(|&eid| self.edges[eid].ingredient == ingredient)
        });
        if let Some(eid) = existing {
            self.edges[eid].per_attempt += per_attempt;
            return eid;
        }

        let eid = self.edges.insert(ItemEdge {
            consumer,
            ingredient,
            per_attempt,
            quantity: 0.0,
            feedback: false,
        });
        if let Some(adj) = self.adjacency.get_mut(consumer) {
            adj.ingredients.push(eid);
        }
        if let Some(adj) = self.adjacency.get_mut(ingredient) {
            adj.consumers.push(eid);
        }
        eid
    }

    pub(crate) fn warn(&mut self, warning: PlanWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub(crate) fn node_mut(&mut self, id: ItemNodeId) -> Option<&mut ItemNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn edge_mut(&mut self, id: ItemEdgeId) -> Option<&mut ItemEdge> {
        self.edges.get_mut(id)
    }

    // -- Query API --

    pub fn root(&self) -> ItemNodeId {
        self.root
    }

    pub fn node(&self, id: ItemNodeId) -> Option<&ItemNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: ItemEdgeId) -> Option<&ItemEdge> {
        self.edges.get(id)
    }

    pub fn node_id(&self, item: &str) -> Option<ItemNodeId> {
        self.by_item.get(item).copied()
    }

    pub fn node_by_item(&self, item: &str) -> Option<&ItemNode> {
        self.node_id(item).and_then(|id| self.nodes.get(id))
    }

    /// Edges from `node` to the items it consumes.
    pub fn ingredients_of(&self, node: ItemNodeId) -> &[ItemEdgeId] {
        self.adjacency
            .get(node)
            .map(|adj| adj.ingredients.as_slice())
            .unwrap_or(&[])
    }

    /// Edges from items that consume `node`.
    pub fn consumers_of(&self, node: ItemNodeId) -> &[ItemEdgeId] {
        self.adjacency
            .get(node)
            .map(|adj| adj.consumers.as_slice())
            .unwrap_or(&[])
    }

    /// The edge from `consumer` to `ingredient`, if any.
    pub fn edge_between(&self, consumer: &str, ingredient: &str) -> Option<&ItemEdge> {
        let from = self.node_id(consumer)?;
        let to = self.node_id(ingredient)?;
        self.ingredients_of(from)
            .iter()
            .map(|&eid| &self.edges[eid])
            .find(|e| e.ingredient == to)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (ItemNodeId, &ItemNode)> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (ItemEdgeId, &ItemEdge)> {
        self.edges.iter()
    }

    /// Cycles and zero-yield outputs met while building, deduplicated.
    pub fn warnings(&self) -> &[PlanWarning] {
        &self.warnings
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Leaf items and the units required of each, sorted by item name.
    pub fn raw_materials(&self) -> Vec<(&str, f64)> {
        let mut raw: Vec<(&str, f64)> = self
            .nodes
            .values()
            .filter(|n| n.is_leaf())
            .map(|n| (n.item.as_str(), n.quantity))
            .collect();
        raw.sort_by(|a, b| a.0.cmp(b.0));
        raw
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Order nodes so every consumer precedes its ingredients, starting from
    /// the root, and return the edges that close a loop.
    ///
    /// Depth-first from the root in edge insertion order; the result is the
    /// reverse postorder. An edge into a node still on the DFS stack is a
    /// feedback edge. Nodes not reachable from the root are appended in key
    /// order.
    pub fn order_from_root(&self) -> (Vec<ItemNodeId>, Vec<ItemEdgeId>) {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks: SecondaryMap<ItemNodeId, Mark> = SecondaryMap::new();
        for id in self.nodes.keys() {
            marks.insert(id, Mark::Unvisited);
        }

        let mut postorder: Vec<ItemNodeId> = Vec::with_capacity(self.nodes.len());
        let mut feedback: Vec<ItemEdgeId> = Vec::new();

        let starts = std::iter::once(self.root).chain(self.nodes.keys());
        for start in starts {
            if marks.get(start) != Some(&Mark::Unvisited) {
                continue;
            }
            // Stack of (node, index of next ingredient edge to follow).
            let mut stack: Vec<(ItemNodeId, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::OnStack);

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                if let Some(&eid) = self.ingredients_of(node).get(next) {
                    top.1 += 1;
                    let target = self.edges[eid].ingredient;
                    match marks.get(target).copied() {
                        Some(Mark::Unvisited) => {
                            marks.insert(target, Mark::OnStack);
                            stack.push((target, 0));
                        }
                        Some(Mark::OnStack) => feedback.push(eid),
                        _ => {}
                    }
                } else {
                    marks.insert(node, Mark::Done);
                    postorder.push(node);
                    stack.pop();
                }
            }
        }

        postorder.reverse();
        (postorder, feedback)
    }

    /// Mark the given edges as feedback edges and clear the flag elsewhere.
    pub(crate) fn set_feedback(&mut self, feedback: &[ItemEdgeId]) {
        let set: HashSet<ItemEdgeId> = feedback.iter().copied().collect();
        for (eid, edge) in self.edges.iter_mut() {
            edge.feedback = set.contains(&eid);
        }
    }
}
