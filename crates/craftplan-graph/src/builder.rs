//! Builds an [`ItemGraph`] from a catalog.
//!
//! Two passes:
//!
//! 1. **Discovery** -- breadth-first from the root item, following the
//!    caller's recipe choice for each item. Each distinct item gets one node
//!    and is expanded once; items at `max_depth` are left unexpanded.
//! 2. **Propagation** -- nodes are visited consumers-first. Each node sizes
//!    its attempts from the total it has accumulated and pushes
//!    `per_attempt × attempts` down every forward edge. Requirements from
//!    several consumers are summed. Feedback edges are sized but do not
//!    propagate.

use crate::config::GraphConfig;
use crate::cycle::find_cyclic_items;
use crate::graph::{ItemGraph, ItemNode, ItemNodeId};
use craftplan_core::quantity::{AttemptCount, attempts_needed};
use craftplan_core::recipe::Recipe;
use craftplan_core::{PlanWarning, RecipeCatalog, RecipeSelection};
use std::collections::{HashMap, VecDeque};

/// Build the item graph for `quantity` units of `recipe`'s main output.
///
/// The root item is always produced by `recipe`; every other item uses the
/// recipe `choices` selects for it, defaulting to the first.
pub fn build_graph(
    catalog: &RecipeCatalog,
    recipe: &Recipe,
    quantity: f64,
    choices: &RecipeSelection,
    config: &GraphConfig,
) -> ItemGraph {
    let root_item = recipe
        .main_output()
        .map(|o| o.item.as_str())
        .unwrap_or(recipe.name.as_str());
    build(catalog, root_item, Some(recipe), quantity, choices, config)
}

/// Build the item graph for `quantity` units of `item`, using the recipe
/// `choices` selects for every item including the root.
pub fn build_graph_for_item(
    catalog: &RecipeCatalog,
    item: &str,
    quantity: f64,
    choices: &RecipeSelection,
    config: &GraphConfig,
) -> ItemGraph {
    build(catalog, item, None, quantity, choices, config)
}

fn choose<'a>(catalog: &'a RecipeCatalog, item: &str, choices: &RecipeSelection) -> Option<&'a Recipe> {
    let options = catalog.recipes_for(item);
    options.get(choices.resolve(item, options.len()))
}

fn build(
    catalog: &RecipeCatalog,
    root_item: &str,
    root_recipe: Option<&Recipe>,
    quantity: f64,
    choices: &RecipeSelection,
    config: &GraphConfig,
) -> ItemGraph {
    let cyclic = find_cyclic_items(catalog);
    let mut graph = ItemGraph::with_root(ItemNode::new(
        root_item,
        0,
        cyclic.contains(root_item),
    ));
    let root = graph.root();

    // -- Discovery --

    let mut chosen: HashMap<ItemNodeId, &Recipe> = HashMap::new();
    let mut queue: VecDeque<(ItemNodeId, usize)> = VecDeque::from([(root, 0)]);

    while let Some((id, depth)) = queue.pop_front() {
        let Some(item) = graph.node(id).map(|n| n.item.clone()) else {
            continue;
        };
        let recipe = if id == root {
            root_recipe.or_else(|| choose(catalog, &item, choices))
        } else {
            choose(catalog, &item, choices)
        };
        let Some(recipe) = recipe else {
            continue;
        };

        if depth >= config.max_depth {
            if let Some(node) = graph.node_mut(id) {
                node.truncated = true;
            }
            tracing::debug!(item = %item, depth, "graph depth limit reached");
            continue;
        }

        if let Some(node) = graph.node_mut(id) {
            node.recipe = Some(recipe.name.clone());
        }
        chosen.insert(id, recipe);

        for ingredient in &recipe.ingredients {
            let target = match graph.node_id(&ingredient.item) {
                Some(existing) => existing,
                None => {
                    let is_cyclic = cyclic.contains(&ingredient.item);
                    let new_id =
                        graph.insert_node(ItemNode::new(&ingredient.item, depth + 1, is_cyclic));
                    queue.push_back((new_id, depth + 1));
                    new_id
                }
            };
            graph.connect(id, target, ingredient.quantity);
        }
    }

    // -- Propagation --

    let (order, feedback) = graph.order_from_root();
    graph.set_feedback(&feedback);
    for &eid in &feedback {
        if let Some(item) = graph
            .edge(eid)
            .and_then(|e| graph.node(e.ingredient))
            .map(|n| n.item.clone())
        {
            tracing::debug!(item = %item, "feedback edge not propagated");
            graph.warn(PlanWarning::CircularRecipe { item });
        }
    }

    if let Some(node) = graph.node_mut(root) {
        node.quantity = quantity;
    }

    for id in order {
        let Some(&recipe) = chosen.get(&id) else {
            continue;
        };
        let Some((item, needed)) = graph.node(id).map(|n| (n.item.clone(), n.quantity)) else {
            continue;
        };

        let count = recipe
            .output_for(&item)
            .or_else(|| recipe.main_output())
            .map(|output| attempts_needed(needed, output))
            .unwrap_or(AttemptCount {
                attempts: 1,
                clamped: true,
            });
        if count.clamped {
            tracing::warn!(recipe = %recipe.name, item = %item, "recipe has no yield; assuming one attempt");
            graph.warn(PlanWarning::ZeroYield {
                recipe: recipe.name.clone(),
                item: item.clone(),
            });
        }
        if let Some(node) = graph.node_mut(id) {
            node.attempts = count.attempts;
        }

        let edges: Vec<_> = graph.ingredients_of(id).to_vec();
        for eid in edges {
            let Some(edge) = graph.edge_mut(eid) else {
                continue;
            };
            edge.quantity = edge.per_attempt * count.attempts as f64;
            let (amount, target, is_feedback) = (edge.quantity, edge.ingredient, edge.feedback);
            if is_feedback {
                continue;
            }
            if let Some(ingredient) = graph.node_mut(target) {
                ingredient.quantity += amount;
            }
        }
    }

    tracing::debug!(
        root = root_item,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "item graph built"
    );
    graph
}
