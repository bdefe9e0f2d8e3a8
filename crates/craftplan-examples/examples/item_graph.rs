//! Item graph example: deduplicated nodes, summed requirements, layout.
//!
//! Builds the item graph for a Crate from the sample catalog, prints each
//! node with its position, and dumps the layout as JSON for a renderer.
//!
//! Run with: `cargo run -p craftplan-examples --example item_graph`

use craftplan_core::RecipeSelection;
use craftplan_data::load_catalog;
use craftplan_graph::{build_graph, layout};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let data = load_catalog(&dir).unwrap();

    let recipe = data.catalog.recipe_by_name("Build Crate").unwrap();
    let graph = build_graph(
        &data.catalog,
        recipe,
        3.0,
        &RecipeSelection::new(),
        &data.graph_config,
    );

    println!("=== Item graph for 3 Crate ===\n");
    let positioned = layout(&graph, &data.graph_config);
    for p in &positioned {
        let Some(node) = graph.node(p.id) else {
            continue;
        };
        let made_by = node.recipe.as_deref().unwrap_or("raw");
        println!(
            "  L{} ({:>6.1}, {:>6.1})  {} x{} [{made_by}, {} attempt(s)]",
            p.level, p.x, p.y, node.item, node.quantity, node.attempts
        );
    }

    println!("\n--- edges ---");
    for (_, edge) in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(edge.consumer), graph.node(edge.ingredient)) else {
            continue;
        };
        let marker = if edge.feedback { " (loop)" } else { "" };
        println!("  {} -> {}: {}{marker}", from.item, to.item, edge.quantity);
    }

    for warning in graph.warnings() {
        println!("warning: {warning}");
    }

    println!("\n--- layout JSON ---");
    println!("{}", serde_json::to_string_pretty(&positioned).unwrap());
}
