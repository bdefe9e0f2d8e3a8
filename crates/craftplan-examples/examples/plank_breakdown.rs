//! Recipe breakdown example: tree, alternatives, and aggregated totals.
//!
//! Loads the sample catalog in `data/`, expands a Crate into its recipe
//! tree, and prints the totals for the default selection and for the
//! bamboo alternative for Plank.
//!
//! Run with: `cargo run -p craftplan-examples --example plank_breakdown`
//! Set `RUST_LOG=debug` to see catalog and tree diagnostics.

use craftplan_core::*;
use craftplan_data::load_catalog;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn print_node(node: &IngredientNode, selection: &RecipeSelection, indent: usize) {
    let pad = "  ".repeat(indent);
    match node.selected_path(selection) {
        None => println!("{pad}{} x{} (raw)", node.item, node.quantity),
        Some(path) => {
            let alternatives = node.recipe_path_options.len();
            println!(
                "{pad}{} x{} <- {} x{} [{} option(s)]",
                node.item, node.quantity, path.recipe.name, path.attempts, alternatives
            );
            for child in &path.ingredients {
                print_node(child, selection, indent + 1);
            }
        }
    }
}

fn print_totals(label: &str, totals: &RecipeTotals) {
    println!("--- {label} ---");
    for (item, qty) in &totals.raw_materials {
        println!("  raw   {item}: {qty}");
    }
    println!("  effort: {}", totals.total_effort);
    for (structure, secs) in &totals.time_by_structure {
        println!("  time  {structure}: {secs}s");
    }
    println!("  total time: {}s\n", totals.total_time);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let data = load_catalog(&dir).unwrap();
    tracing::info!(recipes = data.catalog.len(), "catalog ready");

    // --- Default selection ---

    let tree = TreeBuilder::new(&data.catalog).build("Crate", 2.0);
    for warning in &tree.warnings {
        println!("warning: {warning}");
    }

    let default = RecipeSelection::new();
    println!("=== Crate x2, default recipes ===\n");
    print_node(&tree.root, &default, 0);
    println!();
    print_totals("default", &compute_totals_with(&tree.root, &default, &data.config));

    // --- Bamboo planks ---

    let bamboo = RecipeSelection::new().with("Plank", 1);
    println!("=== Crate x2, Plank from Bamboo ===\n");
    print_node(&tree.root, &bamboo, 0);
    println!();
    print_totals("bamboo", &compute_totals_with(&tree.root, &bamboo, &data.config));

    // --- Single recipe ---

    let nails = data.catalog.recipe_by_name("Forge Nails").unwrap();
    let calc = calculate(&data.catalog, nails, 25.0, &data.config);
    println!("=== Forge Nails for 25 Nail ===");
    println!("  attempts: {}", calc.attempts);
    if let Some(range) = calc.attempt_range {
        match range.max {
            Some(max) => println!("  range: {}..={max}", range.min),
            None => println!("  range: {}.. (unbounded)", range.min),
        }
    }
    print_totals("forge nails", &calc.totals(&default, &data.config));
}
