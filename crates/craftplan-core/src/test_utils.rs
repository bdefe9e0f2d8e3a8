//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::RecipeCatalog;
use crate::recipe::*;

// ===========================================================================
// Recipe constructors
// ===========================================================================

fn ingredients(list: &[(&str, f64)]) -> Vec<Ingredient> {
    list.iter()
        .map(|&(item, qty)| Ingredient::new(item, qty))
        .collect()
}

/// An active recipe performed by a profession.
pub fn effort_recipe(name: &str, inputs: &[(&str, f64)], outputs: Vec<Output>, effort: f64) -> Recipe {
    Recipe {
        name: name.to_string(),
        tier: 1,
        ingredients: ingredients(inputs),
        outputs,
        cost: Cost::Synchronous { effort },
        classification: Classification::Profession("Crafting".to_string()),
    }
}

/// A passive recipe run by a structure.
pub fn passive_recipe(
    name: &str,
    inputs: &[(&str, f64)],
    outputs: Vec<Output>,
    seconds: f64,
    structure: &str,
) -> Recipe {
    Recipe {
        name: name.to_string(),
        tier: 1,
        ingredients: ingredients(inputs),
        outputs,
        cost: Cost::Asynchronous {
            seconds,
            structure: structure.to_string(),
        },
        classification: Classification::Structure(structure.to_string()),
    }
}

fn catalog(recipes: Vec<Recipe>) -> RecipeCatalog {
    RecipeCatalog::from_recipes(recipes).expect("test recipes have outputs")
}

// ===========================================================================
// Sample catalogs
// ===========================================================================

/// Plank <- Stripped Wood (effort 40); Stripped Wood <- 3 Log (effort 50).
pub fn plank_catalog() -> RecipeCatalog {
    catalog(vec![
        effort_recipe(
            "Saw Plank",
            &[("Stripped Wood", 1.0)],
            vec![Output::fixed("Plank", 1.0)],
            40.0,
        ),
        effort_recipe(
            "Strip Log",
            &[("Log", 3.0)],
            vec![Output::fixed("Stripped Wood", 1.0)],
            50.0,
        ),
    ])
}

/// Brick: 2 Clay -> 5 Brick.
pub fn brick_catalog() -> RecipeCatalog {
    catalog(vec![effort_recipe(
        "Fire Brick",
        &[("Clay", 2.0)],
        vec![Output::fixed("Brick", 5.0)],
        10.0,
    )])
}

/// Refined Brick consumes one of itself plus 2 Brick and yields 2.
pub fn self_cycle_catalog() -> RecipeCatalog {
    catalog(vec![effort_recipe(
        "Refine Brick",
        &[("Refined Brick", 1.0), ("Brick", 2.0)],
        vec![Output::fixed("Refined Brick", 2.0)],
        10.0,
    )])
}

/// Alpha <- Beta <- Alpha.
pub fn mutual_cycle_catalog() -> RecipeCatalog {
    catalog(vec![
        effort_recipe("Make Alpha", &[("Beta", 1.0)], vec![Output::fixed("Alpha", 1.0)], 1.0),
        effort_recipe("Make Beta", &[("Alpha", 1.0)], vec![Output::fixed("Beta", 1.0)], 1.0),
    ])
}

/// Bench <- 4 Leg + 1 Seat; Leg <- 1 Plank; Seat <- 2 Plank; Plank <- 1 Log.
pub fn bench_catalog() -> RecipeCatalog {
    catalog(vec![
        effort_recipe(
            "Build Bench",
            &[("Leg", 4.0), ("Seat", 1.0)],
            vec![Output::fixed("Bench", 1.0)],
            30.0,
        ),
        effort_recipe("Carve Leg", &[("Plank", 1.0)], vec![Output::fixed("Leg", 1.0)], 5.0),
        effort_recipe("Carve Seat", &[("Plank", 2.0)], vec![Output::fixed("Seat", 1.0)], 8.0),
        effort_recipe("Saw Plank", &[("Log", 1.0)], vec![Output::fixed("Plank", 1.0)], 2.0),
    ])
}

/// Plank from 1 Log (effort 10) or from 3 Bamboo yielding 2 (effort 25).
pub fn alternative_catalog() -> RecipeCatalog {
    catalog(vec![
        effort_recipe("Saw Plank", &[("Log", 1.0)], vec![Output::fixed("Plank", 1.0)], 10.0),
        effort_recipe(
            "Split Bamboo",
            &[("Bamboo", 3.0)],
            vec![Output::fixed("Plank", 2.0)],
            25.0,
        ),
    ])
}

/// Stardust is listed but never actually produced.
pub fn zero_yield_catalog() -> RecipeCatalog {
    catalog(vec![effort_recipe(
        "Wish",
        &[("Hope", 1.0)],
        vec![Output::ranged("Stardust", 0.0, 0.0).with_chance(0.0)],
        1.0,
    )])
}

/// Saw Plank yields 1 Plank and, half the time, 2 Sawdust.
pub fn byproduct_catalog() -> RecipeCatalog {
    catalog(vec![effort_recipe(
        "Saw Plank",
        &[("Log", 1.0)],
        vec![
            Output::fixed("Plank", 1.0),
            Output::fixed("Sawdust", 2.0).with_chance(0.5),
        ],
        10.0,
    )])
}

/// Iron Bar smelted from 2 Iron Ore in a Smelter (300 s); Nail forged from
/// 1 Iron Bar yielding 1-3 (effort 15, ranged); Charcoal burnt in a Kiln
/// (120 s) from 1 Log.
pub fn smelting_catalog() -> RecipeCatalog {
    catalog(vec![
        passive_recipe(
            "Smelt Iron",
            &[("Iron Ore", 2.0), ("Charcoal", 1.0)],
            vec![Output::fixed("Iron Bar", 1.0)],
            300.0,
            "Smelter",
        ),
        effort_recipe(
            "Forge Nails",
            &[("Iron Bar", 1.0)],
            vec![Output::ranged("Nail", 1.0, 3.0)],
            15.0,
        ),
        passive_recipe(
            "Burn Charcoal",
            &[("Log", 1.0)],
            vec![Output::fixed("Charcoal", 1.0)],
            120.0,
            "Kiln",
        ),
    ])
}
