//! Criterion benchmarks for tree building and aggregation.
//!
//! Two benchmark groups:
//! - `build`: expand a tiered catalog where every tier has two alternatives
//! - `totals`: re-aggregate the same tree under two selections

use craftplan_core::recipe::Output;
use craftplan_core::test_utils::*;
use craftplan_core::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Build a catalog of `tiers` tiers. Each tier item has an active recipe and
/// a passive recipe, each consuming two units of the previous tier plus a
/// tier-specific raw material.
fn tiered_catalog(tiers: usize) -> RecipeCatalog {
    let mut builder = CatalogBuilder::new();
    for t in 1..=tiers {
        let item = format!("Tier{t}");
        let prev = format!("Tier{}", t - 1);
        let raw = format!("Raw{t}");
        builder
            .register(effort_recipe(
                &format!("Craft {item}"),
                &[(prev.as_str(), 2.0), (raw.as_str(), 1.0)],
                vec![Output::fixed(item.clone(), 1.0)],
                10.0 * t as f64,
            ))
            .expect("outputs present");
        builder
            .register(passive_recipe(
                &format!("Cook {item}"),
                &[(prev.as_str(), 3.0), (raw.as_str(), 1.0)],
                vec![Output::ranged(item.clone(), 1.0, 3.0)],
                60.0 * t as f64,
                if t % 2 == 0 { "Oven" } else { "Kiln" },
            ))
            .expect("outputs present");
    }
    builder.build()
}

fn bench_build(c: &mut Criterion) {
    let catalog = tiered_catalog(7);
    c.bench_function("build_tiered_7", |b| {
        b.iter(|| build_recipe_tree(black_box(&catalog), black_box("Tier7"), black_box(100.0)))
    });
}

fn bench_totals(c: &mut Criterion) {
    let catalog = tiered_catalog(7);
    let tree = build_recipe_tree(&catalog, "Tier7", 100.0);
    let active = RecipeSelection::new();
    let passive: RecipeSelection = (1..=7).map(|t| (format!("Tier{t}"), 1)).collect();

    let mut group = c.benchmark_group("totals");
    group.bench_function("all_active", |b| {
        b.iter(|| compute_totals(black_box(&tree), black_box(&active)))
    });
    group.bench_function("all_passive", |b| {
        b.iter(|| compute_totals(black_box(&tree), black_box(&passive)))
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_totals);
criterion_main!(benches);
