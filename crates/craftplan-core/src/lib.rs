//! Craftplan Core -- recipe-tree resolution and aggregation for crafting games.
//!
//! Given a catalog of recipes, this crate expands a target item and quantity
//! into a tree of production steps and aggregates that tree into raw
//! materials, labor effort, and passive production time.
//!
//! # Pipeline
//!
//! 1. **Catalog** -- recipes are registered once through
//!    [`catalog::CatalogBuilder`] and frozen into an immutable
//!    [`catalog::RecipeCatalog`] keyed by output item.
//! 2. **Tree** -- [`tree::build_recipe_tree`] expands an item into an
//!    [`tree::IngredientNode`] holding every alternative recipe. Cycles are
//!    cut per branch using the set of ancestors on the current path.
//! 3. **Totals** -- [`totals::compute_totals`] walks the tree under a
//!    caller-owned [`selection::RecipeSelection`] and returns
//!    [`totals::RecipeTotals`].
//!
//! ```rust,ignore
//! let tree = build_recipe_tree(&catalog, "Plank", 5.0);
//! let totals = compute_totals(&tree, &RecipeSelection::new());
//! assert_eq!(totals.raw("Log"), 15.0);
//! ```
//!
//! All computation is pure and infallible: unknown items are raw materials,
//! cyclic items become leaves, and outputs with no yield are sized at one
//! attempt. Those resolutions are reported as [`warning::PlanWarning`]s.

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod quantity;
pub mod recipe;
pub mod selection;
pub mod totals;
pub mod tree;
pub mod warning;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use calculator::{RecipeCalculation, calculate};
pub use catalog::{CatalogBuilder, CatalogError, CatalogWarning, RecipeCatalog};
pub use config::{EffortScaling, PARALLEL_SLOTS_PER_STRUCTURE, PlannerConfig};
pub use selection::RecipeSelection;
pub use totals::{RecipeTotals, compute_totals, compute_totals_with};
pub use tree::{IngredientNode, RecipePath, RecipeTree, TreeBuilder, build_recipe_tree, get_full_recipe_tree};
pub use warning::PlanWarning;
