//! Single-recipe calculator.
//!
//! Sizes one recipe for a requested amount of its main output: expected
//! attempts, the range-aware attempt bounds, the recipe's own effort or
//! passive time, and the fully expanded ingredient subtrees.

use crate::catalog::RecipeCatalog;
use crate::config::PlannerConfig;
use crate::quantity::{AttemptRange, Attempts, attempt_range};
use crate::recipe::{Cost, Recipe};
use crate::selection::RecipeSelection;
use crate::totals::{Accumulator, RecipeTotals, StructureQueue};
use crate::tree::{IngredientNode, TreeBuilder};
use crate::warning::PlanWarning;
use serde::Serialize;

/// The breakdown of one recipe for a requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCalculation {
    pub recipe: String,
    /// Units of the main output requested.
    pub quantity: f64,
    /// Attempts sized against the main output's average yield.
    pub attempts: Attempts,
    /// Best and worst case for a ranged main output.
    pub attempt_range: Option<AttemptRange>,
    /// Effort of this recipe alone, for synchronous recipes.
    pub effort: Option<f64>,
    /// Batched seconds of this recipe alone, for passive recipes.
    pub passive_time: Option<f64>,
    /// Structure running this recipe, for passive recipes.
    pub structure: Option<String>,
    /// Per-attempt cost of this recipe.
    pub cost: Cost,
    pub ingredients: Vec<IngredientNode>,
    pub warnings: Vec<PlanWarning>,
}

impl RecipeCalculation {
    /// Totals for the ingredient subtrees plus this recipe's own cost.
    ///
    /// Every subtree and the recipe itself feed one set of structure queues,
    /// so the result matches aggregating a tree rooted at this recipe.
    pub fn totals(&self, selection: &RecipeSelection, config: &PlannerConfig) -> RecipeTotals {
        let mut acc = Accumulator::new(selection, config);
        acc.charge(&self.cost, self.attempts);
        for ingredient in &self.ingredients {
            acc.visit(ingredient);
        }
        acc.finish()
    }
}

/// Size `recipe` for `quantity` units of its main output.
pub fn calculate(
    catalog: &RecipeCatalog,
    recipe: &Recipe,
    quantity: f64,
    config: &PlannerConfig,
) -> RecipeCalculation {
    let expansion = TreeBuilder::new(catalog).expand_recipe(recipe, quantity);

    let attempt_range = recipe
        .main_output()
        .filter(|output| output.quantity.is_ranged())
        .map(|output| attempt_range(quantity, output));

    let (effort, passive_time, structure) = match &recipe.cost {
        Cost::Synchronous { effort } => {
            (Some(config.effort_for(*effort, expansion.attempts)), None, None)
        }
        Cost::Asynchronous { seconds, structure } => {
            let mut queue = StructureQueue::new();
            queue.push(*seconds, expansion.attempts);
            (
                None,
                Some(queue.batched_time(config.slots())),
                Some(structure.clone()),
            )
        }
    };

    RecipeCalculation {
        recipe: recipe.name.clone(),
        quantity,
        attempts: expansion.attempts,
        attempt_range,
        effort,
        passive_time,
        structure,
        cost: recipe.cost.clone(),
        ingredients: expansion.ingredients,
        warnings: expansion.warnings,
    }
}
