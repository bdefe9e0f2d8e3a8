//! Recipe tree construction.
//!
//! [`TreeBuilder`] expands a target item and quantity into a tree of
//! [`IngredientNode`]s. Every node that can be crafted carries one
//! [`RecipePath`] per alternative recipe, each with its own fully expanded
//! ingredient subtree, so switching the selected recipe for an item only
//! requires re-aggregating the tree (see [`crate::totals`]), never
//! rebuilding it.
//!
//! Cycles are cut using the set of items on the current path from the root:
//! an item that reappears below itself becomes a leaf at that position only.
//! Sibling branches never see each other's path.

use crate::catalog::RecipeCatalog;
use crate::quantity::{Attempts, attempts_needed};
use crate::recipe::Recipe;
use crate::selection::RecipeSelection;
use crate::warning::{PlanWarning, Warnings};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Tree types
// ---------------------------------------------------------------------------

/// One item requirement at one position in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientNode {
    pub item: String,
    /// Units of the item required here, not the number of crafting attempts.
    pub quantity: f64,
    /// Alternatives in catalog order. Empty for raw materials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipe_path_options: Vec<RecipePath>,
    /// Set when the item already appears among this node's ancestors and
    /// expansion stopped here.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cyclic: bool,
}

/// One way of producing a node's item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePath {
    pub recipe: Recipe,
    /// Runs of `recipe` needed for the parent node's quantity.
    pub attempts: Attempts,
    /// Ingredient requirements, already scaled by `attempts`.
    pub ingredients: Vec<IngredientNode>,
}

impl IngredientNode {
    /// A raw-material node.
    pub fn leaf(item: impl Into<String>, quantity: f64) -> Self {
        Self {
            item: item.into(),
            quantity,
            recipe_path_options: Vec::new(),
            cyclic: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.recipe_path_options.is_empty()
    }

    /// The alternative chosen by `selection`, or `None` for a leaf.
    pub fn selected_path(&self, selection: &RecipeSelection) -> Option<&RecipePath> {
        let idx = selection.resolve(&self.item, self.recipe_path_options.len());
        self.recipe_path_options.get(idx)
    }

    /// Total number of nodes in this subtree, counting every alternative.
    pub fn node_count(&self) -> usize {
        1 + self
            .recipe_path_options
            .iter()
            .flat_map(|path| path.ingredients.iter())
            .map(IngredientNode::node_count)
            .sum::<usize>()
    }

    /// Find the first node for `item` along the selected paths, depth-first.
    pub fn find(&self, item: &str, selection: &RecipeSelection) -> Option<&IngredientNode> {
        if self.item == item {
            return Some(self);
        }
        self.selected_path(selection)?
            .ingredients
            .iter()
            .find_map(|child| child.find(item, selection))
    }
}

/// A built tree together with the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeTree {
    pub root: IngredientNode,
    pub warnings: Vec<PlanWarning>,
}

/// The expanded ingredients of a single recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeExpansion {
    pub attempts: Attempts,
    pub ingredients: Vec<IngredientNode>,
    pub warnings: Vec<PlanWarning>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Expands items into recipe trees against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    catalog: &'a RecipeCatalog,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(catalog: &'a RecipeCatalog) -> Self {
        Self { catalog }
    }

    /// Expand `quantity` units of `item`.
    pub fn build(&self, item: &str, quantity: f64) -> RecipeTree {
        let mut warnings = Warnings::default();
        let root = self.expand(item, quantity, &HashSet::new(), &mut warnings);
        let warnings = warnings.into_vec();
        tracing::debug!(
            item,
            quantity,
            nodes = root.node_count(),
            warnings = warnings.len(),
            "built recipe tree"
        );
        RecipeTree { root, warnings }
    }

    /// Expand the ingredients of `recipe` when producing `quantity` units of
    /// its main output. The main output item counts as the first ancestor.
    pub fn expand_recipe(&self, recipe: &Recipe, quantity: f64) -> RecipeExpansion {
        let mut warnings = Warnings::default();
        let mut ancestors = HashSet::new();
        let item = match recipe.main_output() {
            Some(output) => {
                ancestors.insert(output.item.clone());
                output.item.as_str()
            }
            None => recipe.name.as_str(),
        };
        let path = self.expand_path(recipe, item, quantity, &ancestors, &mut warnings);
        RecipeExpansion {
            attempts: path.attempts,
            ingredients: path.ingredients,
            warnings: warnings.into_vec(),
        }
    }

    fn expand(
        &self,
        item: &str,
        quantity: f64,
        ancestors: &HashSet<String>,
        warnings: &mut Warnings,
    ) -> IngredientNode {
        if ancestors.contains(item) {
            tracing::debug!(item, "circular recipe cut at repeated item");
            warnings.push(PlanWarning::CircularRecipe {
                item: item.to_string(),
            });
            return IngredientNode {
                cyclic: true,
                ..IngredientNode::leaf(item, quantity)
            };
        }

        let recipes = self.catalog.recipes_for(item);
        if recipes.is_empty() {
            return IngredientNode::leaf(item, quantity);
        }

        let mut path = ancestors.clone();
        path.insert(item.to_string());

        let recipe_path_options = recipes
            .iter()
            .map(|recipe| self.expand_path(recipe, item, quantity, &path, warnings))
            .collect();

        IngredientNode {
            item: item.to_string(),
            quantity,
            recipe_path_options,
            cyclic: false,
        }
    }

    /// `ancestors` must already contain `item`.
    fn expand_path(
        &self,
        recipe: &Recipe,
        item: &str,
        quantity: f64,
        ancestors: &HashSet<String>,
        warnings: &mut Warnings,
    ) -> RecipePath {
        let attempts = match recipe.output_for(item).or_else(|| recipe.main_output()) {
            Some(output) => {
                let count = attempts_needed(quantity, output);
                if count.clamped {
                    tracing::warn!(recipe = %recipe.name, item, "recipe has no positive yield");
                    warnings.push(PlanWarning::ZeroYield {
                        recipe: recipe.name.clone(),
                        item: item.to_string(),
                    });
                }
                count.attempts
            }
            // Outputs are never empty in a catalog; a bare recipe runs once.
            None => 1,
        };

        let ingredients = recipe
            .ingredients
            .iter()
            .map(|ingredient| {
                self.expand(
                    &ingredient.item,
                    ingredient.quantity * attempts as f64,
                    ancestors,
                    warnings,
                )
            })
            .collect();

        RecipePath {
            recipe: recipe.clone(),
            attempts,
            ingredients,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Expand `quantity` units of `item` into a tree holding every alternative.
pub fn build_recipe_tree(catalog: &RecipeCatalog, item: &str, quantity: f64) -> IngredientNode {
    TreeBuilder::new(catalog).build(item, quantity).root
}

/// Expand the ingredients of `recipe` directly, for `quantity` units of its
/// main output.
pub fn get_full_recipe_tree(
    catalog: &RecipeCatalog,
    recipe: &Recipe,
    quantity: f64,
) -> Vec<IngredientNode> {
    TreeBuilder::new(catalog)
        .expand_recipe(recipe, quantity)
        .ingredients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn unknown_item_is_leaf() {
        let catalog = plank_catalog();
        for q in [1.0, 7.0, 1000.0] {
            let node = build_recipe_tree(&catalog, "Unobtainium", q);
            assert_eq!(node, IngredientNode::leaf("Unobtainium", q));
        }
    }

    #[test]
    fn plank_chain_quantities() {
        let catalog = plank_catalog();
        let tree = build_recipe_tree(&catalog, "Plank", 5.0);
        assert_eq!(tree.quantity, 5.0);

        let stripped = &tree.recipe_path_options[0].ingredients[0];
        assert_eq!(stripped.item, "Stripped Wood");
        assert_eq!(stripped.quantity, 5.0);

        let log = &stripped.recipe_path_options[0].ingredients[0];
        assert_eq!(log.item, "Log");
        assert_eq!(log.quantity, 15.0);
        assert!(log.is_leaf());
    }

    #[test]
    fn attempts_scale_ingredients() {
        // 5 bricks per attempt, 12 wanted -> 3 attempts -> 6 clay.
        let catalog = brick_catalog();
        let tree = build_recipe_tree(&catalog, "Brick", 12.0);
        let path = &tree.recipe_path_options[0];
        assert_eq!(path.attempts, 3);
        assert_eq!(path.ingredients[0].item, "Clay");
        assert_eq!(path.ingredients[0].quantity, 6.0);
    }

    #[test]
    fn self_consuming_item_terminates() {
        let catalog = self_cycle_catalog();
        let built = TreeBuilder::new(&catalog).build("Refined Brick", 4.0);
        let path = &built.root.recipe_path_options[0];
        let cyclic = path
            .ingredients
            .iter()
            .find(|n| n.item == "Refined Brick")
            .unwrap();
        assert!(cyclic.is_leaf());
        assert!(cyclic.cyclic);
        assert_eq!(
            built.warnings,
            vec![PlanWarning::CircularRecipe {
                item: "Refined Brick".to_string()
            }]
        );
    }

    #[test]
    fn mutual_cycle_terminates() {
        let catalog = mutual_cycle_catalog();
        let tree = build_recipe_tree(&catalog, "Alpha", 1.0);
        // Alpha -> Beta -> Alpha(leaf)
        let beta = &tree.recipe_path_options[0].ingredients[0];
        assert_eq!(beta.item, "Beta");
        let alpha_again = &beta.recipe_path_options[0].ingredients[0];
        assert_eq!(alpha_again.item, "Alpha");
        assert!(alpha_again.is_leaf());
        assert!(alpha_again.cyclic);
    }

    #[test]
    fn sibling_branches_expand_independently() {
        // Both ingredients of Bench need Plank; neither branch may see the
        // other's path.
        let catalog = bench_catalog();
        let tree = build_recipe_tree(&catalog, "Bench", 1.0);
        let path = &tree.recipe_path_options[0];
        for child in &path.ingredients {
            let plank = child.find("Plank", &RecipeSelection::new()).unwrap();
            assert!(!plank.is_leaf(), "{} lost its Plank subtree", child.item);
            assert!(!plank.cyclic);
        }
    }

    #[test]
    fn every_alternative_is_expanded() {
        let catalog = alternative_catalog();
        let tree = build_recipe_tree(&catalog, "Plank", 4.0);
        assert_eq!(tree.recipe_path_options.len(), 2);
        assert_eq!(tree.recipe_path_options[0].ingredients[0].item, "Log");
        assert_eq!(tree.recipe_path_options[1].ingredients[0].item, "Bamboo");
        // Second alternative yields 2 per attempt.
        assert_eq!(tree.recipe_path_options[1].attempts, 2);
        assert_eq!(tree.recipe_path_options[1].ingredients[0].quantity, 6.0);
    }

    #[test]
    fn selected_path_follows_selection() {
        let catalog = alternative_catalog();
        let tree = build_recipe_tree(&catalog, "Plank", 4.0);
        let default = tree.selected_path(&RecipeSelection::new()).unwrap();
        assert_eq!(default.recipe.name, "Saw Plank");
        let alt = tree
            .selected_path(&RecipeSelection::new().with("Plank", 1))
            .unwrap();
        assert_eq!(alt.recipe.name, "Split Bamboo");
        let bad = tree
            .selected_path(&RecipeSelection::new().with("Plank", 9))
            .unwrap();
        assert_eq!(bad.recipe.name, "Saw Plank");
    }

    #[test]
    fn zero_yield_is_flagged() {
        let catalog = zero_yield_catalog();
        let built = TreeBuilder::new(&catalog).build("Stardust", 10.0);
        assert_eq!(built.root.recipe_path_options[0].attempts, 1);
        assert!(matches!(
            built.warnings.as_slice(),
            [PlanWarning::ZeroYield { item, .. }] if item == "Stardust"
        ));
    }

    #[test]
    fn byproduct_uses_its_own_yield() {
        let catalog = byproduct_catalog();
        // Sawdust: 2 at 50% per attempt -> 1 on average -> 3 attempts.
        let tree = build_recipe_tree(&catalog, "Sawdust", 3.0);
        let path = &tree.recipe_path_options[0];
        assert_eq!(path.recipe.name, "Saw Plank");
        assert_eq!(path.attempts, 3);
    }

    #[test]
    fn full_recipe_tree_from_recipe() {
        let catalog = plank_catalog();
        let recipe = catalog.recipe_by_name("Saw Plank").unwrap();
        let ingredients = get_full_recipe_tree(&catalog, recipe, 5.0);
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].item, "Stripped Wood");
        assert_eq!(ingredients[0].quantity, 5.0);
        let log = &ingredients[0].recipe_path_options[0].ingredients[0];
        assert_eq!(log.quantity, 15.0);
    }

    #[test]
    fn full_recipe_tree_cuts_main_output_cycle() {
        let catalog = self_cycle_catalog();
        let recipe = catalog.recipe_by_name("Refine Brick").unwrap();
        let expansion = TreeBuilder::new(&catalog).expand_recipe(recipe, 2.0);
        let own = expansion
            .ingredients
            .iter()
            .find(|n| n.item == "Refined Brick")
            .unwrap();
        assert!(own.cyclic);
    }

    #[test]
    fn node_count_includes_alternatives() {
        let catalog = alternative_catalog();
        let tree = build_recipe_tree(&catalog, "Plank", 1.0);
        // Plank + Log + Bamboo
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn leaf_serializes_without_options() {
        let json = serde_json::to_string(&IngredientNode::leaf("Log", 3.0)).unwrap();
        assert_eq!(json, r#"{"item":"Log","quantity":3.0}"#);
    }
}
