use crate::recipe::Recipe;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Errors raised while registering recipes.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("recipe '{0}' has no outputs")]
    NoOutputs(String),
}

/// Non-fatal problems found while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogWarning {
    /// Two or more registered recipes share a name.
    DuplicateRecipeName { name: String, count: usize },
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogWarning::DuplicateRecipeName { name, count } => {
                write!(f, "duplicate recipe name '{name}' ({count} definitions)")
            }
        }
    }
}

/// Builder for constructing an immutable [`RecipeCatalog`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    recipes: Vec<Recipe>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register a recipe. Recipes keep registration order, which
    /// decides the default alternative for every item they produce.
    pub fn register(&mut self, recipe: Recipe) -> Result<&mut Self, CatalogError> {
        if recipe.outputs.is_empty() {
            return Err(CatalogError::NoOutputs(recipe.name));
        }
        self.recipes.push(recipe);
        Ok(self)
    }

    /// Register several recipes, stopping at the first error.
    pub fn register_all(
        &mut self,
        recipes: impl IntoIterator<Item = Recipe>,
    ) -> Result<&mut Self, CatalogError> {
        for recipe in recipes {
            self.register(recipe)?;
        }
        Ok(self)
    }

    /// Phase 2: Index recipes by the items they produce and freeze.
    pub fn build(self) -> RecipeCatalog {
        let mut by_item: HashMap<String, Vec<Recipe>> = HashMap::new();
        let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for recipe in &self.recipes {
            *name_counts.entry(recipe.name.as_str()).or_default() += 1;
        }

        let mut warnings = Vec::new();
        for (name, count) in name_counts {
            if count > 1 {
                tracing::warn!(recipe = name, count, "duplicate recipe name in catalog");
                warnings.push(CatalogWarning::DuplicateRecipeName {
                    name: name.to_string(),
                    count,
                });
            }
        }

        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (idx, recipe) in self.recipes.iter().enumerate() {
            by_name.entry(recipe.name.clone()).or_insert(idx);

            // A recipe listing the same item twice is indexed once.
            let mut seen: Vec<&str> = Vec::with_capacity(recipe.outputs.len());
            for output in &recipe.outputs {
                if seen.contains(&output.item.as_str()) {
                    continue;
                }
                seen.push(&output.item);
                by_item
                    .entry(output.item.clone())
                    .or_default()
                    .push(recipe.clone());
            }
        }

        tracing::debug!(
            recipes = self.recipes.len(),
            items = by_item.len(),
            "recipe catalog built"
        );

        RecipeCatalog {
            recipes: self.recipes,
            by_item,
            by_name,
            warnings,
        }
    }
}

/// Immutable lookup from item name to the recipes that produce it.
/// Frozen after [`CatalogBuilder::build`]. Thread-safe to share.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    by_item: HashMap<String, Vec<Recipe>>,
    by_name: HashMap<String, usize>,
    warnings: Vec<CatalogWarning>,
}

impl RecipeCatalog {
    /// Convenience: register every recipe and build.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new();
        builder.register_all(recipes)?;
        Ok(builder.build())
    }

    /// Recipes producing `item`, in registration order. Empty for raw materials.
    pub fn recipes_for(&self, item: &str) -> &[Recipe] {
        self.by_item.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if no recipe produces `item`.
    pub fn is_raw(&self, item: &str) -> bool {
        self.recipes_for(item).is_empty()
    }

    /// First recipe registered under `name`.
    pub fn recipe_by_name(&self, name: &str) -> Option<&Recipe> {
        self.by_name.get(name).map(|&idx| &self.recipes[idx])
    }

    /// All recipes in registration order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Names of every producible item, sorted.
    pub fn items(&self) -> Vec<&str> {
        let mut items: Vec<&str> = self.by_item.keys().map(String::as_str).collect();
        items.sort_unstable();
        items
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Classification, Cost, Ingredient, Output};

    fn recipe(name: &str, outputs: Vec<Output>) -> Recipe {
        Recipe {
            name: name.to_string(),
            tier: 1,
            ingredients: vec![Ingredient::new("Log", 1.0)],
            outputs,
            cost: Cost::Synchronous { effort: 5.0 },
            classification: Classification::Profession("Forestry".to_string()),
        }
    }

    #[test]
    fn lookup_by_output_item() {
        let catalog =
            RecipeCatalog::from_recipes(vec![recipe("Saw Plank", vec![Output::fixed("Plank", 1.0)])])
                .unwrap();
        assert_eq!(catalog.recipes_for("Plank").len(), 1);
        assert!(catalog.is_raw("Log"));
        assert!(!catalog.is_raw("Plank"));
        assert!(catalog.recipes_for("Log").is_empty());
    }

    #[test]
    fn alternatives_keep_registration_order() {
        let catalog = RecipeCatalog::from_recipes(vec![
            recipe("Saw Plank", vec![Output::fixed("Plank", 1.0)]),
            recipe("Split Plank", vec![Output::fixed("Plank", 2.0)]),
        ])
        .unwrap();
        let names: Vec<&str> = catalog
            .recipes_for("Plank")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Saw Plank", "Split Plank"]);
    }

    #[test]
    fn byproducts_are_indexed() {
        let catalog = RecipeCatalog::from_recipes(vec![recipe(
            "Saw Plank",
            vec![
                Output::fixed("Plank", 1.0),
                Output::fixed("Sawdust", 1.0).with_chance(0.5),
            ],
        )])
        .unwrap();
        assert_eq!(catalog.recipes_for("Sawdust").len(), 1);
        assert_eq!(catalog.items(), vec!["Plank", "Sawdust"]);
    }

    #[test]
    fn repeated_output_item_is_indexed_once() {
        let catalog = RecipeCatalog::from_recipes(vec![recipe(
            "Sift",
            vec![
                Output::fixed("Sand", 1.0),
                Output::fixed("Sand", 1.0).with_chance(0.2),
            ],
        )])
        .unwrap();
        assert_eq!(catalog.recipes_for("Sand").len(), 1);
    }

    #[test]
    fn empty_outputs_rejected() {
        let mut builder = CatalogBuilder::new();
        let result = builder.register(recipe("Nothing", vec![]));
        assert!(matches!(result, Err(CatalogError::NoOutputs(ref n)) if n == "Nothing"));
    }

    #[test]
    fn duplicate_names_warn_but_build() {
        let catalog = RecipeCatalog::from_recipes(vec![
            recipe("Plank", vec![Output::fixed("Plank", 1.0)]),
            recipe("Plank", vec![Output::fixed("Plank", 2.0)]),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.recipes_for("Plank").len(), 2);
        assert_eq!(
            catalog.warnings(),
            &[CatalogWarning::DuplicateRecipeName {
                name: "Plank".to_string(),
                count: 2
            }]
        );
        // Name lookup resolves to the first definition.
        let first = catalog.recipe_by_name("Plank").unwrap();
        assert_eq!(first.outputs[0], Output::fixed("Plank", 1.0));
    }

    #[test]
    fn warning_display() {
        let w = CatalogWarning::DuplicateRecipeName {
            name: "Plank".to_string(),
            count: 3,
        };
        assert!(w.to_string().contains("Plank"));
        assert!(w.to_string().contains('3'));
    }

    #[test]
    fn empty_catalog() {
        let catalog = CatalogBuilder::new().build();
        assert!(catalog.is_empty());
        assert!(catalog.items().is_empty());
        assert!(catalog.warnings().is_empty());
    }
}
