//! Serde data file structs for recipe catalogs and planner settings.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then validated into core types by the
//! loader.

use craftplan_core::PlannerConfig;
use craftplan_graph::GraphConfig;
use serde::Deserialize;

// ===========================================================================
// Recipes
// ===========================================================================

/// An ingredient entry, in short tuple form or full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientData {
    /// Short form: `("Log", 3)`.
    Short(String, f64),
    /// Full form with named fields.
    Full { item: String, quantity: f64 },
}

impl IngredientData {
    pub fn item(&self) -> &str {
        match self {
            IngredientData::Short(item, _) | IngredientData::Full { item, .. } => item,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            IngredientData::Short(_, quantity) | IngredientData::Full { quantity, .. } => *quantity,
        }
    }
}

/// An output quantity: a plain number or a `min`/`max` range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityData {
    Fixed(f64),
    Range { min: f64, max: f64 },
}

/// An output entry, in short tuple form or full form with an optional
/// chance.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OutputData {
    /// Short form: `("Plank", 1)` or `("Nail", (min: 1, max: 3))`.
    Short(String, QuantityData),
    /// Full form with named fields.
    Full {
        item: String,
        quantity: QuantityData,
        #[serde(default)]
        chance: Option<f64>,
    },
}

/// How a recipe is paid for.
#[derive(Debug, Clone, Deserialize)]
pub enum CostData {
    /// Labor performed by a profession, per run.
    Effort(f64),
    /// Unattended time in a structure, per run.
    Passive { seconds: f64, structure: String },
}

/// Who performs a recipe.
#[derive(Debug, Clone, Deserialize)]
pub enum ClassificationData {
    Profession(String),
    Structure(String),
}

fn default_tier() -> u32 {
    1
}

/// A recipe definition in a data file.
///
/// `classification` may be omitted for passive recipes, which are then
/// classified by their structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    #[serde(default = "default_tier")]
    pub tier: u32,
    #[serde(default)]
    pub ingredients: Vec<IngredientData>,
    pub outputs: Vec<OutputData>,
    pub cost: CostData,
    #[serde(default)]
    pub classification: Option<ClassificationData>,
}

// ===========================================================================
// Planner settings
// ===========================================================================

/// The optional `planner` file. Both sections and all of their fields fall
/// back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerFileData {
    pub planner: PlannerConfig,
    pub graph: GraphConfig,
}
