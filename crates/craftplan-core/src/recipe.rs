//! Recipe definitions: ingredients, outputs, costs, and classification.
//!
//! A [`Recipe`] consumes a list of [`Ingredient`]s and yields one or more
//! [`Output`]s. Outputs may be fixed or ranged, and may only occur with a
//! given chance. The cost of one run is either synchronous labor
//! ([`Cost::Synchronous`]) or a passive duration spent in a structure
//! ([`Cost::Asynchronous`]).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// Number of units an output yields per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    /// Always yields exactly this many units.
    Fixed(f64),
    /// Yields a uniformly distributed amount in `[min, max]`.
    Range { min: f64, max: f64 },
}

impl Quantity {
    /// The expected amount: the value itself, or the midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        match *self {
            Quantity::Fixed(n) => n,
            Quantity::Range { min, max } => (min + max) / 2.0,
        }
    }

    /// Smallest amount a single attempt can yield.
    pub fn min(&self) -> f64 {
        match *self {
            Quantity::Fixed(n) => n,
            Quantity::Range { min, .. } => min,
        }
    }

    /// Largest amount a single attempt can yield.
    pub fn max(&self) -> f64 {
        match *self {
            Quantity::Fixed(n) => n,
            Quantity::Range { max, .. } => max,
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, Quantity::Range { .. })
    }
}

// ---------------------------------------------------------------------------
// Ingredients and outputs
// ---------------------------------------------------------------------------

/// An item consumed by one run of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub quantity: f64,
}

impl Ingredient {
    pub fn new(item: impl Into<String>, quantity: f64) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// An item produced by one run of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub item: String,
    pub quantity: Quantity,
    /// Probability in `0..=1` that the output appears at all. `None` means
    /// the output is guaranteed.
    #[serde(default)]
    pub chance: Option<f64>,
}

impl Output {
    pub fn fixed(item: impl Into<String>, quantity: f64) -> Self {
        Self {
            item: item.into(),
            quantity: Quantity::Fixed(quantity),
            chance: None,
        }
    }

    pub fn ranged(item: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            item: item.into(),
            quantity: Quantity::Range { min, max },
            chance: None,
        }
    }

    /// Attach a chance to this output.
    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    /// True when the output always appears.
    pub fn is_guaranteed(&self) -> bool {
        match self.chance {
            None => true,
            Some(c) => c == 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cost and classification
// ---------------------------------------------------------------------------

/// What one run of a recipe costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    /// Active crafting paid in labor points.
    Synchronous { effort: f64 },
    /// Passive crafting: the structure is busy for `seconds` per attempt.
    Asynchronous { seconds: f64, structure: String },
}

/// Who performs a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Profession(String),
    Structure(String),
}

impl Classification {
    pub fn name(&self) -> &str {
        match self {
            Classification::Profession(name) | Classification::Structure(name) => name,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A recipe definition. Immutable once registered in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub tier: u32,
    pub ingredients: Vec<Ingredient>,
    /// Never empty for recipes held by a catalog.
    pub outputs: Vec<Output>,
    pub cost: Cost,
    pub classification: Classification,
}

impl Recipe {
    /// The output used to size attempt counts: the first guaranteed output,
    /// falling back to the first output overall.
    pub fn main_output(&self) -> Option<&Output> {
        self.outputs
            .iter()
            .find(|o| o.is_guaranteed())
            .or_else(|| self.outputs.first())
    }

    /// The output that yields `item`. The main output wins when several
    /// outputs name the same item.
    pub fn output_for(&self, item: &str) -> Option<&Output> {
        match self.main_output() {
            Some(main) if main.item == item => Some(main),
            _ => self.outputs.iter().find(|o| o.item == item),
        }
    }

    /// Per-run effort, if this is a synchronous recipe.
    pub fn effort(&self) -> Option<f64> {
        match self.cost {
            Cost::Synchronous { effort } => Some(effort),
            Cost::Asynchronous { .. } => None,
        }
    }

    /// Per-attempt duration and structure, if this is a passive recipe.
    pub fn passive(&self) -> Option<(f64, &str)> {
        match &self.cost {
            Cost::Asynchronous { seconds, structure } => Some((*seconds, structure.as_str())),
            Cost::Synchronous { .. } => None,
        }
    }
}
