//! Aggregation of a built tree into raw materials, effort, and time.
//!
//! The walk follows the caller's [`RecipeSelection`] at every node. Passive
//! attempts are queued per structure and timed in batches: each structure
//! runs up to [`PlannerConfig::parallel_slots_per_structure`] attempts at
//! once, a batch lasts as long as its slowest attempt, and batches on the
//! same structure run one after another. Different structures are summed.

use crate::config::PlannerConfig;
use crate::quantity::Attempts;
use crate::recipe::Cost;
use crate::selection::RecipeSelection;
use crate::tree::IngredientNode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated requirements of one tree under one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeTotals {
    /// Leaf item -> units required, summed across branches.
    pub raw_materials: BTreeMap<String, f64>,
    pub total_effort: f64,
    /// Seconds of passive production, summed over structures.
    pub total_time: f64,
    /// Structure -> seconds of passive production on that structure.
    pub time_by_structure: BTreeMap<String, f64>,
}

impl RecipeTotals {
    /// Add another set of totals into this one. Time is added per structure
    /// as if both plans were queued back to back.
    pub fn merge(&mut self, other: &RecipeTotals) {
        for (item, qty) in &other.raw_materials {
            *self.raw_materials.entry(item.clone()).or_insert(0.0) += qty;
        }
        for (structure, secs) in &other.time_by_structure {
            *self.time_by_structure.entry(structure.clone()).or_insert(0.0) += secs;
        }
        self.total_effort += other.total_effort;
        self.total_time = self.time_by_structure.values().sum();
    }

    pub fn raw(&self, item: &str) -> f64 {
        self.raw_materials.get(item).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Structure queues
// ---------------------------------------------------------------------------

/// Attempts queued on one structure, run-length encoded as
/// `(seconds, count)` in queue order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureQueue {
    runs: Vec<(f64, Attempts)>,
}

impl StructureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `count` attempts of `seconds` each.
    pub fn push(&mut self, seconds: f64, count: Attempts) {
        if count == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some((last, n)) if *last == seconds => *n += count,
            _ => self.runs.push((seconds, count)),
        }
    }

    /// Total attempts queued.
    pub fn len(&self) -> Attempts {
        self.runs.iter().map(|&(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sum over consecutive batches of `slots` attempts of the longest
    /// attempt in each batch.
    pub fn batched_time(&self, slots: u64) -> f64 {
        let slots = slots.max(1);
        let mut total = 0.0;
        // Partially filled batch carried between runs.
        let mut fill: u64 = 0;
        let mut batch_max = 0.0_f64;

        for &(seconds, count) in &self.runs {
            let mut remaining = count;

            if fill > 0 {
                let take = remaining.min(slots - fill);
                batch_max = batch_max.max(seconds);
                fill += take;
                remaining -= take;
                if fill == slots {
                    total += batch_max;
                    fill = 0;
                    batch_max = 0.0;
                }
            }

            total += seconds * (remaining / slots) as f64;
            let rest = remaining % slots;
            if rest > 0 {
                fill = rest;
                batch_max = seconds;
            }
        }

        if fill > 0 {
            total += batch_max;
        }
        total
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate `tree` under `selection` with the default configuration.
pub fn compute_totals(tree: &IngredientNode, selection: &RecipeSelection) -> RecipeTotals {
    compute_totals_with(tree, selection, &PlannerConfig::default())
}

/// Aggregate `tree` under `selection`.
pub fn compute_totals_with(
    tree: &IngredientNode,
    selection: &RecipeSelection,
    config: &PlannerConfig,
) -> RecipeTotals {
    let mut acc = Accumulator::new(selection, config);
    acc.visit(tree);
    acc.finish()
}

/// Walks any number of trees into one set of structure queues, so attempts
/// on the same structure share batches no matter which tree queued them.
pub(crate) struct Accumulator<'a> {
    config: &'a PlannerConfig,
    selection: &'a RecipeSelection,
    raw_materials: BTreeMap<String, f64>,
    effort: f64,
    queues: BTreeMap<String, StructureQueue>,
}

impl<'a> Accumulator<'a> {
    pub(crate) fn new(selection: &'a RecipeSelection, config: &'a PlannerConfig) -> Self {
        Self {
            config,
            selection,
            raw_materials: BTreeMap::new(),
            effort: 0.0,
            queues: BTreeMap::new(),
        }
    }

    /// Charge one recipe run `attempts` times.
    pub(crate) fn charge(&mut self, cost: &Cost, attempts: Attempts) {
        match cost {
            Cost::Synchronous { effort } => {
                self.effort += self.config.effort_for(*effort, attempts);
            }
            Cost::Asynchronous { seconds, structure } => {
                self.queues
                    .entry(structure.clone())
                    .or_default()
                    .push(*seconds, attempts);
            }
        }
    }

    pub(crate) fn visit(&mut self, node: &IngredientNode) {
        let Some(path) = node.selected_path(self.selection) else {
            *self.raw_materials.entry(node.item.clone()).or_insert(0.0) += node.quantity;
            return;
        };

        self.charge(&path.recipe.cost, path.attempts);
        for child in &path.ingredients {
            self.visit(child);
        }
    }

    /// Batch every structure queue once and produce the totals.
    pub(crate) fn finish(self) -> RecipeTotals {
        let slots = self.config.slots();
        let time_by_structure: BTreeMap<String, f64> = self
            .queues
            .into_iter()
            .map(|(structure, queue)| (structure, queue.batched_time(slots)))
            .collect();
        let total_time = time_by_structure.values().sum();

        RecipeTotals {
            raw_materials: self.raw_materials,
            total_effort: self.effort,
            total_time,
            time_by_structure,
        }
    }
}
