//! Planner configuration shared by the totals aggregator and the calculator.

use serde::{Deserialize, Serialize};

/// Attempts a single structure runs in parallel before the next batch starts.
pub const PARALLEL_SLOTS_PER_STRUCTURE: u32 = 10;

/// How synchronous effort is charged for a node in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortScaling {
    /// Charge the recipe's effort once for each node visited.
    #[default]
    PerNode,
    /// Charge `effort × attempts` for each node visited.
    PerAttempt,
}

/// Tunables for aggregation. Every field has a default so partial config
/// files deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Parallel batch capacity of every structure. Values below one are
    /// treated as one.
    pub parallel_slots_per_structure: u32,
    pub effort_scaling: EffortScaling,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            parallel_slots_per_structure: PARALLEL_SLOTS_PER_STRUCTURE,
            effort_scaling: EffortScaling::PerNode,
        }
    }
}

impl PlannerConfig {
    pub(crate) fn slots(&self) -> u64 {
        u64::from(self.parallel_slots_per_structure.max(1))
    }

    /// Effort charged for one node that runs `attempts` times.
    pub fn effort_for(&self, effort: f64, attempts: u64) -> f64 {
        match self.effort_scaling {
            EffortScaling::PerNode => effort,
            EffortScaling::PerAttempt => effort * attempts as f64,
        }
    }
}
