use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-owned choice of recipe alternative per item.
///
/// Maps an item name to an index into that item's recipe options. Items
/// without an entry use option 0. Selections never change the shape of a
/// built tree, so the same tree can be re-aggregated under any selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeSelection {
    choices: HashMap<String, usize>,
}

impl RecipeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose option `index` for `item`.
    pub fn select(&mut self, item: impl Into<String>, index: usize) -> &mut Self {
        self.choices.insert(item.into(), index);
        self
    }

    /// Builder-style [`select`](Self::select).
    pub fn with(mut self, item: impl Into<String>, index: usize) -> Self {
        self.select(item, index);
        self
    }

    /// Revert `item` to its default option.
    pub fn clear(&mut self, item: &str) {
        self.choices.remove(item);
    }

    /// The raw choice for `item`, or 0.
    pub fn get(&self, item: &str) -> usize {
        self.choices.get(item).copied().unwrap_or(0)
    }

    /// The choice for `item` among `option_count` options. An out-of-range
    /// choice falls back to option 0.
    pub fn resolve(&self, item: &str, option_count: usize) -> usize {
        let idx = self.get(item);
        if idx < option_count { idx } else { 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for RecipeSelection {
    fn from_iter<T: IntoIterator<Item = (S, usize)>>(iter: T) -> Self {
        Self {
            choices: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
