use serde::Serialize;

/// Conditions the planner resolved on its own but a caller may want to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PlanWarning {
    /// `item` consumes itself, directly or through other items. The repeated
    /// occurrence was treated as a raw material.
    CircularRecipe { item: String },
    /// `recipe` has no positive average yield of `item`; one attempt assumed.
    ZeroYield { recipe: String, item: String },
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanWarning::CircularRecipe { item } => {
                write!(f, "Circular recipe detected: {item} is part of a crafting loop")
            }
            PlanWarning::ZeroYield { recipe, item } => {
                write!(f, "Recipe {recipe} never yields {item}; assuming one attempt")
            }
        }
    }
}

/// Insertion-ordered, deduplicated warning list.
#[derive(Debug, Clone, Default)]
pub(crate) struct Warnings {
    list: Vec<PlanWarning>,
}

impl Warnings {
    pub(crate) fn push(&mut self, warning: PlanWarning) {
        if !self.list.contains(&warning) {
            self.list.push(warning);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<PlanWarning> {
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_message() {
        let w = PlanWarning::CircularRecipe {
            item: "Refined Brick".to_string(),
        };
        assert_eq!(
            w.to_string(),
            "Circular recipe detected: Refined Brick is part of a crafting loop"
        );
    }

    #[test]
    fn warnings_deduplicate() {
        let mut warnings = Warnings::default();
        for _ in 0..3 {
            warnings.push(PlanWarning::CircularRecipe { item: "A".into() });
        }
        warnings.push(PlanWarning::CircularRecipe { item: "B".into() });
        assert_eq!(warnings.into_vec().len(), 2);
    }
}
