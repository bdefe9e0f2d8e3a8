//! Catalog-wide cycle detection.
//!
//! An item is cyclic when some chain of recipes leads from the item back to
//! itself. Every recipe of every item is considered, not just the selected
//! ones, so the flag does not change with the caller's choices.

use craftplan_core::RecipeCatalog;
use std::collections::{HashMap, HashSet};

/// Every item that can reach itself through the ingredients of any recipe.
///
/// Tarjan's strongly connected components over the item dependency graph:
/// members of a component with more than one item are cyclic, as is any item
/// with a recipe that consumes the item directly.
pub fn find_cyclic_items(catalog: &RecipeCatalog) -> HashSet<String> {
    let mut deps: HashMap<&str, Vec<&str>> = HashMap::new();
    for recipe in catalog.recipes() {
        for output in &recipe.outputs {
            let entry = deps.entry(output.item.as_str()).or_default();
            for ingredient in &recipe.ingredients {
                if !entry.contains(&ingredient.item.as_str()) {
                    entry.push(ingredient.item.as_str());
                }
            }
        }
    }

    let mut tarjan = Tarjan {
        deps: &deps,
        index: HashMap::new(),
        low: HashMap::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        next_index: 0,
        cyclic: HashSet::new(),
    };

    let mut items: Vec<&str> = deps.keys().copied().collect();
    items.sort_unstable();
    for item in items {
        if !tarjan.index.contains_key(item) {
            tarjan.visit(item);
        }
    }

    let cyclic = tarjan.cyclic;
    tracing::debug!(count = cyclic.len(), "catalog cycle scan complete");
    cyclic
}

struct Tarjan<'a> {
    deps: &'a HashMap<&'a str, Vec<&'a str>>,
    index: HashMap<&'a str, usize>,
    low: HashMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: HashSet<&'a str>,
    next_index: usize,
    cyclic: HashSet<String>,
}

impl<'a> Tarjan<'a> {
    fn visit(&mut self, item: &'a str) {
        self.index.insert(item, self.next_index);
        self.low.insert(item, self.next_index);
        self.next_index += 1;
        self.stack.push(item);
        self.on_stack.insert(item);

        let deps = self.deps;
        let mut self_loop = false;
        for &dep in deps.get(item).map(Vec::as_slice).unwrap_or(&[]) {
            if dep == item {
                self_loop = true;
            }
            if !self.index.contains_key(dep) {
                self.visit(dep);
                let dep_low = self.low[dep];
                let low = self.low.entry(item).or_insert(dep_low);
                *low = (*low).min(dep_low);
            } else if self.on_stack.contains(dep) {
                let dep_index = self.index[dep];
                let low = self.low.entry(item).or_insert(dep_index);
                *low = (*low).min(dep_index);
            }
        }

        if self.low[item] != self.index[item] {
            return;
        }

        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.remove(member);
            component.push(member);
            if member == item {
                break;
            }
        }
        if component.len() > 1 || self_loop {
            self.cyclic
                .extend(component.into_iter().map(str::to_string));
        }
    }
}
