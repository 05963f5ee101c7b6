use std::collections::{HashMap, VecDeque};

use super::index::RelationshipIndex;

#[derive(Debug, Default)]
pub(super) struct Generations<'a> {
    by_person: HashMap<&'a str, usize>,
    /// People in the order the traversal reached them.
    pub visit_order: Vec<&'a str>,
}

impl<'a> Generations<'a> {
    pub fn get(&self, id: &str) -> Option<usize> {
        self.by_person.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_person.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_person.len()
    }

    /// Reached people sorted by id.
    pub fn people_sorted(&self) -> Vec<&'a str> {
        let mut people = self.visit_order.clone();
        people.sort_unstable();
        people
    }
}

/// Breadth-first generation numbering from `root`, followed by one couple
/// alignment pass and one parent-before-child pass.
///
/// Neither correction cascades: a person moved by either pass does not move
/// their own descendants.
pub(super) fn assign_generations<'a>(
    index: &RelationshipIndex<'a>,
    root: &'a str,
) -> Generations<'a> {
    let mut raw: HashMap<&'a str, i64> = HashMap::new();
    let mut visit_order = Vec::new();
    let mut queue = VecDeque::new();

    raw.insert(root, 0);
    visit_order.push(root);
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        let generation = raw[current];
        let neighbours = index
            .parents(current)
            .iter()
            .map(|&p| (p, generation - 1))
            .chain(index.children(current).iter().map(|&c| (c, generation + 1)))
            .chain(index.spouses(current).iter().map(|&s| (s, generation)));
        for (person, assigned) in neighbours {
            if raw.contains_key(person) {
                continue;
            }
            raw.insert(person, assigned);
            visit_order.push(person);
            queue.push_back(person);
        }
    }

    let min = raw.values().copied().min().unwrap_or(0);
    for value in raw.values_mut() {
        *value -= min;
    }

    for rel in index.union_edges() {
        let (a, b) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        let (Some(&ga), Some(&gb)) = (raw.get(a), raw.get(b)) else {
            continue;
        };
        if ga != gb {
            let aligned = ga.min(gb);
            raw.insert(a, aligned);
            raw.insert(b, aligned);
        }
    }

    for rel in index.parent_child_edges() {
        let (parent, child) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        let (Some(&gp), Some(&gc)) = (raw.get(parent), raw.get(child)) else {
            continue;
        };
        if gp >= gc {
            raw.insert(child, gp + 1);
        }
    }

    let by_person: HashMap<&'a str, usize> = raw
        .into_iter()
        .map(|(id, generation)| (id, generation.max(0) as usize))
        .collect();
    tracing::debug!(
        reached = by_person.len(),
        generations = by_person.values().copied().max().map_or(0, |g| g + 1),
        "assigned generations"
    );
    Generations {
        by_person,
        visit_order,
    }
}
