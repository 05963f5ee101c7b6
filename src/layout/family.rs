use std::collections::{BTreeMap, HashMap, HashSet};

use super::index::RelationshipIndex;
use super::{FamilyKind, FamilyUnit, LayoutError};

#[derive(Debug, Default)]
pub(super) struct FamilyIndex {
    pub families: BTreeMap<String, FamilyUnit>,
    /// The family a person is a child of.
    pub family_as_child: HashMap<String, String>,
    /// Families a person heads, in creation order.
    pub families_as_parent: HashMap<String, Vec<String>>,
}

impl FamilyIndex {
    pub fn get(&self, id: &str) -> Option<&FamilyUnit> {
        self.families.get(id)
    }

    pub fn birth_family(&self, person: &str) -> Option<&str> {
        self.family_as_child.get(person).map(String::as_str)
    }

    pub fn parent_families(&self, person: &str) -> &[String] {
        self.families_as_parent
            .get(person)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn insert(&mut self, family: FamilyUnit) {
        for parent in &family.parents {
            self.families_as_parent
                .entry(parent.clone())
                .or_default()
                .push(family.id.clone());
        }
        self.families.insert(family.id.clone(), family);
    }
}

/// Groups children by their recorded parent set, then adds a childless
/// family for every spouse/partner pair that has none yet.
pub(super) fn build_families(index: &RelationshipIndex<'_>) -> Result<FamilyIndex, LayoutError> {
    let mut out = FamilyIndex::default();

    let mut seen_children: HashSet<&str> = HashSet::new();
    for rel in index.parent_child_edges() {
        let child = rel.person_id2.as_str();
        if !seen_children.insert(child) {
            continue;
        }
        let mut parents: Vec<&str> = index.parents(child).to_vec();
        parents.sort_unstable();
        parents.dedup();

        let (key, kind) = match parents.as_slice() {
            [single] => (FamilyUnit::single_key(single), FamilyKind::Single),
            [a, b] => (FamilyUnit::couple_key(a, b), FamilyKind::Couple),
            _ => {
                return Err(LayoutError::TooManyParents {
                    child: child.to_string(),
                    parents: parents.iter().map(|p| p.to_string()).collect(),
                });
            }
        };

        if let Some(family) = out.families.get_mut(&key) {
            family.children.push(child.to_string());
        } else {
            out.insert(FamilyUnit {
                id: key.clone(),
                kind,
                parents: parents.iter().map(|p| p.to_string()).collect(),
                children: vec![child.to_string()],
                lane: 0,
            });
        }
        out.family_as_child.insert(child.to_string(), key);
    }

    for rel in index.union_edges() {
        let (a, b) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        if out.families.contains_key(&FamilyUnit::couple_key(a, b)) {
            continue;
        }
        let key = FamilyUnit::childless_key(a, b);
        if out.families.contains_key(&key) {
            continue;
        }
        let mut parents = vec![a.to_string(), b.to_string()];
        parents.sort();
        out.insert(FamilyUnit {
            id: key,
            kind: FamilyKind::Childless,
            parents,
            children: Vec::new(),
            lane: 0,
        });
    }

    tracing::debug!(families = out.families.len(), "built family units");
    Ok(out)
}
