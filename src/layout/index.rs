use std::collections::HashMap;

use crate::ir::{FamilyData, Person, Relationship, RelationshipKind};

use super::{Diagnostic, Diagnostics};

/// Adjacency maps over the accepted relationships.
///
/// Duplicate and contradictory edges are kept as recorded; later stages
/// reconcile them.
#[derive(Debug, Default)]
pub(super) struct RelationshipIndex<'a> {
    pub people: HashMap<&'a str, &'a Person>,
    /// Accepted relationships in input order.
    pub relationships: Vec<&'a Relationship>,
    pub parents_by_child: HashMap<&'a str, Vec<&'a str>>,
    pub children_by_parent: HashMap<&'a str, Vec<&'a str>>,
    pub spouses_by_person: HashMap<&'a str, Vec<&'a str>>,
}

/// Direction of a parent_child relationship after checking it against the
/// parent index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ResolvedEdge<'a> {
    pub parent: &'a str,
    pub child: &'a str,
    pub fallback: bool,
}

impl<'a> RelationshipIndex<'a> {
    pub fn build(data: &'a FamilyData, diagnostics: &mut Diagnostics) -> Self {
        let mut index = RelationshipIndex::default();

        for person in &data.people {
            if index.people.contains_key(person.id.as_str()) {
                diagnostics.push(Diagnostic::DuplicatePerson {
                    person_id: person.id.clone(),
                });
                continue;
            }
            index.people.insert(person.id.as_str(), person);
        }

        for rel in &data.relationships {
            if let Some(missing) = [&rel.person_id1, &rel.person_id2]
                .into_iter()
                .find(|id| !index.people.contains_key(id.as_str()))
            {
                diagnostics.push(Diagnostic::UnknownPerson {
                    relationship_id: rel.id.clone(),
                    person_id: missing.clone(),
                });
                continue;
            }
            if rel.person_id1 == rel.person_id2 {
                diagnostics.push(Diagnostic::SelfRelationship {
                    relationship_id: rel.id.clone(),
                    person_id: rel.person_id1.clone(),
                });
                continue;
            }
            index.insert(rel);
        }

        tracing::debug!(
            people = index.people.len(),
            relationships = index.relationships.len(),
            "indexed relationships"
        );
        index
    }

    fn insert(&mut self, rel: &'a Relationship) {
        let (a, b) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        match rel.kind {
            RelationshipKind::ParentChild => {
                self.parents_by_child.entry(b).or_default().push(a);
                self.children_by_parent.entry(a).or_default().push(b);
            }
            RelationshipKind::Spouse | RelationshipKind::Partner => {
                self.spouses_by_person.entry(a).or_default().push(b);
                self.spouses_by_person.entry(b).or_default().push(a);
            }
            // Sibling edges carry no placement information.
            RelationshipKind::Sibling | RelationshipKind::HalfSibling => {}
        }
        self.relationships.push(rel);
    }

    pub fn person(&self, id: &str) -> Option<&'a Person> {
        self.people.get(id).copied()
    }

    pub fn parents(&self, id: &str) -> &[&'a str] {
        self.parents_by_child
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn children(&self, id: &str) -> &[&'a str] {
        self.children_by_parent
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn spouses(&self, id: &str) -> &[&'a str] {
        self.spouses_by_person
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent_child_edges(&self) -> impl Iterator<Item = &'a Relationship> + '_ {
        self.relationships
            .iter()
            .copied()
            .filter(|rel| rel.kind == RelationshipKind::ParentChild)
    }

    pub fn union_edges(&self) -> impl Iterator<Item = &'a Relationship> + '_ {
        self.relationships
            .iter()
            .copied()
            .filter(|rel| rel.kind.is_union())
    }

    /// Confirms the recorded direction of a parent_child relationship
    /// against `parents_by_child`. When the index does not list
    /// `person_id1` among the parents of `person_id2`, the recorded order is
    /// kept and the edge is marked as a fallback.
    pub fn resolve_parent_child(&self, rel: &'a Relationship) -> ResolvedEdge<'a> {
        let (p1, p2) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        let confirmed = self.parents(p2).contains(&p1);
        ResolvedEdge {
            parent: p1,
            child: p2,
            fallback: !confirmed,
        }
    }
}
