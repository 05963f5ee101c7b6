use std::collections::{BTreeMap, HashSet};

use crate::config::LayoutConfig;

use super::family::FamilyIndex;
use super::index::RelationshipIndex;
use super::{ChartLink, ChartNode, Diagnostic, Diagnostics, LinkKind};

/// Parent links, one per family with a union junction, followed by spouse
/// links in relationship order.
pub(super) fn build_links(
    index: &RelationshipIndex<'_>,
    families: &FamilyIndex,
    nodes: &BTreeMap<String, ChartNode>,
    focus: &str,
    config: &LayoutConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<ChartLink> {
    let mut links = parent_links(index, families, nodes, focus, config, diagnostics);
    links.extend(spouse_links(index, nodes, focus));
    tracing::debug!(links = links.len(), "built chart links");
    links
}

fn parent_links(
    index: &RelationshipIndex<'_>,
    families: &FamilyIndex,
    nodes: &BTreeMap<String, ChartNode>,
    focus: &str,
    config: &LayoutConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<ChartLink> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    // family id -> surviving (parent, child) edges
    let mut by_family: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();

    for rel in index.parent_child_edges() {
        let edge = index.resolve_parent_child(rel);
        if edge.fallback {
            diagnostics.push(Diagnostic::ParentDirectionFallback {
                relationship_id: rel.id.clone(),
                parent_id: edge.parent.to_string(),
                child_id: edge.child.to_string(),
            });
        }
        let (Some(parent), Some(child)) = (nodes.get(edge.parent), nodes.get(edge.child)) else {
            continue;
        };
        if !seen.insert((edge.parent, edge.child)) {
            continue;
        }
        if parent.generation >= child.generation {
            diagnostics.push(Diagnostic::DroppedParentLink {
                relationship_id: rel.id.clone(),
                parent_id: edge.parent.to_string(),
                child_id: edge.child.to_string(),
                parent_generation: parent.generation,
                child_generation: child.generation,
            });
            continue;
        }
        let Some(family_id) = families.birth_family(edge.child) else {
            continue;
        };
        by_family
            .entry(family_id)
            .or_default()
            .push((edge.parent, edge.child));
    }

    let mut links = Vec::with_capacity(by_family.len());
    for (family_id, edges) in by_family {
        let Some(family) = families.get(family_id) else {
            continue;
        };
        let from: Vec<String> = family
            .parents
            .iter()
            .filter(|p| edges.iter().any(|(parent, _)| *parent == p.as_str()))
            .cloned()
            .collect();
        let to: Vec<String> = family
            .children
            .iter()
            .filter(|c| edges.iter().any(|(_, child)| *child == c.as_str()))
            .cloned()
            .collect();
        let junction = union_junction(&from, nodes, config);
        let is_highlighted = from.iter().chain(to.iter()).any(|id| id == focus);
        links.push(ChartLink {
            kind: LinkKind::Parent,
            from,
            to,
            family_id: Some(family_id.to_string()),
            junction,
            status: None,
            is_highlighted,
        });
    }
    links
}

/// Where a family's parent lines merge: halfway across the gap after the
/// parent column, at the mean centre height of the parents.
fn union_junction(
    parents: &[String],
    nodes: &BTreeMap<String, ChartNode>,
    config: &LayoutConfig,
) -> Option<(f32, f32)> {
    let placed: Vec<&ChartNode> = parents.iter().filter_map(|p| nodes.get(p)).collect();
    if placed.is_empty() {
        return None;
    }
    let right = placed
        .iter()
        .map(|node| node.right())
        .fold(f32::MIN, f32::max);
    let y = placed.iter().map(|node| node.center().1).sum::<f32>() / placed.len() as f32;
    Some((right + config.generation_gap / 2.0, y))
}

fn spouse_links(
    index: &RelationshipIndex<'_>,
    nodes: &BTreeMap<String, ChartNode>,
    focus: &str,
) -> Vec<ChartLink> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut links = Vec::new();
    for rel in index.union_edges() {
        let (a, b) = (rel.person_id1.as_str(), rel.person_id2.as_str());
        if !nodes.contains_key(a) || !nodes.contains_key(b) {
            continue;
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if !seen.insert(key) {
            continue;
        }
        links.push(ChartLink {
            kind: LinkKind::Spouse,
            from: vec![a.to_string()],
            to: vec![b.to_string()],
            family_id: None,
            junction: None,
            status: rel.status,
            is_highlighted: a == focus || b == focus,
        });
    }
    links
}
