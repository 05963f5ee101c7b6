mod bounds;
mod diagnostics;
mod error;
mod family;
mod generation;
mod index;
mod lanes;
mod links;
mod position;
pub(crate) mod types;
pub use diagnostics::Diagnostic;
pub(crate) use diagnostics::Diagnostics;
pub use error::LayoutError;
pub use types::*;
use bounds::normalize_bounds;
use family::{FamilyIndex, build_families};
use generation::assign_generations;
use index::RelationshipIndex;
use lanes::{assign_lanes, lane_memberships};
use links::build_links;
use position::Positioner;

use crate::config::LayoutConfig;
use crate::ir::FamilyData;
use std::collections::BTreeMap;

/// Lays out the pedigree reachable from `request.root_person_id`.
///
/// The result depends only on the arguments, including the order of the
/// people and relationship lists. Data problems are repaired and listed in
/// [`Layout::diagnostics`]; only a child with more than two recorded parents
/// is rejected.
pub fn compute_layout(
    data: &FamilyData,
    request: &LayoutRequest,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let _span = tracing::debug_span!("compute_layout", root = %request.root_person_id).entered();
    let mut diagnostics = Diagnostics::default();

    let index = RelationshipIndex::build(data, &mut diagnostics);
    let families = build_families(&index)?;

    let Some(root) = index.person(&request.root_person_id) else {
        diagnostics.push(Diagnostic::RootNotFound {
            person_id: request.root_person_id.clone(),
        });
        return Ok(empty_layout(request, config, diagnostics));
    };
    let root = root.id.as_str();

    let generations = assign_generations(&index, root);
    let mut lanes = assign_lanes(
        &families,
        &index,
        &generations,
        root,
        config.lane_search_radius,
        &mut diagnostics,
    );
    let people = generations.people_sorted();
    let memberships = lane_memberships(&people, &families, &mut lanes);
    let ys = Positioner {
        index: &index,
        families: &families,
        generations: &generations,
        memberships: &memberships,
        config,
    }
    .place();

    let focus = request.focus();
    let mut nodes = BTreeMap::new();
    for &id in &people {
        let (Some(person), Some(generation)) = (index.person(id), generations.get(id)) else {
            continue;
        };
        let membership = memberships.get(id);
        nodes.insert(
            id.to_string(),
            ChartNode {
                id: id.to_string(),
                person: person.clone(),
                generation,
                lane: membership.map_or(0, |m| m.lane),
                family_id: membership.and_then(|m| m.family_id.clone()),
                x: config.generation_x(generation),
                y: ys.get(id).copied().unwrap_or(0.0),
                width: config.node_width,
                height: config.node_height,
                is_highlighted: id == focus,
            },
        );
    }

    let mut links = build_links(&index, &families, &nodes, focus, config, &mut diagnostics);
    let (width, height) = normalize_bounds(&mut nodes, &mut links, config.padding);
    let (families, family_by_child) = reached_families(families, &lanes, &nodes);

    tracing::debug!(
        nodes = nodes.len(),
        links = links.len(),
        families = families.len(),
        width,
        height,
        "pedigree layout complete"
    );

    Ok(Layout {
        nodes,
        links,
        width,
        height,
        families,
        family_by_child,
        root_person_id: request.root_person_id.clone(),
        focus_person_id: focus.to_string(),
        diagnostics: diagnostics.into_vec(),
    })
}

fn empty_layout(request: &LayoutRequest, config: &LayoutConfig, diagnostics: Diagnostics) -> Layout {
    let mut nodes = BTreeMap::new();
    let (width, height) = normalize_bounds(&mut nodes, &mut [], config.padding);
    Layout {
        nodes,
        links: Vec::new(),
        width,
        height,
        families: BTreeMap::new(),
        family_by_child: BTreeMap::new(),
        root_person_id: request.root_person_id.clone(),
        focus_person_id: request.focus().to_string(),
        diagnostics: diagnostics.into_vec(),
    }
}

/// Families with a lane (every family with a reached member), and the
/// child-to-family map restricted to placed children.
fn reached_families(
    families: FamilyIndex,
    lanes: &BTreeMap<String, usize>,
    nodes: &BTreeMap<String, ChartNode>,
) -> (BTreeMap<String, FamilyUnit>, BTreeMap<String, String>) {
    let mut reached = BTreeMap::new();
    let mut family_by_child = BTreeMap::new();
    for (id, mut family) in families.families {
        let Some(&lane) = lanes.get(&id) else {
            continue;
        };
        family.lane = lane;
        for child in &family.children {
            if nodes.contains_key(child) {
                family_by_child.insert(child.clone(), id.clone());
            }
        }
        reached.insert(id, family);
    }
    (reached, family_by_child)
}
