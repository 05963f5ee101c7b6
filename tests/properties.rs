//! Property tests over generated pedigrees.
//!
//! Every generated pedigree is layered: each person has a true generation,
//! parents sit exactly one generation above their children and partners
//! share a generation. On such input the layout must:
//!
//! 1. place every parent above its child,
//! 2. put partners in one generation,
//! 3. keep nodes of one generation from overlapping,
//! 4. be byte-for-byte repeatable,
//! 5. use a gap-free range of lane ids,
//! 6. leave out everyone with no path to the root.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use pedigree_layout::{
    FamilyData, Layout, LayoutConfig, LayoutDump, LayoutRequest, Relationship, RelationshipKind,
    compute_layout,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Pedigree {
    data: FamilyData,
    root: String,
}

fn person_id(generation: usize, index: usize) -> String {
    format!("g{generation}p{index}")
}

fn build_pedigree(
    sizes: &[usize],
    parent_picks: &[(usize, u8, u8)],
    spouse_picks: &[(u8, u8, u8)],
    root_pick: u8,
) -> Pedigree {
    let mut data = FamilyData::new();
    let mut ids = Vec::new();
    for (generation, &size) in sizes.iter().enumerate() {
        for index in 0..size {
            let id = person_id(generation, index);
            data.add_person(&id, &format!("Given{index}"), &format!("Gen{generation}"));
            ids.push(id);
        }
    }

    let mut next_rel = 0usize;
    let mut rel_id = || {
        next_rel += 1;
        format!("r{next_rel}")
    };

    let mut counter = 0usize;
    for generation in 1..sizes.len() {
        let above = sizes[generation - 1];
        for index in 0..sizes[generation] {
            let (count, first, second) = parent_picks[counter % parent_picks.len()];
            counter += 1;
            let child = person_id(generation, index);
            if count >= 1 {
                let parent = person_id(generation - 1, first as usize % above);
                data.add_relationship(Relationship::parent_child(&rel_id(), &parent, &child));
            }
            if count >= 2 && first as usize % above != second as usize % above {
                let parent = person_id(generation - 1, second as usize % above);
                data.add_relationship(Relationship::parent_child(&rel_id(), &parent, &child));
            }
        }
    }

    for &(generation, a, b) in spouse_picks {
        let generation = generation as usize % sizes.len();
        let size = sizes[generation];
        let (a, b) = (a as usize % size, b as usize % size);
        if a != b {
            let kind = if (a + b) % 2 == 0 {
                RelationshipKind::Spouse
            } else {
                RelationshipKind::Partner
            };
            data.add_relationship(Relationship::new(
                &rel_id(),
                kind,
                &person_id(generation, a),
                &person_id(generation, b),
            ));
        }
    }

    let root = ids[root_pick as usize % ids.len()].clone();
    Pedigree { data, root }
}

fn pedigree_strategy() -> impl Strategy<Value = Pedigree> {
    (
        prop::collection::vec(1usize..=4, 1..=5),
        prop::collection::vec((0usize..=2, any::<u8>(), any::<u8>()), 1..=16),
        prop::collection::vec((any::<u8>(), any::<u8>(), any::<u8>()), 0..=6),
        any::<u8>(),
    )
        .prop_map(|(sizes, parent_picks, spouse_picks, root_pick)| {
            build_pedigree(&sizes, &parent_picks, &spouse_picks, root_pick)
        })
}

fn lay_out(pedigree: &Pedigree) -> Layout {
    compute_layout(
        &pedigree.data,
        &LayoutRequest::new(&pedigree.root),
        &LayoutConfig::default(),
    )
    .expect("layered pedigrees have at most two parents per child")
}

fn reachable(data: &FamilyData, root: &str) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in &data.relationships {
        if rel.kind == RelationshipKind::ParentChild || rel.kind.is_union() {
            adjacency.entry(rel.person_id1.as_str()).or_default().push(rel.person_id2.as_str());
            adjacency.entry(rel.person_id2.as_str()).or_default().push(rel.person_id1.as_str());
        }
    }
    let mut seen = HashSet::from([root.to_string()]);
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for &next in adjacency.get(current).into_iter().flatten() {
            if seen.insert(next.to_string()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn parents_precede_children(pedigree in pedigree_strategy()) {
        let layout = lay_out(&pedigree);
        for rel in &pedigree.data.relationships {
            if rel.kind != RelationshipKind::ParentChild {
                continue;
            }
            if let (Some(parent), Some(child)) = (layout.node(&rel.person_id1), layout.node(&rel.person_id2)) {
                prop_assert!(
                    parent.generation < child.generation,
                    "{} (gen {}) is not above {} (gen {})",
                    parent.id, parent.generation, child.id, child.generation
                );
            }
        }
    }

    #[test]
    fn partners_share_a_generation(pedigree in pedigree_strategy()) {
        let layout = lay_out(&pedigree);
        for rel in pedigree.data.relationships.iter().filter(|rel| rel.kind.is_union()) {
            if let (Some(a), Some(b)) = (layout.node(&rel.person_id1), layout.node(&rel.person_id2)) {
                prop_assert_eq!(a.generation, b.generation, "{} and {}", &a.id, &b.id);
            }
        }
    }

    #[test]
    fn generations_never_overlap(pedigree in pedigree_strategy()) {
        let layout = lay_out(&pedigree);
        let config = LayoutConfig::default();
        let step = config.node_height + config.row_gap;
        for generation in 0..layout.generation_count() {
            for pair in layout.nodes_in_generation(generation).windows(2) {
                prop_assert!(
                    pair[1].y >= pair[0].y + step - 1e-3,
                    "{} at {} overlaps {} at {}",
                    pair[1].id, pair[1].y, pair[0].id, pair[0].y
                );
            }
        }
    }

    #[test]
    fn layout_is_deterministic(pedigree in pedigree_strategy()) {
        let first = LayoutDump::from_layout(&lay_out(&pedigree)).to_json(false).unwrap();
        let second = LayoutDump::from_layout(&lay_out(&pedigree)).to_json(false).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn lanes_are_contiguous(pedigree in pedigree_strategy()) {
        let layout = lay_out(&pedigree);
        let lanes: BTreeSet<usize> = layout.nodes.values().map(|node| node.lane).collect();
        let expected: BTreeSet<usize> = (0..lanes.len()).collect();
        for family in layout.families.values() {
            prop_assert!(lanes.contains(&family.lane), "{} in empty lane {}", &family.id, family.lane);
        }
        prop_assert_eq!(lanes, expected);
    }

    #[test]
    fn only_reachable_people_are_placed(pedigree in pedigree_strategy()) {
        let layout = lay_out(&pedigree);
        let expected = reachable(&pedigree.data, &pedigree.root);
        let placed: HashSet<String> = layout.nodes.keys().cloned().collect();
        prop_assert_eq!(placed, expected);
    }
}
