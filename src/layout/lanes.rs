use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use super::family::FamilyIndex;
use super::generation::Generations;
use super::index::RelationshipIndex;
use super::types::FamilyKind;
use super::{Diagnostic, Diagnostics};

/// Hands out lane ids, preferring the free lane closest to a requested one.
#[derive(Debug)]
pub(super) struct LaneAllocator {
    used: BTreeSet<i64>,
    radius: i64,
}

impl LaneAllocator {
    pub fn new(radius: i64) -> Self {
        Self {
            used: BTreeSet::new(),
            radius: radius.max(0),
        }
    }

    /// Takes `preferred` if free, else the nearest free lane within the
    /// search radius (`+d` before `-d`). When every candidate is taken the
    /// preferred lane is shared and `false` is returned alongside it.
    pub fn allocate_near(&mut self, preferred: i64) -> (i64, bool) {
        if self.used.insert(preferred) {
            return (preferred, true);
        }
        for distance in 1..=self.radius {
            for candidate in [preferred + distance, preferred - distance] {
                if self.used.insert(candidate) {
                    return (candidate, true);
                }
            }
        }
        (preferred, false)
    }

    /// Maps every used lane onto `0..n`, keeping relative order.
    pub fn compaction(&self) -> HashMap<i64, usize> {
        self.used
            .iter()
            .enumerate()
            .map(|(compact, &lane)| (lane, compact))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LaneMembership {
    pub lane: usize,
    pub family_id: Option<String>,
}

/// Assigns a lane to every family with reached members.
///
/// The walk starts at the root's birth family and pulls each neighbouring
/// family in next to the family that reached it: the families the children
/// head, and the birth families of every member and of every member's
/// spouse. Families the walk never reaches are appended in key order.
pub(super) fn assign_lanes(
    families: &FamilyIndex,
    index: &RelationshipIndex<'_>,
    generations: &Generations<'_>,
    root: &str,
    search_radius: i64,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, usize> {
    let reachable = |family_id: &str| {
        families
            .get(family_id)
            .is_some_and(|family| family.members().any(|m| generations.contains(m)))
    };

    let mut allocator = LaneAllocator::new(search_radius);
    let mut raw: HashMap<String, i64> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    let mut place = |family_id: &str,
                     preferred: i64,
                     raw: &mut HashMap<String, i64>,
                     queue: &mut VecDeque<String>,
                     diagnostics: &mut Diagnostics| {
        if raw.contains_key(family_id) || !reachable(family_id) {
            return;
        }
        let (lane, free) = allocator.allocate_near(preferred);
        if !free {
            diagnostics.push(Diagnostic::LaneCollision {
                family_id: family_id.to_string(),
                lane,
            });
        }
        raw.insert(family_id.to_string(), lane);
        queue.push_back(family_id.to_string());
    };

    if let Some(seed) = families.birth_family(root) {
        place(seed, 0, &mut raw, &mut queue, diagnostics);
    }

    while let Some(current_id) = queue.pop_front() {
        let Some(current) = families.get(&current_id) else {
            continue;
        };
        let lane = raw[&current_id];

        for child in &current.children {
            for headed in families.parent_families(child) {
                place(headed.as_str(), lane, &mut raw, &mut queue, diagnostics);
            }
        }

        for member in current.members() {
            let spouses = index.spouses(member).iter().copied();
            for person in std::iter::once(member.as_str()).chain(spouses) {
                if let Some(birth) = families.birth_family(person) {
                    place(birth, lane, &mut raw, &mut queue, diagnostics);
                }
            }
        }
    }

    // BTreeMap keys iterate sorted, which is the fallback order.
    for family_id in families.families.keys() {
        place(family_id.as_str(), 0, &mut raw, &mut queue, diagnostics);
    }

    let compaction = allocator.compaction();
    let lanes: BTreeMap<String, usize> = raw
        .into_iter()
        .map(|(family_id, lane)| (family_id, compaction[&lane]))
        .collect();
    tracing::debug!(
        families = lanes.len(),
        lanes = compaction.len(),
        "assigned lineage lanes"
    );
    lanes
}

/// Picks the lane each reached person is drawn in: the first union family
/// they head, else the first family they head, else their birth family,
/// else lane 0. Partners of a union therefore share its lane.
///
/// Lanes are then renumbered so the lanes people are drawn in form `0..n`.
/// A family lane nobody is drawn in folds onto the nearest occupied lane
/// below it, or lane 0.
pub(super) fn lane_memberships<'a>(
    people: &[&'a str],
    families: &FamilyIndex,
    lanes: &mut BTreeMap<String, usize>,
) -> HashMap<&'a str, LaneMembership> {
    let is_union = |family_id: &&str| {
        families
            .get(family_id)
            .is_some_and(|family| family.kind != FamilyKind::Single)
    };

    let mut memberships: HashMap<&'a str, LaneMembership> = people
        .iter()
        .map(|&person| {
            let headed = families.parent_families(person);
            let unions = headed.iter().map(String::as_str).filter(is_union);
            let family_id = unions
                .chain(headed.iter().map(String::as_str))
                .chain(families.birth_family(person))
                .find(|family_id| lanes.contains_key(*family_id));
            let membership = match family_id {
                Some(family_id) => LaneMembership {
                    lane: lanes[family_id],
                    family_id: Some(family_id.to_string()),
                },
                None => LaneMembership {
                    lane: 0,
                    family_id: None,
                },
            };
            (person, membership)
        })
        .collect();

    let occupied: BTreeSet<usize> = memberships.values().map(|m| m.lane).collect();
    let fold = |lane: usize| occupied.range(..=lane).count().saturating_sub(1);
    for membership in memberships.values_mut() {
        membership.lane = fold(membership.lane);
    }
    for lane in lanes.values_mut() {
        *lane = fold(*lane);
    }
    memberships
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyData, Relationship};
    use crate::layout::family::build_families;
    use crate::layout::generation::assign_generations;

    #[test]
    fn allocator_probes_outward_then_forces() {
        let mut allocator = LaneAllocator::new(1);
        assert_eq!(allocator.allocate_near(0), (0, true));
        assert_eq!(allocator.allocate_near(0), (1, true));
        assert_eq!(allocator.allocate_near(0), (-1, true));
        assert_eq!(allocator.allocate_near(0), (0, false));
        let compaction = allocator.compaction();
        assert_eq!(compaction[&-1], 0);
        assert_eq!(compaction[&0], 1);
        assert_eq!(compaction[&1], 2);
    }

    #[test]
    fn allocator_default_radius_covers_ninety_nine_candidates() {
        let mut allocator = LaneAllocator::new(49);
        for _ in 0..99 {
            assert!(allocator.allocate_near(0).1);
        }
        assert_eq!(allocator.allocate_near(0), (0, false));
    }

    fn lanes_within(
        data: &FamilyData,
        root: &str,
        search_radius: i64,
    ) -> (BTreeMap<String, usize>, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::default();
        let index = RelationshipIndex::build(data, &mut diagnostics);
        let families = build_families(&index).unwrap();
        let root = index.person(root).unwrap().id.as_str();
        let generations = assign_generations(&index, root);
        let lanes = assign_lanes(
            &families,
            &index,
            &generations,
            root,
            search_radius,
            &mut diagnostics,
        );
        (lanes, diagnostics.into_vec())
    }

    fn lanes_for(data: &FamilyData, root: &str) -> (BTreeMap<String, usize>, Vec<Diagnostic>) {
        lanes_within(data, root, 49)
    }

    /// Family lanes and per-person lanes for everyone reached from `root`.
    fn memberships_for(
        data: &FamilyData,
        root: &str,
    ) -> (BTreeMap<String, usize>, BTreeMap<String, LaneMembership>) {
        let mut diagnostics = Diagnostics::default();
        let index = RelationshipIndex::build(data, &mut diagnostics);
        let families = build_families(&index).unwrap();
        let root = index.person(root).unwrap().id.as_str();
        let generations = assign_generations(&index, root);
        let mut lanes = assign_lanes(&families, &index, &generations, root, 49, &mut diagnostics);
        let people = generations.people_sorted();
        let memberships = lane_memberships(&people, &families, &mut lanes)
            .into_iter()
            .map(|(person, membership)| (person.to_string(), membership))
            .collect();
        (lanes, memberships)
    }

    fn in_law_data() -> FamilyData {
        // gp1+gp2 -> dad; ip1+ip2 -> mum; dad+mum -> me; unrelated x+y -> z
        let mut data = FamilyData::new();
        for id in ["gp1", "gp2", "ip1", "ip2", "dad", "mum", "me", "x", "y", "z"] {
            data.add_person(id, id, "");
        }
        let edges = [
            ("gp1", "dad"),
            ("gp2", "dad"),
            ("ip1", "mum"),
            ("ip2", "mum"),
            ("dad", "me"),
            ("mum", "me"),
            ("x", "z"),
            ("y", "z"),
        ];
        for (i, (parent, child)) in edges.iter().enumerate() {
            data.add_relationship(Relationship::parent_child(&format!("r{i}"), parent, child));
        }
        data.add_relationship(Relationship::spouse("s1", "dad", "mum"));
        data
    }

    #[test]
    fn root_family_seeds_lane_zero_and_in_laws_cluster() {
        let (lanes, diagnostics) = lanes_for(&in_law_data(), "me");
        assert!(diagnostics.is_empty());
        // Unreached family x+y gets no lane.
        assert!(!lanes.contains_key("couple-x-y"));
        assert_eq!(lanes.len(), 3);
        // Raw lanes: dad+mum 0, gp 1, ip -1; compacted keeps order.
        assert_eq!(lanes["couple-ip1-ip2"], 0);
        assert_eq!(lanes["couple-dad-mum"], 1);
        assert_eq!(lanes["couple-gp1-gp2"], 2);
    }

    #[test]
    fn root_without_birth_family_falls_back_in_key_order() {
        let mut data = FamilyData::new();
        for id in ["root", "a", "b", "c"] {
            data.add_person(id, id, "");
        }
        data.add_relationship(Relationship::parent_child("r1", "root", "b"));
        data.add_relationship(Relationship::spouse("r2", "root", "a"));
        data.add_relationship(Relationship::parent_child("r3", "b", "c"));
        let (lanes, _) = lanes_for(&data, "root");
        // Fallback order: single-b, single-root, spouse-a-root; raw 0, 1, -1.
        assert_eq!(lanes["spouse-a-root"], 0);
        assert_eq!(lanes["single-b"], 1);
        assert_eq!(lanes["single-root"], 2);
    }

    #[test]
    fn memberships_prefer_headed_family() {
        let data = in_law_data();
        let (mut lanes, _) = lanes_for(&data, "me");
        let mut diagnostics = Diagnostics::default();
        let index = RelationshipIndex::build(&data, &mut diagnostics);
        let families = build_families(&index).unwrap();
        let memberships = lane_memberships(&["dad", "me", "gp1"], &families, &mut lanes);
        assert_eq!(memberships["dad"].family_id.as_deref(), Some("couple-dad-mum"));
        assert_eq!(memberships["me"].family_id.as_deref(), Some("couple-dad-mum"));
        assert_eq!(memberships["gp1"].lane, lanes["couple-gp1-gp2"]);
    }

    #[test]
    fn sibling_families_share_the_lane_when_radius_is_zero() {
        // p -> amy, zed; each of them heads a family of their own.
        let mut data = FamilyData::new();
        for id in ["p", "amy", "zed", "k1", "k2"] {
            data.add_person(id, id, "");
        }
        data.add_relationship(Relationship::parent_child("r1", "p", "amy"));
        data.add_relationship(Relationship::parent_child("r2", "p", "zed"));
        data.add_relationship(Relationship::parent_child("r3", "amy", "k1"));
        data.add_relationship(Relationship::parent_child("r4", "zed", "k2"));
        let (lanes, diagnostics) = lanes_within(&data, "amy", 0);
        assert_eq!(lanes.values().copied().collect::<BTreeSet<_>>(), BTreeSet::from([0]));
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::LaneCollision {
                    family_id: "single-amy".to_string(),
                    lane: 0,
                },
                Diagnostic::LaneCollision {
                    family_id: "single-zed".to_string(),
                    lane: 0,
                },
            ]
        );
    }

    #[test]
    fn partners_are_drawn_in_their_union_lane() {
        // a+b are partners with one child each by someone else.
        let mut data = FamilyData::new();
        for id in ["a", "b", "c", "d"] {
            data.add_person(id, id, "");
        }
        data.add_relationship(Relationship::spouse("s", "a", "b"));
        data.add_relationship(Relationship::parent_child("r1", "a", "c"));
        data.add_relationship(Relationship::parent_child("r2", "b", "d"));
        let (lanes, memberships) = memberships_for(&data, "a");
        assert_eq!(lanes["spouse-a-b"], 0);
        for partner in ["a", "b"] {
            assert_eq!(memberships[partner].lane, 0, "{partner}");
            assert_eq!(memberships[partner].family_id.as_deref(), Some("spouse-a-b"));
        }
        assert_eq!(memberships["c"].lane, lanes["single-a"]);
        assert_eq!(memberships["d"].lane, lanes["single-b"]);
        let drawn: BTreeSet<usize> = memberships.values().map(|m| m.lane).collect();
        assert_eq!(drawn, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn lane_nobody_is_drawn_in_folds_onto_the_one_below() {
        // a heads single-a but is drawn with partner b; c is drawn in the
        // family c heads, so nobody sits in single-a's lane.
        let mut data = FamilyData::new();
        for id in ["a", "b", "c", "e"] {
            data.add_person(id, id, "");
        }
        data.add_relationship(Relationship::spouse("s", "a", "b"));
        data.add_relationship(Relationship::parent_child("r1", "a", "c"));
        data.add_relationship(Relationship::parent_child("r2", "c", "e"));
        let (lanes, memberships) = memberships_for(&data, "a");
        // Before folding: spouse-a-b 0, single-a 1, single-c 2.
        assert_eq!(lanes["spouse-a-b"], 0);
        assert_eq!(lanes["single-a"], 0);
        assert_eq!(lanes["single-c"], 1);
        assert_eq!((memberships["a"].lane, memberships["b"].lane), (0, 0));
        assert_eq!((memberships["c"].lane, memberships["e"].lane), (1, 1));
    }
}
