use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;

use super::family::FamilyIndex;
use super::generation::Generations;
use super::index::RelationshipIndex;
use super::lanes::LaneMembership;

/// A couple or a single person stacked as one unit inside a lane.
#[derive(Debug, Clone)]
struct Block<'a> {
    members: Vec<&'a str>,
    lane: usize,
    /// Mean child anchor of the families the members head, if any child is
    /// already placed.
    anchor: Option<f32>,
    family_key: String,
    name_key: String,
}

fn compare_blocks(a: &Block<'_>, b: &Block<'_>) -> Ordering {
    let by_anchor = match (a.anchor, b.anchor) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_anchor
        .then(a.lane.cmp(&b.lane))
        .then_with(|| a.family_key.cmp(&b.family_key))
        .then_with(|| a.name_key.cmp(&b.name_key))
}

/// Vertical placement of every reached person.
///
/// Horizontal position is a pure function of the generation and is not
/// handled here.
pub(super) struct Positioner<'c, 'a> {
    pub index: &'c RelationshipIndex<'a>,
    pub families: &'c FamilyIndex,
    pub generations: &'c Generations<'a>,
    pub memberships: &'c HashMap<&'a str, LaneMembership>,
    pub config: &'c LayoutConfig,
}

impl<'c, 'a> Positioner<'c, 'a> {
    pub fn place(&self) -> HashMap<&'a str, f32> {
        let mut ys: HashMap<&'a str, f32> = HashMap::with_capacity(self.generations.len());
        let by_generation = self.people_by_generation();

        for people in by_generation.values().rev() {
            self.stack_generation(people, &mut ys);
        }
        for _ in 0..self.config.anchor_iterations {
            self.refine_anchors(&mut ys);
        }
        for people in by_generation.values() {
            self.pack_generation(people, &mut ys);
        }
        ys
    }

    fn people_by_generation(&self) -> BTreeMap<usize, Vec<&'a str>> {
        let mut by_generation: BTreeMap<usize, Vec<&'a str>> = BTreeMap::new();
        for person in self.generations.people_sorted() {
            if let Some(generation) = self.generations.get(person) {
                by_generation.entry(generation).or_default().push(person);
            }
        }
        by_generation
    }

    fn lane_of(&self, person: &str) -> usize {
        self.memberships.get(person).map_or(0, |m| m.lane)
    }

    /// Pass 1: blocks sorted by (child anchor, lane, family key, name) and
    /// stacked from the top of their lane band.
    fn stack_generation(&self, people: &[&'a str], ys: &mut HashMap<&'a str, f32>) {
        let mut blocks = self.blocks(people, ys);
        blocks.sort_by(compare_blocks);

        let row_height = self.config.row_height();
        let mut cursors: HashMap<usize, f32> = HashMap::new();
        for block in &blocks {
            let cursor = cursors
                .entry(block.lane)
                .or_insert_with(|| self.config.lane_origin(block.lane as i64));
            for &member in &block.members {
                ys.insert(member, *cursor);
                *cursor += row_height;
            }
        }
    }

    fn blocks(&self, people: &[&'a str], ys: &HashMap<&'a str, f32>) -> Vec<Block<'a>> {
        let mut by_lane: BTreeMap<usize, Vec<&'a str>> = BTreeMap::new();
        for &person in people {
            by_lane.entry(self.lane_of(person)).or_default().push(person);
        }

        let mut blocks = Vec::new();
        for (lane, members) in by_lane {
            let in_lane: HashSet<&str> = members.iter().copied().collect();
            let mut paired: HashSet<&str> = HashSet::new();
            for &person in &members {
                if !paired.insert(person) {
                    continue;
                }
                let partner = self
                    .index
                    .spouses(person)
                    .iter()
                    .copied()
                    .filter(|s| in_lane.contains(s) && !paired.contains(s))
                    .min();
                let block_members = match partner {
                    Some(partner) => {
                        paired.insert(partner);
                        let mut pair = vec![person, partner];
                        pair.sort_unstable();
                        pair
                    }
                    None => vec![person],
                };
                blocks.push(self.block(block_members, lane, ys));
            }
        }
        blocks
    }

    fn block(&self, members: Vec<&'a str>, lane: usize, ys: &HashMap<&'a str, f32>) -> Block<'a> {
        let mut headed: Vec<&str> = Vec::new();
        for &member in &members {
            for family_id in self.families.parent_families(member) {
                if !headed.contains(&family_id.as_str()) {
                    headed.push(family_id);
                }
            }
        }
        let anchors: Vec<f32> = headed
            .iter()
            .filter_map(|family_id| self.children_anchor(family_id, ys))
            .collect();
        let anchor = mean(&anchors);

        let family_key = members
            .iter()
            .find_map(|m| self.families.birth_family(m))
            .or_else(|| headed.first().copied())
            .unwrap_or_default()
            .to_string();

        let name_key = members
            .iter()
            .map(|&m| match self.index.person(m) {
                Some(person) => format!(
                    "{}\u{1f}{}\u{1f}{}",
                    person.surname, person.given_name, person.id
                ),
                None => m.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\u{1e}");

        Block {
            members,
            lane,
            anchor,
            family_key,
            name_key,
        }
    }

    fn children_anchor(&self, family_id: &str, ys: &HashMap<&'a str, f32>) -> Option<f32> {
        let family = self.families.get(family_id)?;
        let placed: Vec<f32> = family
            .children
            .iter()
            .filter_map(|child| ys.get(child.as_str()).copied())
            .collect();
        mean(&placed)
    }

    /// Pass 2: pull parents toward the mean of their children, at most
    /// `max_anchor_shift` per pass.
    fn refine_anchors(&self, ys: &mut HashMap<&'a str, f32>) {
        let max_shift = self.config.max_anchor_shift;
        let min_distance = self.config.min_partner_distance();

        for family in self.families.families.values() {
            let Some(anchor) = self.children_anchor(&family.id, ys) else {
                continue;
            };
            let parents: Vec<&str> = family
                .parents
                .iter()
                .map(String::as_str)
                .filter(|p| ys.contains_key(*p))
                .collect();
            match parents.as_slice() {
                [single] => {
                    if let Some(y) = ys.get_mut(*single) {
                        *y += (anchor - *y).clamp(-max_shift, max_shift);
                    }
                }
                [a, b] => {
                    let (ya, yb) = (ys[*a], ys[*b]);
                    let mid = (ya + yb) / 2.0;
                    let delta = (anchor - mid).clamp(-max_shift, max_shift);
                    let (mut ya, mut yb) = (ya + delta, yb + delta);
                    if (yb - ya).abs() < min_distance {
                        let mid = mid + delta;
                        let a_first = ya < yb || (ya == yb && a <= b);
                        let (upper, lower) = (mid - min_distance / 2.0, mid + min_distance / 2.0);
                        if a_first {
                            (ya, yb) = (upper, lower);
                        } else {
                            (ya, yb) = (lower, upper);
                        }
                    }
                    if let Some(y) = ys.get_mut(*a) {
                        *y = ya;
                    }
                    if let Some(y) = ys.get_mut(*b) {
                        *y = yb;
                    }
                }
                _ => {}
            }
        }
    }

    /// Pass 3: walk a generation top to bottom and push down anything that
    /// would overlap the node above it.
    fn pack_generation(&self, people: &[&'a str], ys: &mut HashMap<&'a str, f32>) {
        let mut column: Vec<(&'a str, f32)> = people
            .iter()
            .filter_map(|&p| ys.get(p).map(|&y| (p, y)))
            .collect();
        column.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        let step = self.config.node_height + self.config.row_gap;
        let mut previous: Option<f32> = None;
        for (person, mut y) in column {
            if let Some(prev) = previous
                && y < prev + step
            {
                y = prev + step;
                ys.insert(person, y);
            }
            previous = Some(y);
        }
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}
