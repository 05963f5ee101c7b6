use std::collections::{BTreeMap, BTreeSet};

use crate::ir::{Person, RelationshipStatus};

use super::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FamilyKind {
    /// One recorded parent: `single-<parent>`.
    Single,
    /// Two recorded parents: `couple-<min>-<max>`.
    Couple,
    /// A spouse or partner pair with no recorded children: `spouse-<min>-<max>`.
    Childless,
}

impl FamilyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FamilyKind::Single => "single",
            FamilyKind::Couple => "couple",
            FamilyKind::Childless => "childless",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyUnit {
    pub id: String,
    pub kind: FamilyKind,
    /// Sorted by person id.
    pub parents: Vec<String>,
    /// In order of first appearance in the relationship list.
    pub children: Vec<String>,
    pub lane: usize,
}

impl FamilyUnit {
    pub fn single_key(parent: &str) -> String {
        format!("single-{parent}")
    }

    pub fn couple_key(a: &str, b: &str) -> String {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        format!("couple-{lo}-{hi}")
    }

    pub fn childless_key(a: &str, b: &str) -> String {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        format!("spouse-{lo}-{hi}")
    }

    pub fn members(&self) -> impl Iterator<Item = &String> {
        self.parents.iter().chain(self.children.iter())
    }
}

#[derive(Debug, Clone)]
pub struct ChartNode {
    pub id: String,
    pub person: Person,
    pub generation: usize,
    pub lane: usize,
    /// The family unit the lane was taken from.
    pub family_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_highlighted: bool,
}

impl ChartNode {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Parent,
    Spouse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLink {
    pub kind: LinkKind,
    /// Parents of the family (parent links) or one partner (spouse links).
    pub from: Vec<String>,
    /// Children of the family (parent links) or the other partner.
    pub to: Vec<String>,
    pub family_id: Option<String>,
    /// Union junction where the parent lines meet before fanning out to
    /// the children. Parent links only.
    pub junction: Option<(f32, f32)>,
    pub status: Option<RelationshipStatus>,
    pub is_highlighted: bool,
}

impl ChartLink {
    pub fn touches(&self, id: &str) -> bool {
        self.from.iter().chain(self.to.iter()).any(|member| member == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRequest {
    pub root_person_id: String,
    /// Person whose nodes and links are highlighted. Defaults to the root.
    pub focus_person_id: Option<String>,
}

impl LayoutRequest {
    pub fn new(root_person_id: &str) -> Self {
        Self {
            root_person_id: root_person_id.to_string(),
            focus_person_id: None,
        }
    }

    pub fn with_focus(mut self, focus_person_id: &str) -> Self {
        self.focus_person_id = Some(focus_person_id.to_string());
        self
    }

    pub fn focus(&self) -> &str {
        self.focus_person_id
            .as_deref()
            .unwrap_or(&self.root_person_id)
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// Placed people keyed by id. Doubles as the node-by-id lookup.
    pub nodes: BTreeMap<String, ChartNode>,
    pub links: Vec<ChartLink>,
    pub width: f32,
    pub height: f32,
    pub families: BTreeMap<String, FamilyUnit>,
    pub family_by_child: BTreeMap<String, String>,
    pub root_person_id: String,
    pub focus_person_id: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&ChartNode> {
        self.nodes.get(id)
    }

    pub fn generation_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| node.generation + 1)
            .max()
            .unwrap_or(0)
    }

    /// Lane ids that nodes are drawn in. Family lanes are always among them.
    pub fn lanes(&self) -> BTreeSet<usize> {
        self.nodes.values().map(|node| node.lane).collect()
    }

    pub fn nodes_in_generation(&self, generation: usize) -> Vec<&ChartNode> {
        let mut nodes: Vec<&ChartNode> = self
            .nodes
            .values()
            .filter(|node| node.generation == generation)
            .collect();
        nodes.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.id.cmp(&b.id)));
        nodes
    }

    pub fn links_of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &ChartLink> {
        self.links.iter().filter(move |link| link.kind == kind)
    }
}
