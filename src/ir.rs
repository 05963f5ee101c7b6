use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    ParentChild,
    Spouse,
    Sibling,
    HalfSibling,
    Partner,
}

impl RelationshipKind {
    /// Spouse and partner edges both bind a couple for placement.
    pub fn is_union(self) -> bool {
        matches!(self, Self::Spouse | Self::Partner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Current,
    Divorced,
    Separated,
    Widowed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub living: bool,
    #[serde(default, rename = "photoId", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Person {
    pub fn new(id: &str, given_name: &str, surname: &str) -> Self {
        Self {
            id: id.to_string(),
            given_name: given_name.to_string(),
            surname: surname.to_string(),
            living: false,
            photo: None,
        }
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.given_name.trim(), self.surname.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }
}

/// For `ParentChild`, `person_id1` is the parent and `person_id2` the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub person_id1: String,
    pub person_id2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RelationshipStatus>,
}

impl Relationship {
    pub fn new(id: &str, kind: RelationshipKind, person_id1: &str, person_id2: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            person_id1: person_id1.to_string(),
            person_id2: person_id2.to_string(),
            status: None,
        }
    }

    pub fn parent_child(id: &str, parent: &str, child: &str) -> Self {
        Self::new(id, RelationshipKind::ParentChild, parent, child)
    }

    pub fn spouse(id: &str, a: &str, b: &str) -> Self {
        Self::new(id, RelationshipKind::Spouse, a, b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyData {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl FamilyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, id: &str, given_name: &str, surname: &str) {
        self.people.push(Person::new(id, given_name, surname));
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }
}
