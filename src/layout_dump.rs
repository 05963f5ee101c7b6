use crate::ir::{Person, RelationshipStatus};
use crate::layout::{Diagnostic, Layout, LinkKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub root_person_id: String,
    pub focus_person_id: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub node_by_id: BTreeMap<String, usize>,
    pub links: Vec<LinkDump>,
    /// Reached families keyed by family id.
    pub families: BTreeMap<String, FamilyDump>,
    pub family_by_child: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub person: Person,
    pub display_name: String,
    pub generation: usize,
    pub lane: usize,
    pub family_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_highlighted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDump {
    pub kind: &'static str,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub family_id: Option<String>,
    pub junction: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RelationshipStatus>,
    pub is_highlighted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDump {
    pub id: String,
    pub kind: &'static str,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub lane: usize,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes: Vec<NodeDump> = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.id.clone(),
                person: node.person.clone(),
                display_name: node.person.display_name(),
                generation: node.generation,
                lane: node.lane,
                family_id: node.family_id.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                is_highlighted: node.is_highlighted,
            })
            .collect();
        let node_by_id = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                kind: match link.kind {
                    LinkKind::Parent => "parent",
                    LinkKind::Spouse => "spouse",
                },
                from: link.from.clone(),
                to: link.to.clone(),
                family_id: link.family_id.clone(),
                junction: link.junction.map(|(x, y)| [x, y]),
                status: link.status,
                is_highlighted: link.is_highlighted,
            })
            .collect();

        let families = layout
            .families
            .iter()
            .map(|(id, family)| {
                let dump = FamilyDump {
                    id: family.id.clone(),
                    kind: family.kind.as_str(),
                    parents: family.parents.clone(),
                    children: family.children.clone(),
                    lane: family.lane,
                };
                (id.clone(), dump)
            })
            .collect();

        LayoutDump {
            root_person_id: layout.root_person_id.clone(),
            focus_person_id: layout.focus_person_id.clone(),
            width: layout.width,
            height: layout.height,
            nodes,
            node_by_id,
            links,
            families,
            family_by_child: layout.family_by_child.clone(),
            diagnostics: layout.diagnostics.clone(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Writes the dump to `path`, or to stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, layout: &Layout, pretty: bool) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &dump)?;
    } else {
        serde_json::to_writer(&mut writer, &dump)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
