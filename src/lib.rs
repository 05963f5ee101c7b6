#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use ir::{FamilyData, Person, Relationship, RelationshipKind, RelationshipStatus};
pub use layout::{Diagnostic, Layout, LayoutError, LayoutRequest, compute_layout};
pub use layout_dump::LayoutDump;
pub use parser::{ParseError, parse_family_data};

/// Parses a family document and lays it out in one step.
pub fn layout_document(
    input: &str,
    request: &LayoutRequest,
    config: &LayoutConfig,
) -> anyhow::Result<LayoutDump> {
    let data = parse_family_data(input)?;
    let layout = compute_layout(&data, request, config)?;
    Ok(LayoutDump::from_layout(&layout))
}
