use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Horizontal space between two generation columns.
    pub generation_gap: f32,
    /// Minimum vertical gap between nodes of one generation after packing.
    pub row_gap: f32,
    pub lane_height: f32,
    pub padding: f32,
    pub anchor_iterations: usize,
    pub max_anchor_shift: f32,
    /// Extra gap kept between two partners on top of the node height.
    pub partner_gap: f32,
    pub lane_search_radius: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 56.0,
            generation_gap: 90.0,
            row_gap: 16.0,
            lane_height: 160.0,
            padding: 40.0,
            anchor_iterations: 3,
            max_anchor_shift: 120.0,
            partner_gap: 8.0,
            lane_search_radius: 49,
        }
    }
}

impl LayoutConfig {
    pub fn row_height(&self) -> f32 {
        self.node_height + self.row_gap
    }

    pub fn column_width(&self) -> f32 {
        self.node_width + self.generation_gap
    }

    pub fn min_partner_distance(&self) -> f32 {
        self.node_height + self.partner_gap
    }

    pub fn lane_origin(&self, lane: i64) -> f32 {
        lane as f32 * self.lane_height
    }

    pub fn generation_x(&self, generation: usize) -> f32 {
        generation as f32 * self.column_width()
    }

    /// Applies the camelCase overrides of a config document.
    pub fn apply_overrides(&mut self, file: &LayoutConfigFile) {
        if let Some(v) = file.node_width {
            self.node_width = v.max(1.0);
        }
        if let Some(v) = file.node_height {
            self.node_height = v.max(1.0);
        }
        if let Some(v) = file.generation_gap {
            self.generation_gap = v.max(0.0);
        }
        if let Some(v) = file.row_gap {
            self.row_gap = v.max(0.0);
        }
        if let Some(v) = file.lane_height {
            self.lane_height = v.max(1.0);
        }
        if let Some(v) = file.padding {
            self.padding = v.max(0.0);
        }
        if let Some(v) = file.anchor_iterations {
            self.anchor_iterations = v;
        }
        if let Some(v) = file.max_anchor_shift {
            self.max_anchor_shift = v.max(0.0);
        }
        if let Some(v) = file.partner_gap {
            self.partner_gap = v.max(0.0);
        }
        if let Some(v) = file.lane_search_radius {
            self.lane_search_radius = v.max(0);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub dump: DumpConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfigFile {
    pub node_width: Option<f32>,
    pub node_height: Option<f32>,
    pub generation_gap: Option<f32>,
    pub row_gap: Option<f32>,
    pub lane_height: Option<f32>,
    pub padding: Option<f32>,
    pub anchor_iterations: Option<usize>,
    pub max_anchor_shift: Option<f32>,
    pub partner_gap: Option<f32>,
    pub lane_search_radius: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    pretty: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(layout) = parsed.layout {
        config.layout.apply_overrides(&layout);
    }
    if let Some(pretty) = parsed.pretty {
        config.dump.pretty = pretty;
    }

    Ok(config)
}
