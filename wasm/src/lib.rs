use pedigree_layout::config::LayoutConfigFile;
use pedigree_layout::{LayoutConfig, LayoutRequest, layout_document};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PedigreeLayoutOptions {
    focus_person_id: Option<String>,
    #[serde(default)]
    pretty: bool,
    #[serde(flatten)]
    layout: LayoutConfigFile,
}

fn build_layout_config(options: &PedigreeLayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    config.apply_overrides(&options.layout);
    config
}

fn layout_json(data_json: &str, root_person_id: &str, options: PedigreeLayoutOptions) -> Result<String, String> {
    let mut request = LayoutRequest::new(root_person_id);
    if let Some(focus) = options.focus_person_id.as_deref() {
        request = request.with_focus(focus);
    }
    let config = build_layout_config(&options);
    let dump = layout_document(data_json, &request, &config).map_err(|error| error.to_string())?;
    dump.to_json(options.pretty).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn compute_pedigree_layout(
    data_json: &str,
    root_person_id: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<PedigreeLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        PedigreeLayoutOptions::default()
    };

    layout_json(data_json, root_person_id, options).map_err(|error| JsValue::from_str(&error))
}
