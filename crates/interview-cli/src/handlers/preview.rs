use std::io::Write;
use std::path::Path;

use interview_preview::{render_preview, resolve_renderer};
use interview_types::CreativeAsset;
use serde_json::Value;

use crate::error::CliResult;

/// Assets from a JSON document: one asset, a list, or `{"assets": [...]}`
pub fn load_assets(raw: &str) -> CliResult<Vec<CreativeAsset>> {
    let value: Value = serde_json::from_str(raw)?;
    let assets = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        Value::Object(ref map) if map.get("assets").is_some_and(Value::is_array) => {
            serde_json::from_value(map["assets"].clone())?
        }
        other => vec![serde_json::from_value(other)?],
    };
    Ok(assets)
}

pub fn write_previews<W: Write>(assets: &[CreativeAsset], out: &mut W) -> CliResult<()> {
    for (i, asset) in assets.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        tracing::debug!("Asset {:?} renders as {:?}", asset.id, resolve_renderer(asset));
        writeln!(out, "{}", render_preview(asset))?;
    }
    if assets.is_empty() {
        writeln!(out, "No assets to preview")?;
    }
    Ok(())
}

pub fn run_preview<W: Write>(path: &Path, out: &mut W) -> CliResult<()> {
    let raw = std::fs::read_to_string(path)?;
    let assets = load_assets(&raw)?;
    write_previews(&assets, out)
}
