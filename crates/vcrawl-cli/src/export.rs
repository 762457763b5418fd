//! Export `discovered` to one of the three formats supported:
//! a flat JSON list, a line-delimited JSON stream, or CSV.

use std::collections::HashMap;
use std::path::Path;

use vcrawl_models::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Jsonl,
    Csv,
}

impl ExportFormat {
    /// Infer the format from a path's extension, defaulting to JSON when
    /// the extension is missing or unrecognized (mirrors the original
    /// crawler's `format == "auto"` behavior).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => ExportFormat::Jsonl,
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

pub fn export(
    discovered: &HashMap<String, Vertex>,
    path: &Path,
    format: ExportFormat,
) -> std::io::Result<()> {
    match format {
        ExportFormat::Json => export_json(discovered, path),
        ExportFormat::Jsonl => export_jsonl(discovered, path),
        ExportFormat::Csv => export_csv(discovered, path),
    }
}

fn export_json(discovered: &HashMap<String, Vertex>, path: &Path) -> std::io::Result<()> {
    let vertices: Vec<&Vertex> = discovered.values().collect();
    let body = serde_json::to_vec_pretty(&vertices)?;
    std::fs::write(path, body)
}

fn export_jsonl(discovered: &HashMap<String, Vertex>, path: &Path) -> std::io::Result<()> {
    let mut body = Vec::new();
    for vertex in discovered.values() {
        serde_json::to_writer(&mut body, vertex)?;
        body.push(b'\n');
    }
    std::fs::write(path, body)
}

fn export_csv(discovered: &HashMap<String, Vertex>, path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        "video_id",
        "url",
        "title",
        "channel",
        "duration",
        "view_count",
        "depth",
        "parent_id",
        "discovered_at",
    ])?;
    for vertex in discovered.values() {
        writer.write_record([
            vertex.id.clone(),
            vertex.url.clone(),
            vertex.title.clone().unwrap_or_default(),
            vertex.channel.clone().unwrap_or_default(),
            vertex
                .duration_seconds
                .map(|d| d.to_string())
                .unwrap_or_default(),
            vertex
                .view_count
                .map(|v| v.to_string())
                .unwrap_or_default(),
            vertex.depth.to_string(),
            vertex.parent_id.clone().unwrap_or_default(),
            vertex.discovered_at.to_rfc3339(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
