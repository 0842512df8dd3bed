use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::ExportConfig;
use crate::db::{ModelDatabase, Repository};
use crate::error::{RasError, Result};

use super::document::build_document;
use super::format::{ExportContext, NodeRecord, ReachRecord};

pub struct ExportStats {
    pub nodes: usize,
    pub reaches: usize,
    pub cross_sections: u64,
    pub bytes: usize,
    pub sha256: String,
}

pub enum OverwriteAction {
    Overwrite,
    Abort,
}

/// Everything read from the model for one export run.
pub struct ModelSnapshot {
    pub context: ExportContext,
    pub nodes: Vec<NodeRecord>,
    pub reaches: Vec<ReachRecord>,
}

/// Run the header queries and assemble the export context.
pub fn build_context(repo: &Repository, config: &ExportConfig) -> Result<ExportContext> {
    Ok(ExportContext {
        generator: config.generator.clone(),
        database_name: config.database_name(),
        host_name: config.host.clone(),
        schema_name: repo.schema().to_string(),
        spatial_unit: config.units.to_string(),
        reach_count: repo.number_of_reaches()?,
        cross_section_count: repo.number_of_xsections()?,
        extent: repo.spatial_extent()?,
    })
}

pub fn read_snapshot(repo: &Repository, config: &ExportConfig) -> Result<ModelSnapshot> {
    let context = build_context(repo, config)?;
    let nodes = repo.load_nodes()?;
    let reaches = repo.load_reaches()?;
    Ok(ModelSnapshot {
        context,
        nodes,
        reaches,
    })
}

/// Write bytes to a file, calling `on_conflict` if the file already exists.
/// Returns false when the caller chose to abort.
fn write_with_conflict_check(
    path: &Path,
    bytes: &[u8],
    on_conflict: &mut impl FnMut(&Path) -> Result<OverwriteAction>,
) -> Result<bool> {
    if path.exists() {
        match on_conflict(path)? {
            OverwriteAction::Overwrite => {}
            OverwriteAction::Abort => return Ok(false),
        }
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(true)
}

/// Export the model named in `config` to a RAS GIS Import file.
///
/// The whole document is generated before anything touches the output
/// path, so a failed export never leaves a truncated file behind. The
/// `on_conflict` callback decides what happens when the output exists.
pub fn export_model(
    config: &ExportConfig,
    on_conflict: &mut impl FnMut(&Path) -> Result<OverwriteAction>,
) -> Result<ExportStats> {
    let db = ModelDatabase::open(&config.model_path, &config.schema)?;
    let repo = db.repository();
    let snapshot = read_snapshot(&repo, config)?;

    let document = build_document(&snapshot.context, &snapshot.nodes, &snapshot.reaches)?;
    let sha256 = hex::encode(Sha256::digest(document.as_bytes()));

    let output_path = config.output_path();
    if !write_with_conflict_check(&output_path, document.as_bytes(), on_conflict)? {
        return Err(RasError::OutputExists { path: output_path });
    }

    info!(
        "Wrote {} ({} nodes, {} reaches, {} cross-sections)",
        output_path.display(),
        snapshot.nodes.len(),
        snapshot.reaches.len(),
        snapshot.context.cross_section_count
    );

    Ok(ExportStats {
        nodes: snapshot.nodes.len(),
        reaches: snapshot.reaches.len(),
        cross_sections: snapshot.context.cross_section_count,
        bytes: document.len(),
        sha256,
    })
}
