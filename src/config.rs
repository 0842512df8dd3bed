use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::exchange::format::{DEFAULT_GENERATOR, MapUnit};

/// Extension HEC-RAS expects for GIS import files.
pub const OUTPUT_EXTENSION: &str = "RASImport.sdf";

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub model_path: PathBuf,
    pub output: Option<PathBuf>,
    pub schema: String,
    pub host: String,
    pub database: Option<String>,
    pub units: MapUnit,
    pub generator: String,
}

impl ExportConfig {
    pub fn new(model_path: PathBuf) -> ExportConfig {
        ExportConfig {
            model_path,
            output: None,
            schema: "main".to_string(),
            host: "localhost".to_string(),
            database: None,
            units: MapUnit::default(),
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }

    /// Model file in the per-user data directory, used when no path is given.
    pub fn default_model_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "rasgis")?;
        Some(proj_dirs.data_dir().join("model.sqlite"))
    }

    /// Database name printed in layer paths: the configured name, or the
    /// model file's stem.
    pub fn database_name(&self) -> String {
        self.database.clone().unwrap_or_else(|| file_stem(&self.model_path))
    }

    /// Configured output path, or the model path with the import extension.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.model_path.with_extension(OUTPUT_EXTENSION))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}
