pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ExportConfig;
use crate::exchange::format::{DEFAULT_GENERATOR, MapUnit};

/// Export hydraulic model geometry to a RAS GIS Import file
#[derive(Parser, Debug)]
#[command(name = "rasgis", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty model file
    Init {
        /// Path of the model file to create
        model: PathBuf,
    },

    /// Write the RAS GIS Import file for a model
    Export {
        #[command(flatten)]
        model: ModelArgs,

        /// Output file (default: <model>.RASImport.sdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Show counts, extent and layer paths without writing anything
    Info {
        #[command(flatten)]
        model: ModelArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model file (default: model.sqlite in the user data directory)
    pub model: Option<PathBuf>,

    /// Schema name the model is attached under
    #[arg(long, default_value = "main")]
    pub schema: String,

    /// Host name printed in layer paths
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Database name printed in layer paths (default: model file stem)
    #[arg(long)]
    pub database: Option<String>,

    /// Map units of the model's coordinate system
    #[arg(long, default_value = "meters")]
    pub units: MapUnit,

    /// Tool name written on the first line of the file
    #[arg(long, default_value = DEFAULT_GENERATOR)]
    pub generator: String,
}

impl ModelArgs {
    pub fn into_config(self) -> Option<ExportConfig> {
        let model_path = match self.model {
            Some(path) => path,
            None => ExportConfig::default_model_path()?,
        };
        Some(ExportConfig {
            schema: self.schema,
            host: self.host,
            database: self.database,
            units: self.units,
            generator: self.generator,
            ..ExportConfig::new(model_path)
        })
    }
}
