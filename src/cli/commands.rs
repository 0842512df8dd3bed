use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use tracing::debug;

use crate::config::ExportConfig;
use crate::db::ModelDatabase;
use crate::error::{RasError, Result};
use crate::exchange::format::{STREAM_LAYER, XS_LAYER};
use crate::exchange::{OverwriteAction, build_context, export_model};

use super::{Cli, Commands, ModelArgs};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { model } => cmd_init(&model),
        Commands::Export {
            model,
            output,
            force,
        } => {
            let mut config = resolve_config(model)?;
            config.output = output;
            cmd_export(&config, force)
        }
        Commands::Info { model, json } => cmd_info(&resolve_config(model)?, json),
    }
}

fn resolve_config(args: ModelArgs) -> Result<ExportConfig> {
    args.into_config()
        .ok_or_else(|| RasError::Config("Could not determine data directory".into()))
}

fn cmd_init(model: &Path) -> Result<()> {
    if model.exists() {
        return Err(RasError::OutputExists {
            path: model.to_path_buf(),
        });
    }
    ModelDatabase::create(model)?;
    println!("Created model: {}", model.display());
    Ok(())
}

fn cmd_export(config: &ExportConfig, force: bool) -> Result<()> {
    debug!("Exporting {:?}", config);

    let stats = export_model(config, &mut |path| {
        if force {
            Ok(OverwriteAction::Overwrite)
        } else {
            confirm_overwrite(path)
        }
    })?;

    println!("Exported: {}", config.output_path().display());
    println!("  Endpoints: {}", stats.nodes);
    println!("  Reaches: {}", stats.reaches);
    println!("  Cross-sections: {}", stats.cross_sections);
    println!("  Size: {} bytes", stats.bytes);
    println!("  SHA-256: {}", stats.sha256);
    Ok(())
}

/// Ask on the terminal whether to replace an existing file. Without a
/// terminal the answer is no.
fn confirm_overwrite(path: &Path) -> Result<OverwriteAction> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(OverwriteAction::Abort);
    }

    print!("{} already exists. Overwrite? [y/N] ", path.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
        Ok(OverwriteAction::Overwrite)
    } else {
        Ok(OverwriteAction::Abort)
    }
}

fn cmd_info(config: &ExportConfig, json: bool) -> Result<()> {
    let db = ModelDatabase::open(&config.model_path, &config.schema)?;
    let ctx = build_context(&db.repository(), config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ctx)?);
        return Ok(());
    }

    println!("Stream layer: {}", ctx.layer_path(STREAM_LAYER));
    println!("  Reaches: {}", ctx.reach_count);
    println!("Cross-section layer: {}", ctx.layer_path(XS_LAYER));
    println!("  Cross-sections: {}", ctx.cross_section_count);
    println!("Extent: {}", ctx.extent);
    println!("Units: {}", ctx.spatial_unit);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_init_then_info_reports_missing_extent() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("empty.sqlite");
        let model_arg = model.to_string_lossy().into_owned();

        run(Cli::try_parse_from(["rasgis", "init", model_arg.as_str()]).unwrap()).unwrap();
        assert!(model.exists());

        // A second init must not clobber the file
        let again = run(Cli::try_parse_from(["rasgis", "init", model_arg.as_str()]).unwrap());
        assert!(matches!(again, Err(RasError::OutputExists { .. })));

        // No cross-sections means no extent to report
        let info = run(Cli::try_parse_from(["rasgis", "info", model_arg.as_str(), "--json"]).unwrap());
        assert!(matches!(info, Err(RasError::UnexpectedResult { .. })));
    }

    #[test]
    fn test_export_empty_model_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("empty.sqlite");
        let output = dir.path().join("empty.sdf");
        ModelDatabase::create(&model).unwrap();

        let model_arg = model.to_string_lossy().into_owned();
        let output_arg = output.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from([
            "rasgis",
            "export",
            model_arg.as_str(),
            "-o",
            output_arg.as_str(),
        ])
        .unwrap();
        assert!(run(cli).is_err());
        assert!(!output.exists());
    }
}
