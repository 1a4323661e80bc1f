//! The generate command: load a model, run the engine, write the results.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use deepcopy_gen::output::has_generated_marker;
use deepcopy_gen::{
    default_targets, generate, generate_paths, plan_write, GenConfig, PackageOutput, RunReport,
    WriteAction,
};
use deepcopy_ir::load_model;
use tracing::{debug, info};

use crate::{CliError, CliOptions};

/// What happened to the generated files of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// Files that differ from what would be generated (verify-only runs).
    pub stale: Vec<PathBuf>,
    pub failed: usize,
}

/// Build the engine configuration from the command line.
pub fn gen_config(options: &CliOptions) -> Result<GenConfig, CliError> {
    let mut config = GenConfig::default().with_bounding_dirs(options.bounding_dirs.clone());
    config.output_file_base.clone_from(&options.output_file_base);
    if let Some(path) = &options.header_file {
        let header = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        config = config.with_header(header);
    }
    if let Some(func) = &options.clone_func {
        config.reflective_clone = Some(func.clone());
    }
    if !options.reflective_fallback {
        config = config.without_reflective_clone();
    }
    Ok(config)
}

/// Run the engine over the model named by `options` without touching
/// any output.
pub fn run_engine(options: &CliOptions, config: &GenConfig) -> Result<RunReport, CliError> {
    let json = fs::read_to_string(&options.model).map_err(|e| CliError::io(&options.model, e))?;
    let universe = load_model(&json).map_err(|source| CliError::Model {
        path: options.model.clone(),
        source,
    })?;
    debug!(packages = universe.packages().count(), "model loaded");

    let report = if options.packages.is_empty() {
        generate(&universe, &default_targets(&universe), config)
    } else {
        generate_paths(&universe, &options.packages, config)
    };
    Ok(report)
}

/// Where the generated file of `output` goes.
pub fn output_path(options: &CliOptions, output: &PackageOutput) -> PathBuf {
    let root = match &options.out_dir {
        Some(dir) => dir.clone(),
        None => options
            .model
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    let dir = output.dir.as_deref().unwrap_or(&output.path);
    root.join(dir).join(&output.file_name)
}

/// Generate, then write or verify every output.
///
/// Packages that generated successfully are written even when others
/// failed; the failures are reported through the returned error.
pub fn execute(options: &CliOptions) -> Result<Summary, CliError> {
    let config = gen_config(options)?;
    let report = run_engine(options, &config)?;

    for failure in &report.failures {
        eprintln!("error: {}", failure.error);
    }
    for package in &report.skipped {
        debug!(package = %package, "skipped");
    }

    let mut summary = Summary {
        failed: report.failures.len(),
        ..Summary::default()
    };
    for output in &report.outputs {
        let path = output_path(options, output);
        let existing = read_existing(&path)?;
        if let Some(current) = &existing {
            if !has_generated_marker(current) {
                return Err(CliError::Foreign { path });
            }
        }
        match plan_write(existing.as_deref(), &output.contents) {
            WriteAction::Unchanged => {
                debug!(path = %path.display(), "up to date");
                summary.unchanged.push(path);
            }
            WriteAction::Write if options.verify_only => {
                eprintln!("stale: {}", path.display());
                summary.stale.push(path);
            }
            WriteAction::Write => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
                }
                fs::write(&path, &output.contents).map_err(|e| CliError::io(&path, e))?;
                info!(path = %path.display(), types = output.types.len(), "wrote");
                summary.written.push(path);
            }
        }
    }

    if summary.failed > 0 {
        return Err(CliError::Failed {
            count: summary.failed,
        });
    }
    if !summary.stale.is_empty() {
        return Err(CliError::Stale {
            count: summary.stale.len(),
        });
    }
    Ok(summary)
}

fn read_existing(path: &Path) -> Result<Option<String>, CliError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CliError::io(path, e)),
    }
}
