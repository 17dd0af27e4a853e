//! cadparts: split a CAD assembly into per-part meshes
//!
//! Mesh files go to the output directory, part metadata as JSON to stdout (or
//! `--json-out`), logs to stderr.

mod args;
mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cp_core::{DecompositionOptions, DecompositionPipeline, PartsPayload, PipelineError};

use args::Args;
use config::ConfigError;

/// Errors ending the process with a non-zero code
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Cannot write JSON to {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },
    #[error("Cannot serialize parts: {0}")]
    Serialize(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 2,
            CliError::Pipeline(e) => e.exit_code(),
            CliError::Output { .. } | CliError::Serialize(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let options = resolve_options(&args);

    let quiet = options.as_ref().map_or(args.quiet, |o| o.quiet);
    init_tracing(quiet);

    match options.map_err(CliError::from).and_then(|o| run(&args, o)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(quiet: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fallback = if quiet {
        "cp_core=error,cp_cad=error,cadparts=error"
    } else {
        "cp_core=info,cp_cad=info,cadparts=info"
    };

    // stdout carries the JSON payload
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Config file (if any) overridden by flags
fn resolve_options(args: &Args) -> Result<DecompositionOptions, ConfigError> {
    let base = match &args.config {
        Some(path) => config::load_options(path)?,
        None => DecompositionOptions::default(),
    };
    Ok(args.apply(base))
}

fn run(args: &Args, options: DecompositionOptions) -> Result<(), CliError> {
    let kernel = cp_cad::default_kernel();
    tracing::debug!("Using {} kernel", kernel.name());

    let mut pipeline = DecompositionPipeline::new(kernel.as_ref(), options);
    let outcome = pipeline.run(&args.input, &args.output_dir)?;

    tracing::info!(
        "Wrote {} parts to {}",
        outcome.payload.len(),
        args.output_dir.display()
    );
    write_payload(&outcome.payload, args.json_out.as_deref())
}

/// Write the JSON to `json_out` (creating parent directories) or to stdout
fn write_payload(payload: &PartsPayload, json_out: Option<&Path>) -> Result<(), CliError> {
    let json = payload
        .to_json_pretty()
        .map_err(|e| CliError::Serialize(e.to_string()))?;

    match json_out {
        Some(path) => {
            let output_error = |e: std::io::Error| CliError::Output {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(output_error)?;
            }
            std::fs::write(path, json).map_err(output_error)?;
            tracing::info!("Wrote part metadata to {}", path.display());
        }
        None => {
            use std::io::Write;

            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::Output {
                    path: PathBuf::from("<stdout>"),
                    message: e.to_string(),
                })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::PartRecord;
    use tempfile::tempdir;

    fn payload() -> PartsPayload {
        PartsPayload::new(vec![PartRecord {
            part_key: "m:bracket".into(),
            name: "bracket".into(),
            mesh_path: "out/m__bracket.stl".into(),
            node_path: "Root/bracket".into(),
            parent_key: None,
            node_index: None,
            position: [0.0; 3],
            size: [1.0; 3],
        }])
    }

    #[test]
    fn test_json_out_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta").join("parts.json");
        write_payload(&payload(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"partKey\": \"m:bracket\""));
    }

    #[test]
    fn test_json_out_unwritable() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = write_payload(&payload(), Some(&blocker.join("parts.json"))).unwrap_err();
        assert!(matches!(err, CliError::Output { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config(ConfigError::Io("x".into())).exit_code(), 2);
        assert_eq!(CliError::Pipeline(PipelineError::NoParts).exit_code(), 4);
        assert_eq!(
            CliError::Pipeline(PipelineError::InputNotFound(PathBuf::from("a"))).exit_code(),
            2
        );
    }

    #[test]
    fn test_resolve_options_with_config() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("opts.ron");
        std::fs::write(&config, "(max_parts: 2, hierarchy: false)").unwrap();
        let config_arg = config.to_string_lossy().to_string();

        let args = Args::try_parse_from([
            "cadparts",
            "in.obj",
            "out",
            "--config",
            config_arg.as_str(),
            "--max-parts",
            "5",
        ])
        .unwrap();
        let options = resolve_options(&args).unwrap();
        assert_eq!(options.max_parts, 5);
        assert!(!options.hierarchy);
    }
}
