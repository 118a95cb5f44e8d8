//! Insectifica - insect pest identification CLI tool.
//!
//! This crate classifies photographs of insects with an ONNX image model
//! and pairs each prediction with taxonomy and pest-management reference data.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod taxonomy;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command};
use config::{
    Config, InferenceDevice, ModelConfig, OutputMode, config_file_path, default_reference_path,
    load_default_config, save_default_config,
};
use inference::InsectClassifier;
use output::json_envelope::{
    ConfigPayload, ModelEntry, ModelInfoPayload, ModelListPayload, ResultType, SpeciesEntry,
    SpeciesInfoPayload, SpeciesListPayload,
};
use output::{CsvResultWriter, RunSummary, create_reporter, emit_json_error, emit_json_result};
use pipeline::{Outcome, collect_input_files, process_image};
use std::path::PathBuf;
use taxonomy::{LabelTable, ReferenceStore};
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for insectifica CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    // Load configuration
    let config = load_default_config()?;
    let output_mode = cli
        .analyze
        .output_mode
        .unwrap_or(config.defaults.output_mode);

    let result = match cli.command {
        Some(command) => handle_command(command, &cli.analyze, &config, output_mode),
        None if cli.inputs.is_empty() => {
            cli::help::print_smart_help(&config);
            Ok(())
        }
        None => analyze_files(&cli.inputs, &cli.analyze, &config, output_mode),
    };

    if let Err(ref e) = result
        && output_mode == OutputMode::Json
    {
        emit_json_error(e.code(), &e.to_string());
    }

    result
}

/// Classify input images with the given options.
///
/// Model, labels and reference data are loaded once before the first image;
/// any failure there aborts the run.
fn analyze_files(
    inputs: &[PathBuf],
    args: &AnalyzeArgs,
    config: &Config,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    config::validate_config(config)?;

    // Collect all input files
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }

    info!("Found {} image(s) to process", files.len());

    let (model_name, model_config) = resolve_model(args, config)?;

    let labels = LabelTable::load(model_config.labels.as_deref())?;
    info!("Loaded {} labels", labels.len());

    let reference_path = resolve_reference_path(args, config)?;
    let reference = ReferenceStore::from_file(&reference_path)?;
    info!(
        "Loaded reference data for {} species from {}",
        reference.len(),
        reference_path.display()
    );

    let top_k = args.top_k.unwrap_or(config.defaults.top_k);
    let device = resolve_device(args, config);

    info!("Loading model: {}", model_name);
    let classifier = InsectClassifier::from_config(&model_config, device, top_k)?;
    classifier.check_label_count(&labels);

    let reporter = create_reporter(output_mode);
    let mut csv_writer = args
        .csv
        .as_deref()
        .map(CsvResultWriter::create)
        .transpose()?;

    // Create file progress bar
    let progress_enabled = !args.quiet && !args.no_progress && output_mode == OutputMode::Human;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut errors = 0;
    let mut identified = 0;
    let mut unavailable = 0;
    let mut unclassifiable = 0;

    for file in &files {
        match process_image(file, &classifier, &labels, &reference) {
            Ok(report) => {
                processed += 1;
                match report.outcome {
                    Outcome::Identified { .. } => identified += 1,
                    Outcome::DetailsUnavailable { .. } => unavailable += 1,
                    Outcome::Unclassifiable { .. } => unclassifiable += 1,
                }
                if let Some(writer) = csv_writer.as_mut() {
                    writer.write_report(&report)?;
                }
                progress::suspend_progress(file_progress.as_ref(), || reporter.report(&report));
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                reporter.failure(file, &e);
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    if let Some(writer) = csv_writer {
        writer.finish()?;
        if let Some(path) = &args.csv {
            info!("Wrote CSV results: {}", path.display());
        }
    }

    // Summary
    let total_duration = total_start.elapsed();
    info!(
        "Complete: {} processed ({} identified, {} without details, {} unclassifiable), {} errors in {:.2}s",
        processed,
        identified,
        unavailable,
        unclassifiable,
        errors,
        total_duration.as_secs_f64()
    );

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = total_duration.as_millis() as u64;
    reporter.finish(&RunSummary {
        model: model_name,
        files_processed: processed,
        files_failed: errors,
        duration_ms,
    });

    if errors > 0 {
        warn!("{} image(s) had errors", errors);
    }

    Ok(())
}

/// Resolve the model to use from CLI arguments and configuration.
///
/// `--model-path` may be used alone or together with `-m` to reuse a
/// configured model's preprocessing for a different file.
fn resolve_model(args: &AnalyzeArgs, config: &Config) -> Result<(String, ModelConfig)> {
    let (name, mut model) = if let Some(path) = &args.model_path {
        match &args.model {
            Some(name) => {
                let mut model = config::get_model(config, name)?.clone();
                model.path.clone_from(path);
                (name.clone(), model)
            }
            None => {
                let name = path
                    .file_stem()
                    .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().to_string());
                (name, ModelConfig::with_path(path.clone()))
            }
        }
    } else {
        let name = args
            .model
            .clone()
            .or_else(|| config.defaults.model.clone())
            .ok_or_else(|| Error::ConfigValidation {
                message:
                    "no model specified (use -m, --model-path or set defaults.model in config)"
                        .to_string(),
            })?;
        let model = config::get_model(config, &name)?.clone();
        (name, model)
    };

    if let Some(labels) = &args.labels_path {
        model.labels = Some(labels.clone());
    }

    config::validate_model_config(&name, &model)?;
    Ok((name, model))
}

/// Resolve the reference data path: CLI, then config, then the data directory.
fn resolve_reference_path(args: &AnalyzeArgs, config: &Config) -> Result<PathBuf> {
    args.reference
        .clone()
        .or_else(|| config.defaults.reference.clone())
        .or_else(default_reference_path)
        .ok_or(Error::ReferenceNotConfigured)
}

/// Resolve the labels file without loading a model.
fn resolve_labels_path(args: &AnalyzeArgs, config: &Config) -> Option<PathBuf> {
    args.labels_path.clone().or_else(|| {
        args.model
            .as_ref()
            .or(config.defaults.model.as_ref())
            .and_then(|name| config.models.get(name))
            .and_then(|model| model.labels.clone())
    })
}

const fn resolve_device(args: &AnalyzeArgs, config: &Config) -> InferenceDevice {
    if args.gpu {
        InferenceDevice::Gpu
    } else if args.cpu {
        InferenceDevice::Cpu
    } else {
        config.inference.device
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default because CUDA fallback is expected in auto mode.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Reports go to stdout, so logs stay on stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(
    command: Command,
    args: &AnalyzeArgs,
    config: &Config,
    output_mode: OutputMode,
) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action, output_mode),
        Command::Models { action } => handle_models_command(action, args, config, output_mode),
        Command::Species { action } => handle_species_command(action, args, config, output_mode),
    }
}

fn handle_config_command(action: cli::ConfigAction, output_mode: OutputMode) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
                println!("Use 'insectifica models add' to add models.");
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  insectifica models add <name> --path <model.onnx> --default");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            match output_mode {
                OutputMode::Json => {
                    let config_value = serde_json::to_value(&config)
                        .map_err(|e| Error::JsonSerialize { source: e })?;
                    emit_json_result(&ConfigPayload {
                        result_type: ResultType::Config,
                        config_path: config_file_path()?,
                        config: config_value,
                    });
                }
                OutputMode::Human => {
                    let contents = toml::to_string_pretty(&config)
                        .map_err(|e| Error::ConfigSerialize { source: e })?;
                    println!("{contents}");
                }
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_models_command(
    action: cli::ModelsAction,
    args: &AnalyzeArgs,
    config: &Config,
    output_mode: OutputMode,
) -> Result<()> {
    use cli::ModelsAction;

    match action {
        ModelsAction::List => {
            let mut names: Vec<&String> = config.models.keys().collect();
            names.sort();

            if output_mode == OutputMode::Json {
                let models = names
                    .iter()
                    .map(|&name| {
                        let model = &config.models[name];
                        ModelEntry {
                            id: name.clone(),
                            is_default: config.defaults.model.as_ref() == Some(name),
                            path: model.path.clone(),
                            labels_path: model.labels.clone(),
                            input_size: model.input_size,
                        }
                    })
                    .collect();
                emit_json_result(&ModelListPayload {
                    result_type: ResultType::ModelList,
                    models,
                });
            } else if names.is_empty() {
                println!("No models configured.");
            } else {
                println!("Configured models:");
                for name in names {
                    let model = &config.models[name];
                    let default_marker = config.defaults.model.as_ref() == Some(name);
                    println!(
                        "  {} ({}x{}, {}){}",
                        name,
                        model.input_size,
                        model.input_size,
                        model.normalization,
                        if default_marker { " [default]" } else { "" }
                    );
                }
            }
            Ok(())
        }
        ModelsAction::Add {
            name,
            path,
            labels,
            size,
            normalization,
            layout,
            activation,
            default,
        } => {
            let mut model = ModelConfig::with_path(path);
            model.labels = labels;
            if let Some(size) = size {
                model.input_size = size;
            }
            if let Some(normalization) = normalization {
                model.normalization = normalization;
            }
            if let Some(layout) = layout {
                model.layout = layout;
            }
            if let Some(activation) = activation {
                model.activation = activation;
            }
            handle_models_add(name, model, default)
        }
        ModelsAction::Check => {
            if config.models.is_empty() {
                println!("No models configured.");
            }
            let mut names: Vec<&String> = config.models.keys().collect();
            names.sort();
            for name in names {
                config::validate_model_config(name, &config.models[name])?;
                println!("  {name}: OK");
            }

            let reference_path = resolve_reference_path(args, config)?;
            let reference = ReferenceStore::from_file(&reference_path)?;
            println!(
                "  reference: OK ({} species, {})",
                reference.len(),
                reference_path.display()
            );
            Ok(())
        }
        ModelsAction::Info { name } => {
            let model = config::get_model(config, &name)?;
            if output_mode == OutputMode::Json {
                emit_json_result(&ModelInfoPayload {
                    result_type: ResultType::ModelInfo,
                    id: name,
                    path: model.path.clone(),
                    labels_path: model.labels.clone(),
                    input_size: model.input_size,
                    normalization: model.normalization.to_string(),
                    layout: model.layout.to_string(),
                    activation: model.activation.to_string(),
                    model_exists: model.path.exists(),
                });
            } else {
                println!("Model: {name}");
                println!("  Path: {}", model.path.display());
                match &model.labels {
                    Some(labels) => println!("  Labels: {}", labels.display()),
                    None => println!("  Labels: bundled"),
                }
                println!("  Input: {}x{}", model.input_size, model.input_size);
                println!("  Normalization: {}", model.normalization);
                println!("  Layout: {}", model.layout);
                println!("  Activation: {}", model.activation);
            }
            Ok(())
        }
    }
}

/// Handle the `models add` command.
fn handle_models_add(name: String, model: ModelConfig, set_default: bool) -> Result<()> {
    // Validate files exist
    config::validate_model_config(&name, &model)?;

    // Load existing config
    let mut config = load_default_config()?;

    if config.models.contains_key(&name) {
        return Err(Error::ModelAlreadyExists { name });
    }

    println!("Added model '{name}'");
    println!("  Model: {}", model.path.display());
    match &model.labels {
        Some(labels) => println!("  Labels: {}", labels.display()),
        None => println!("  Labels: bundled"),
    }
    println!(
        "  Input: {}x{}, {}, {}",
        model.input_size, model.input_size, model.normalization, model.layout
    );
    println!("  Default: {}", if set_default { "yes" } else { "no" });

    config.models.insert(name.clone(), model);

    if set_default {
        config.defaults.model = Some(name);
    }

    let config_path = save_default_config(&config)?;
    println!("\nConfiguration saved to: {}", config_path.display());

    Ok(())
}

fn handle_species_command(
    action: cli::SpeciesAction,
    args: &AnalyzeArgs,
    config: &Config,
    output_mode: OutputMode,
) -> Result<()> {
    use cli::SpeciesAction;

    match action {
        SpeciesAction::List => {
            let labels = LabelTable::load(resolve_labels_path(args, config).as_deref())?;

            // Reference data is optional here; it only adds availability markers.
            let reference = match resolve_reference_path(args, config) {
                Ok(path) => Some(ReferenceStore::from_file(&path)?),
                Err(_) => None,
            };

            if output_mode == OutputMode::Json {
                let species = labels
                    .iter()
                    .enumerate()
                    .map(|(index, name)| SpeciesEntry {
                        index,
                        name: name.to_string(),
                        has_details: reference.as_ref().map(|r| r.contains(name)),
                    })
                    .collect();
                emit_json_result(&SpeciesListPayload {
                    result_type: ResultType::SpeciesList,
                    species_count: labels.len(),
                    species,
                });
            } else {
                print_species_list(&labels, reference.as_ref());
            }
            Ok(())
        }
        SpeciesAction::Show { name } => {
            let reference_path = resolve_reference_path(args, config)?;
            let reference = ReferenceStore::from_file(&reference_path)?;
            let record = reference
                .get(&name)
                .ok_or_else(|| Error::SpeciesNotFound { name: name.clone() })?;

            if output_mode == OutputMode::Json {
                emit_json_result(&SpeciesInfoPayload {
                    result_type: ResultType::SpeciesInfo,
                    details: output::record_fields(record),
                    name,
                });
            } else {
                println!("{name}");
                println!();
                print!("{}", output::render_record(record));
            }
            Ok(())
        }
    }
}

fn print_species_list(labels: &LabelTable, reference: Option<&ReferenceStore>) {
    let width = labels.len().saturating_sub(1).to_string().len();

    for (index, name) in labels.iter().enumerate() {
        let marker = match reference {
            Some(r) if r.contains(name) => " *",
            _ => "",
        };
        println!("{index:>width$}  {name}{marker}");
    }

    if let Some(reference) = reference {
        let with_details = labels.iter().filter(|name| reference.contains(name)).count();
        println!();
        println!(
            "{} labels, {} with reference details (*)",
            labels.len(),
            with_details
        );
    } else {
        println!();
        println!("{} labels", labels.len());
    }
}
