use sfs_results::cli::{Cli, Commands, ConfigAction};
use sfs_results::config::Config;
use sfs_results::error::{Result, SfsError};
use sfs_results::{BatchAggregator, ResultDispatcher};
use std::io::Read;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Batch {
            input,
            threshold,
            stats,
        } => {
            cmd_batch(cli.config, &input, threshold, stats)?;
        }
        Commands::Record {
            input,
            result_type,
            value,
            threshold,
        } => {
            cmd_record(cli.config, &input, &result_type, value.as_deref(), threshold)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "sfs_results=debug"
    } else {
        "sfs_results=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_batch(
    config_path: Option<PathBuf>,
    input: &Path,
    threshold: Option<u32>,
    show_stats: bool,
) -> Result<()> {
    let config = load_config(config_path, threshold)?;
    let document = read_json(input)?;

    let payload = document.as_object().ok_or_else(|| {
        SfsError::InvalidPayload("expected a JSON object keyed by type tag".to_string())
    })?;

    let aggregator =
        BatchAggregator::new(ResultDispatcher::with_extractor(config.field_extractor()));
    let (results, stats) = aggregator.create_batch_with_stats(payload);

    tracing::debug!(
        "Batch parsed: {} input records, {} accepted, {} dropped",
        stats.input_records,
        stats.accepted,
        stats.dropped()
    );

    if show_stats {
        eprintln!("Input records:  {}", stats.input_records);
        eprintln!("Accepted:       {}", stats.accepted);
        eprintln!("Invalid type:   {}", stats.invalid_type);
        eprintln!("Missing value:  {}", stats.missing_value);
        eprintln!("Missing field:  {}", stats.missing_field);
        eprintln!("Malformed:      {}", stats.malformed);
    }

    print_json(&results, config.output.pretty)
}

fn cmd_record(
    config_path: Option<PathBuf>,
    input: &Path,
    result_type: &str,
    value: Option<&str>,
    threshold: Option<u32>,
) -> Result<()> {
    let config = load_config(config_path, threshold)?;
    let document = read_json(input)?;

    let record = document.as_object().ok_or_else(|| {
        SfsError::InvalidPayload("expected a single JSON object record".to_string())
    })?;

    let dispatcher = ResultDispatcher::with_extractor(config.field_extractor());
    let result = dispatcher.create(record, result_type, value).map_err(|e| {
        tracing::debug!("Record rejected: {}", e);
        e
    })?;

    print_json(&result, config.output.pretty)
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, None)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!(
                "  Blacklist threshold: {} minutes",
                config.extraction.blacklist_threshold_minutes
            );
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            // Create parent directory
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SfsError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, threshold: Option<u32>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = if path.exists() {
        Config::load(&path)?
    } else {
        tracing::debug!(
            "Config file not found, using defaults. Run 'sfs-results config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Some(minutes) = threshold {
        config.extraction.blacklist_threshold_minutes = minutes;
        sfs_results::config::ConfigValidator::validate(&config)?;
    }

    tracing::debug!(
        "Blacklist threshold: {} minutes",
        config.extraction.blacklist_threshold_minutes
    );

    Ok(config)
}

fn read_json(input: &Path) -> Result<serde_json::Value> {
    let mut content = String::new();

    if input == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| SfsError::Io {
                source: e,
                context: "Failed to read stdin".to_string(),
            })?;
    } else {
        content = std::fs::read_to_string(input).map_err(|e| SfsError::Io {
            source: e,
            context: format!("Failed to read input file: {:?}", input),
        })?;
    }

    serde_json::from_str(&content).map_err(|e| SfsError::Json {
        source: e,
        context: format!("Failed to parse JSON from {:?}", input),
    })
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| SfsError::Json {
        source: e,
        context: "Failed to serialize results".to_string(),
    })?;

    println!("{}", json);
    Ok(())
}
