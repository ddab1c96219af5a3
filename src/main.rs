use mojodesc::cli::commands::{CliArgs, Commands, GenerateArgs, InspectArgs};
use mojodesc::cli::output::{OutputFormat, OutputFormatter};
use mojodesc::config::{PluginMetadata, DEFAULT_CONFIG_FILE};
use mojodesc::descriptor::DescriptorWriter;
use mojodesc::util::logging::{self, LoggingConfig};
use mojodesc::{DescriptorExtractor, WriteOutcome, NAME, VERSION};

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process;
use tracing::{debug, error, info, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let result = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, args.quiet),
        Commands::Inspect(inspect_args) => handle_inspect(inspect_args),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = logging::parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
        config.include_target = true;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    logging::init_logging(config);
}

fn handle_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let metadata = match &args.config {
        Some(path) => PluginMetadata::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                debug!("Using {}", DEFAULT_CONFIG_FILE);
                PluginMetadata::from_file(default_path)?
            } else {
                PluginMetadata::default()
            }
        }
    }
    .with_overrides(args.overrides());

    metadata
        .validate()
        .context("Plugin metadata is incomplete")?;
    debug!("{}", metadata);

    let writer = if args.no_comment {
        DescriptorWriter::without_comment()
    } else {
        DescriptorWriter::new()
    };
    let extractor = DescriptorExtractor::new(args.classes.class_dirs.iter()).with_writer(writer);

    let outcome = extractor
        .generate(metadata, &args.output)
        .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    match outcome {
        WriteOutcome::Written => {
            info!("Descriptor written to: {}", args.output.display());
            if !quiet {
                println!("Descriptor written to: {}", args.output.display());
            }
        }
        WriteOutcome::Unchanged => {
            info!("Descriptor up to date: {}", args.output.display());
            if !quiet {
                println!("Descriptor up to date: {}", args.output.display());
            }
        }
    }

    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let extractor = DescriptorExtractor::new(args.classes.class_dirs.iter());
    let goals = extractor.goals().context("Failed to extract goals")?;

    let format: OutputFormat = args.format.into();
    let output = OutputFormatter::new(format).format_goals(&goals)?;
    println!("{}", output.trim_end());

    Ok(())
}
