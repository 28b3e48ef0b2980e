//! kindgen CLI - generate typed artifacts from kind schemas
//!
//! Commands:
//! - `kindgen generate` - Run every configured generator over every kind
//! - `kindgen check` - Validate the config and kinds without writing
//! - `kindgen render` - Print a single generated file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod generate;
mod render;

#[derive(Parser)]
#[command(name = "kindgen")]
#[command(author, version, about = "Schema-driven code generator for kinds", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error, off). Overrides the config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate files for every kind, generator and variant
    Generate {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<String>,

        /// Output directory (overrides output_dir)
        #[arg(short, long)]
        output: Option<String>,

        /// Variant to generate (NoParams or WithParams)
        #[arg(long)]
        variant: Option<String>,

        /// Fail if the files on disk differ instead of writing them
        #[arg(long)]
        check: bool,
    },

    /// Validate the config and resolve every kind without writing
    Check {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Render one kind with one generator to stdout
    Render {
        /// Kind file (JSON)
        #[arg(short, long)]
        kind: PathBuf,

        /// Generator id (ts-types, go-types, json-schema, go-section-types, ts-index)
        #[arg(short, long)]
        generator: String,

        /// Variant to render
        #[arg(long, default_value = "NoParams")]
        variant: String,

        /// TOML file holding WithParams parameters
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            output,
            variant,
            check,
        } => {
            generate::run(generate::GenerateOptions {
                config,
                output,
                variant,
                log_level: cli.log_level,
                check,
            })?;
        }
        Commands::Check { config } => {
            check::run(config, cli.log_level)?;
        }
        Commands::Render {
            kind,
            generator,
            variant,
            params,
        } => {
            let level = match cli.log_level.as_deref() {
                Some(level) => level.parse::<kindgen_logging::LogLevel>()?,
                None => kindgen_logging::LogLevel::Warn,
            };
            kindgen_logging::init_logging(level);
            render::run(&kind, &generator, &variant, params.as_deref())?;
        }
    }

    Ok(())
}
