//! CLI Entry Point for specred
//!
//! Provides command-line interface for:
//! - Parsing reduction files and reporting their data files and setups
//! - Printing (and evaluating) the configuration lines of a reduction file
//! - Writing new reduction files
//! - Parsing auxiliary tool config files
//!
//! # Usage
//!
//! ```bash
//! specred parse kast_blue_A.rdx --runtime
//! specred config kast_blue_A.rdx --evaluate
//! specred write new.rdx --spectrograph shane_kast_blue --path /data/raw --file 'b*.fits.gz'
//! specred tool coadd1d.cfg --block spec1d
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use specred::logging;
use specred::params::evaluate;
use specred::params::parse_config_lines;
use specred::reduction_file::{
    config_lines_from_file, parse_reduction_file, parse_tool_config, write_reduction_file,
    ReductionFileContents, SetupPolicy,
};
use specred::settings::{AppSettings, DEFAULT_SETTINGS_FILE};
use specred::TracingSink;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "specred")]
#[command(about = "Read, write and inspect spectroscopic reduction files", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a reduction file and summarise it
    Parse {
        /// Path to the reduction file
        file: PathBuf,

        /// Do not require data files to exist
        #[arg(long)]
        no_file_check: bool,

        /// Apply the checks needed before running a reduction
        #[arg(long)]
        runtime: bool,

        /// Allow more than one setup in the setup block
        #[arg(long)]
        permissive_setups: bool,

        /// Print the parsed file as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration lines of a reduction file
    Config {
        /// Path to the reduction file
        file: PathBuf,

        /// Evaluate the lines into typed parameters (printed as JSON)
        #[arg(long)]
        evaluate: bool,
    },

    /// Write a new reduction file
    Write {
        /// Output path
        out: PathBuf,

        /// Spectrograph name for the default configuration
        #[arg(long)]
        spectrograph: String,

        /// Data file or glob pattern (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,

        /// Base directory written as a `path` directive (repeatable)
        #[arg(long = "path")]
        paths: Vec<String>,

        /// File whose lines become the configuration section
        #[arg(long)]
        cfg: Option<PathBuf>,

        /// File whose lines become the setup block
        #[arg(long)]
        setup: Option<PathBuf>,
    },

    /// Parse an auxiliary tool config file
    Tool {
        /// Path to the config file
        file: PathBuf,

        /// Name of the file block
        #[arg(long)]
        block: String,

        /// Expand and check the listed files
        #[arg(long)]
        check_files: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = AppSettings::load_from(&cli.settings)
        .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }
    settings.validate().map_err(anyhow::Error::msg)?;
    logging::init_from_settings(&settings).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Parse {
            file,
            no_file_check,
            runtime,
            permissive_setups,
            json,
        } => {
            let mut options = settings.parse_options().with_runtime(runtime);
            if no_file_check {
                options = options.with_file_check(false);
            }
            if permissive_setups {
                options = options.with_setup_policy(SetupPolicy::Permissive);
            }
            run_parse(&file, options, json)
        }
        Commands::Config { file, evaluate } => run_config(&file, evaluate),
        Commands::Write {
            out,
            spectrograph,
            files,
            paths,
            cfg,
            setup,
        } => {
            let mut contents = ReductionFileContents::new(spectrograph, files);
            if !paths.is_empty() {
                contents = contents.with_paths(paths);
            }
            if let Some(cfg) = cfg {
                contents = contents.with_cfg_lines(read_raw_lines(&cfg)?);
            }
            if let Some(setup) = setup {
                contents = contents.with_setup_lines(read_raw_lines(&setup)?);
            }
            write_reduction_file(&out, &contents, &TracingSink)?;
            Ok(())
        }
        Commands::Tool {
            file,
            block,
            check_files,
        } => {
            let tool = parse_tool_config(&file, &block, check_files, &TracingSink)?;
            for line in &tool.cfg_lines {
                println!("{line}");
            }
            match tool.files {
                Some(files) => {
                    println!();
                    println!("{block} files:");
                    for f in files {
                        println!("  {}", f.display());
                    }
                }
                None => println!("No {block} files"),
            }
            Ok(())
        }
    }
}

fn run_parse(file: &Path, options: specred::ParseOptions, json: bool) -> Result<()> {
    let parsed = parse_reduction_file(file, &options, &TracingSink)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    println!("Data files: {}", parsed.data_files.len());
    for f in &parsed.data_files {
        match parsed
            .frametypes
            .as_ref()
            .and_then(|ft| ft.get(&file_name(f)))
        {
            Some(frametype) => println!("  {} [{frametype}]", f.display()),
            None => println!("  {}", f.display()),
        }
    }
    if parsed.setup_names().is_empty() {
        println!("Setups: none");
    } else {
        println!("Setups: {}", parsed.setup_names().join(", "));
    }
    println!("Configuration lines: {}", parsed.config_lines.len());
    Ok(())
}

fn run_config(file: &Path, evaluate_lines: bool) -> Result<()> {
    let lines = config_lines_from_file(file, &TracingSink)?;
    if !evaluate_lines {
        for line in &lines {
            println!("{line}");
        }
        return Ok(());
    }
    let tree = evaluate(parse_config_lines(&lines)?)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lines of a file with their indentation kept.
fn read_raw_lines(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}
