//! CLI tool for generating door plate slides from a floor plan and a room list.

mod options;
mod run;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doorplate_core::{
    JsonProfileStore, ProfileStore, ProfileValues, DEFAULT_PROFILE, LATEST_PROFILE,
};
use options::RunOptions;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Generate door plate slides from an SVG floor plan, a room spreadsheet and
/// a PowerPoint template.
#[derive(Parser, Debug)]
#[command(name = "doorplate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Profile store (default: doorplate_profiles.json in the home directory)
    #[arg(long, global = true)]
    profile_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate slides and remember the options
    Run {
        /// Profile the options are recorded under
        #[arg(long, default_value = LATEST_PROFILE)]
        record_as: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Run the options of a previous run again
    Rerun {
        #[arg(long, default_value = LATEST_PROFILE)]
        profile: String,
    },

    /// Create, inspect and run profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Store the given options under a name
    Create {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Store an example profile named "default"
    Init,

    /// Run a profile; options given here take precedence
    Run {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// List stored profiles
    List,

    /// Print a stored profile
    Show {
        #[arg(long)]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut store = profile_store(cli.profile_file)?;

    match cli.command {
        Command::Run { record_as, options } => {
            let values = ProfileValues::from(&options);
            run_values(&values)?;
            store.save(&record_as, &values)?;
        }
        Command::Rerun { profile } => {
            let values = run::load_profile(&store, &profile)?;
            run_values(&values)?;
        }
        Command::Profile(ProfileCommand::Create { name, options }) => {
            store.save(&name, &ProfileValues::from(&options))?;
            println!("Stored profile '{}' in {}", name, store.path().display());
        }
        Command::Profile(ProfileCommand::Init) => {
            store.save(DEFAULT_PROFILE, &example_profile())?;
            println!(
                "Stored profile '{}' in {}; edit its paths before running it",
                DEFAULT_PROFILE,
                store.path().display()
            );
        }
        Command::Profile(ProfileCommand::Run { name, options }) => {
            let values = run::load_profile(&store, &name)?.merge(&ProfileValues::from(&options));
            run_values(&values)?;
        }
        Command::Profile(ProfileCommand::List) => {
            for name in store.names()? {
                println!("{}", name);
            }
        }
        Command::Profile(ProfileCommand::Show { name }) => {
            let values = run::load_profile(&store, &name)?;
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
    }

    Ok(())
}

/// Resolve, execute and print the summary.
fn run_values(values: &ProfileValues) -> Result<()> {
    let config = values.resolve()?;
    let summary = run::execute(&config)?;
    println!("{}", summary);
    println!("Written to: {}", config.result_path.display());
    Ok(())
}

/// Initialize logging to stderr, or to `log_file` if given.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }

    builder.init();
    Ok(())
}

fn profile_store(path: Option<PathBuf>) -> Result<JsonProfileStore> {
    path.map(JsonProfileStore::new)
        .or_else(JsonProfileStore::in_home_dir)
        .context("No home directory found; pass --profile-file")
}

/// Placeholder paths for a first profile.
fn example_profile() -> ProfileValues {
    ProfileValues {
        excel_path: Some(PathBuf::from("PathToExcelFile")),
        pptx_path: Some(PathBuf::from("PathToPptxFile")),
        svg_path: Some(PathBuf::from("PathToSvgFile")),
        result_path: Some(PathBuf::from("PathToResultPptxFile")),
        ..Default::default()
    }
}
