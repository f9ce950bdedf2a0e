//! The command line interface for the simulation.
use crate::growth::SenescencePolicy;
use crate::input::load_model;
use crate::log;
use crate::model::{Model, ModelOverrides};
use crate::output::{create_output_directory, get_output_dir};
use crate::settings::{Settings, get_settings_file_path};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;

/// Simulate the potential yield of potato crops planted on different dates.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Print the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the scenarios in a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Check a model's inputs without running it.
    Validate {
        /// Path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage the example models bundled with the program.
    Example {
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Show where settings are read from and the settings in effect.
    Settings,
}

/// Canopy behaviour after maximum cover, as given on the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum SenescenceArg {
    /// Hold maximum cover until harvest
    Plateau,
    /// Let the canopy senesce after maximum cover
    Decline,
}

impl From<SenescenceArg> for SenescencePolicy {
    fn from(arg: SenescenceArg) -> Self {
        match arg {
            SenescenceArg::Plateau => SenescencePolicy::Plateau,
            SenescenceArg::Decline => SenescencePolicy::Decline,
        }
    }
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Replace the output directory if it already contains results
    #[arg(long)]
    pub overwrite: bool,
    /// Also write the daily thermal time and dry matter increments
    #[arg(long)]
    pub debug_model: bool,
    /// Only run this scenario (may be repeated)
    #[arg(long = "scenario", value_name = "ID")]
    pub scenarios: Vec<String>,
    /// Run each scenario in this year instead of the years in model.toml (may be repeated)
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,
    /// Override the senescence policy from model.toml
    #[arg(long, value_enum)]
    pub senescence: Option<SenescenceArg>,
}

impl RunOpts {
    /// The changes these options make to the model
    pub fn overrides(&self) -> ModelOverrides {
        ModelOverrides {
            scenarios: self.scenarios.clone(),
            years: self.years.clone(),
            senescence: self.senescence.map(SenescencePolicy::from),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ potato-yp --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    match cli.command {
        Some(Commands::Run { model_dir, opts }) => handle_run_command(&model_dir, &opts, None),
        Some(Commands::Validate { model_dir }) => handle_validate_command(&model_dir, None),
        Some(Commands::Example { subcommand }) => subcommand.execute(),
        Some(Commands::Settings) => handle_settings_command(),
        None => {
            println!("{}", Cli::command().render_long_help());
            Ok(())
        }
    }
}

/// Use the given settings, or load them from the settings file
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Load a model and apply the command-line overrides to it
fn load_model_with_overrides(model_path: &Path, overrides: &ModelOverrides) -> Result<Model> {
    let mut model = load_model(model_path).context("Failed to load model.")?;
    if *overrides != ModelOverrides::default() {
        model
            .apply_overrides(overrides)
            .context("Invalid command-line options for model.")?;
    }

    Ok(model)
}

/// Handle the `run` command.
///
/// Command-line flags take precedence over the settings file.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;
    let overwrite = opts.overwrite || settings.overwrite;
    let debug_model = opts.debug_model || settings.debug_model;

    let output_path = match &opts.output_dir {
        Some(output_dir) => output_dir.clone(),
        None => get_output_dir(&settings.results_dir, model_path)?,
    };
    let replaced = create_output_directory(&output_path, overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    log::init(&settings.log_level, Some(&output_path)).context("Failed to initialise logging.")?;
    if replaced {
        warn!("Replacing previous results in {}", output_path.display());
    }

    let model = load_model_with_overrides(model_path, &opts.overrides())?;
    info!(
        "Loaded model from {} with {} scenarios",
        model_path.display(),
        model.scenarios.len()
    );

    crate::simulation::run(&model, &output_path, debug_model)?;
    info!("Results written to {}", output_path.display());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // No output folder, so no log files
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let model = load_model(model_path).context("Failed to validate model.")?;
    info!(
        "Model validation successful! It describes {} runs.",
        model.runs()?.len()
    );

    Ok(())
}

/// Handle the `settings` command
fn handle_settings_command() -> Result<()> {
    let file_path = get_settings_file_path();
    let settings = settings_or_load(None)?;

    if file_path.is_file() {
        println!("# Settings file: {}", file_path.display());
    } else {
        println!("# No settings file at {}, so defaults are used", file_path.display());
    }
    print!("{}", settings.to_toml()?);

    Ok(())
}
