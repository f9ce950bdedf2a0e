//! The example models bundled with the program and the `example` subcommands.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Every subfolder is a complete model with a `README.txt`
static EXAMPLES_DIR: Dir<'static> = include_dir!("demos");

/// The available subcommands for managing example models.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List the example models with a one-line summary of each.
    List,
    /// Print the description of an example model.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Copy an example model into a new directory so it can be edited.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder (defaults to the example name).
        new_path: Option<PathBuf>,
    },
    /// Run an example model.
    Run {
        /// The name of the example to run.
        name: String,
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => {
                for (name, summary) in list_examples() {
                    println!("{name:<12} {summary}");
                }
                Ok(())
            }
            Self::Info { name } => {
                println!("{}", example_readme(&name)?);
                Ok(())
            }
            Self::Extract { name, new_path } => {
                let dest = new_path.unwrap_or_else(|| PathBuf::from(&name));
                extract_example(&name, &dest)
            }
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None),
        }
    }
}

/// Look up a bundled example model by name
fn get_example(name: &str) -> Result<&'static Dir<'static>> {
    EXAMPLES_DIR
        .get_dir(name)
        .with_context(|| format!("No example model called {name}"))
}

/// The contents of an example's `README.txt`
fn example_readme(name: &str) -> Result<&'static str> {
    let readme_path = get_example(name)?.path().join("README.txt");
    EXAMPLES_DIR
        .get_file(&readme_path)
        .with_context(|| format!("Example {name} has no README.txt"))?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")
}

/// Names of the example models, each with the first line of its README
fn list_examples() -> Vec<(&'static str, &'static str)> {
    EXAMPLES_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
        .map(|name| {
            let summary = example_readme(name)
                .ok()
                .and_then(|readme| readme.lines().next())
                .unwrap_or_default();
            (name, summary)
        })
        .collect()
}

/// Copy the files of an example model into `new_path`, which must not exist yet
pub fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let example = get_example(name)?;
    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );
    ensure!(
        example.dirs().next().is_none(),
        "Example {name} contains subfolders, which cannot be extracted"
    );

    fs::create_dir(new_path)
        .with_context(|| format!("Failed to create directory: {}", new_path.display()))?;
    for file in example.files() {
        let file_name = file.path().file_name().context("Invalid file name")?;
        let file_path = new_path.join(file_name);
        fs::write(&file_path, file.contents())
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
    }

    Ok(())
}

/// Handle the `example run` command.
///
/// The example is extracted to a temporary folder, which is removed once the run is over.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let model_path = temp_dir.path().join(name);
    extract_example(name, &model_path)?;
    handle_run_command(&model_path, opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use tempfile::tempdir;

    #[test]
    fn test_extract_example() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("simple");
        extract_example("simple", &dest).unwrap();

        for file_name in ["model.toml", "varieties.csv", "scenarios.csv", "weather.csv"] {
            assert!(dest.join(file_name).is_file(), "{file_name} missing");
        }

        // Extracting again to the same place fails
        assert_error!(
            extract_example("simple", &dest),
            format!("Destination directory {} already exists", dest.display())
        );
    }

    #[test]
    fn test_extract_unknown_example() {
        let dir = tempdir().unwrap();
        assert_error!(
            extract_example("no_such_model", &dir.path().join("x")),
            "No example model called no_such_model"
        );
    }

    #[test]
    fn test_list_examples() {
        let examples = list_examples();
        let (name, summary) = examples
            .iter()
            .find(|(name, _)| *name == "simple")
            .unwrap();
        assert_eq!(*name, "simple");
        assert!(summary.starts_with("A simple model"));
    }
}
