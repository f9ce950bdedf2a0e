//! Integration tests for the `run` command.
use potato_yp::cli::{RunOpts, handle_run_command};
use potato_yp::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("POTATO_YP_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    {
        // Save results to non-existent directory to check that directory creation works
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            debug_model: true,
            ..Default::default()
        };
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

        for file_name in [
            "daily.csv",
            "harvest.csv",
            "metadata.toml",
            "debug_daily_increments.csv",
            "potato_yp_info.log",
            "potato_yp_error.log",
        ] {
            assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
        }

        // Four scenarios in two years, plus the header
        let harvest = fs::read_to_string(output_dir.join("harvest.csv")).unwrap();
        assert_eq!(harvest.lines().count(), 9);
    }

    // Second time will fail because the logging is already initialised
    let opts = RunOpts {
        output_dir: Some(tempdir.path().join("results2")),
        ..Default::default()
    };
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
