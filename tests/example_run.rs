//! Integration tests for the `example run` command.
use potato_yp::cli::RunOpts;
use potato_yp::cli::example::handle_example_run_command;
use potato_yp::settings::Settings;
use tempfile::tempdir;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    unsafe { std::env::set_var("POTATO_YP_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(dir.path().join("results")),
        ..Default::default()
    };
    handle_example_run_command("simple", &opts, Some(Settings::default())).unwrap();
    assert!(dir.path().join("results").join("daily.csv").is_file());
}
