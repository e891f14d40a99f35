//! Config files driving a real boot.

use std::fs;
use std::time::Duration;

use stagehand_config::{ConfigError, StagehandConfig};
use stagehand_core::Stage;
use tempfile::tempdir;

use crate::common::{TestShell, navigator_unit};

const CONFIG: &str = r#"
[loader]
main_module = "app/shell"
main_export = "Root"
minimum_bootstrap_ms = 150
remove_content_on_load = false

[ui]
ascii_only = true
"#;

#[tokio::test]
async fn config_file_shapes_the_boot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = StagehandConfig::load_from(&path).unwrap().unwrap();
    let options = config.sequencer_options();
    assert_eq!(options.minimum_bootstrap_duration, Duration::from_millis(150));
    assert!(config.ui_options().ascii_only);
    assert!(!config.ui_options().reduced_motion);

    let mut t = TestShell::new(options, navigator_unit("app/shell", "Root"));
    t.boot().await;
    assert_eq!(t.shell.stage(), Stage::Bootstrapping);

    t.advance(150);
    t.settle().await;
    assert!(t.shell.is_running());
    assert_eq!(t.shell.retained_content().map(|range| range.len()), Some(2));
}

#[test]
fn missing_file_means_no_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(StagehandConfig::load_from(&path).unwrap().is_none());
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[loader\nmain_module = ").unwrap();

    let err = StagehandConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), path.as_path());
}
