//! End-to-end bootstrap through the shell.

use std::time::Duration;

use stagehand_core::{
    BootstrapError, Exports, ModuleLoadError, ModuleManifest, NodeRole, NonEmptyString,
    SequencerOptions, ShellCommand, Stage, StageClass, StaticLoader,
};

use crate::common::{Navigator, TestShell, navigator_unit};

fn spinner_attached(t: &TestShell) -> bool {
    t.shell.surface().is_some_and(|surface| {
        surface
            .attached_nodes()
            .any(|node| node.role() == NodeRole::LoadingIndicator)
    })
}

fn stage_class(t: &TestShell) -> Option<StageClass> {
    t.shell.surface().and_then(|surface| surface.stage_class())
}

#[tokio::test]
async fn gated_boot_holds_each_stage_for_its_minimum() {
    let mut t = TestShell::new(
        SequencerOptions {
            minimum_bootstrap_duration: Duration::from_millis(200),
            minimum_loading_duration: Duration::from_millis(300),
            ..SequencerOptions::default()
        },
        navigator_unit("ui/main", "Main"),
    );

    t.boot().await;
    assert_eq!(t.shell.stage(), Stage::Bootstrapping);
    assert_eq!(stage_class(&t), Some(StageClass::Bootstrapping));
    assert!(!spinner_attached(&t));

    t.advance(200);
    t.settle().await;
    assert_eq!(t.shell.stage(), Stage::Loading);
    assert_eq!(stage_class(&t), Some(StageClass::Loading));
    assert!(spinner_attached(&t));
    assert!(t.shell.is_booting());

    t.advance(299);
    t.settle().await;
    assert_eq!(t.shell.stage(), Stage::Loading);
    assert!(t.shell.is_booting());

    t.advance(1);
    t.settle().await;
    assert!(t.shell.is_running());
    assert_eq!(t.shell.stage(), Stage::Loaded);
    assert_eq!(stage_class(&t), Some(StageClass::Loaded));

    let timing = t.shell.sequencer().timing();
    assert_eq!(timing.bootstrap_duration(), Some(Duration::from_millis(200)));
    assert_eq!(timing.loading_duration(), Some(Duration::from_millis(300)));
}

#[tokio::test]
async fn bootstrap_content_is_replaced_by_the_main_view() {
    let mut t = TestShell::with_defaults();
    t.boot().await;

    assert!(t.shell.is_running());
    assert!(t.shell.retained_content().is_none());
    let roles: Vec<NodeRole> = t
        .shell
        .surface()
        .map(|surface| surface.nodes().iter().map(|node| node.role()).collect())
        .unwrap_or_default();
    assert_eq!(roles, vec![NodeRole::MainView]);
    assert_eq!(
        t.shell.main_view().map(|view| view.identifier()),
        Some("navigator")
    );
}

#[tokio::test]
async fn deferred_removal_keeps_content_until_requested() {
    let mut t = TestShell::new(
        SequencerOptions {
            remove_content_on_load: false,
            ..SequencerOptions::default()
        },
        navigator_unit("ui/main", "Main"),
    );
    t.boot().await;

    assert!(t.shell.is_running());
    assert_eq!(t.shell.retained_content().map(|range| range.len()), Some(2));
    assert_eq!(t.shell.surface().map(|surface| surface.nodes().len()), Some(3));

    t.shell.apply(ShellCommand::ForceContentRemoval);
    assert!(t.shell.retained_content().is_none());
    assert_eq!(t.shell.surface().map(|surface| surface.nodes().len()), Some(1));
}

#[tokio::test]
async fn configured_unit_names_are_resolved() {
    let options = SequencerOptions {
        main_module: NonEmptyString::new("app/shell").unwrap(),
        main_export: NonEmptyString::new("Root").unwrap(),
        ..SequencerOptions::default()
    };
    let mut t = TestShell::new(options, navigator_unit("app/shell", "Root"));
    t.boot().await;

    assert!(t.shell.is_running());
    assert!(t.shell.failure().is_none());
}

#[tokio::test]
async fn missing_export_fails_the_boot() {
    let loader = StaticLoader::new().with_unit(
        "ui/main",
        Exports::new().with("Other", || Box::new(Navigator::new())),
    );
    let mut t = TestShell::new(SequencerOptions::default(), loader);
    t.boot().await;

    assert_eq!(
        t.shell.failure(),
        Some(&BootstrapError::MainUnitNotFound {
            export: "Main".to_string(),
            module: "ui/main".to_string(),
        })
    );
    assert!(!t.shell.is_running());
    assert_ne!(t.shell.stage(), Stage::Loaded);
}

#[tokio::test]
async fn missing_unit_fails_the_boot() {
    let mut t = TestShell::new(SequencerOptions::default(), StaticLoader::new());
    t.boot().await;

    assert_eq!(
        t.shell.failure(),
        Some(&BootstrapError::ModuleLoad(ModuleLoadError::NotFound {
            module: "ui/main".to_string(),
        }))
    );
}

#[tokio::test]
async fn framework_modules_are_cut_from_reported_lists() {
    let modules: Vec<String> = ["fw/a", "fw/b", "app/c", "app/d"]
        .into_iter()
        .map(str::to_string)
        .collect();
    let loader = navigator_unit("ui/main", "Main").with_manifest(
        ModuleManifest::new(2)
            .with_required(modules.clone())
            .with_initialized(modules),
    );
    let mut t = TestShell::new(SequencerOptions::default(), loader);
    t.shell.start();

    assert_eq!(
        t.shell.sequencer().required_modules(),
        Some(&["fw/b".to_string(), "app/c".to_string(), "app/d".to_string()][..])
    );
}
