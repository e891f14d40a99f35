//! Rendering the shell into an in-memory terminal.

use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};
use stagehand_core::{
    BootstrapError, ModuleLoadError, SequencerOptions, ShellCommand, StaticLoader, UiOptions,
};

use crate::common::{TestShell, navigator_unit};

const ASCII: UiOptions = UiOptions {
    ascii_only: true,
    reduced_motion: true,
};

fn render(t: &TestShell) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
    terminal
        .draw(|frame| stagehand_tui::draw(frame, &t.shell, ASCII))
        .unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[tokio::test]
async fn booting_frame_shows_the_surface() {
    let mut t = TestShell::new(
        SequencerOptions {
            minimum_bootstrap_duration: Duration::from_millis(500),
            ..SequencerOptions::default()
        },
        navigator_unit("ui/main", "Main"),
    );
    t.boot().await;

    let screen = render(&t);
    assert!(screen.contains("Stagehand"));
    assert!(screen.contains("Bootstrap"));
    assert!(screen.contains("stagehand-app-bootstrapping"));
    assert!(screen.contains("Starting up"));
    assert!(!screen.contains("Loading"), "indicator is not attached yet");
}

#[tokio::test]
async fn running_frame_shows_the_passage_stack() {
    let mut t = TestShell::with_defaults();
    t.boot().await;
    t.shell.apply(ShellCommand::PushPassage);

    let screen = render(&t);
    assert!(screen.contains("Home > Passage 1"));
    assert!(screen.contains("depth"));
    assert!(screen.contains("p push"));
}

#[tokio::test]
async fn failed_boot_shows_the_error() {
    let mut t = TestShell::new(SequencerOptions::default(), StaticLoader::new());
    t.boot().await;

    let expected = BootstrapError::ModuleLoad(ModuleLoadError::NotFound {
        module: "ui/main".to_string(),
    });
    let screen = render(&t);
    assert!(screen.contains("Bootstrap failed"));
    assert!(screen.contains(&expected.to_string()));
}
