//! Passage navigation once the main view is running.

use stagehand_core::{
    AnimationOverride, Passage, PassageStack, ShellCommand, TransitionAnimation,
    TransitionDirection, TransitionKind,
};

use crate::common::{SLIDE, TestShell};

async fn running() -> TestShell {
    let mut t = TestShell::with_defaults();
    t.boot().await;
    assert!(t.shell.is_running());
    t
}

fn stack(t: &TestShell) -> &PassageStack {
    t.shell.navigator().expect("running shell has a navigator")
}

#[tokio::test]
async fn main_view_opens_on_home() {
    let t = running().await;
    let stack = stack(&t);
    assert!(stack.is_mounted());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.displayed().map(|id| id.as_str()), Some("home"));
}

#[tokio::test]
async fn push_runs_a_transition_until_it_settles() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PushPassage);

    let top_id = stack(&t).top().map(Passage::id);
    let transition = stack(&t).transition().expect("push starts a transition");
    assert_eq!(transition.direction(), TransitionDirection::Push);
    let incoming = transition.incoming().expect("stack build-in applies");
    assert_eq!(Some(incoming.passage), top_id);
    assert_eq!(incoming.animation.kind(), TransitionKind::SlideLeft);
    assert!(transition.outgoing().is_none());

    t.shell.tick(SLIDE);
    assert!(stack(&t).transition().is_none());
}

#[tokio::test]
async fn pushed_passages_take_the_stack_build_in() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PushPassage);

    let top = stack(&t).top().expect("top");
    assert_eq!(top.title(), "Passage 1");
    assert_eq!(
        top.build_in_override(),
        AnimationOverride::Animation(TransitionAnimation::slide_left(SLIDE))
    );
    assert_eq!(top.build_out_override(), AnimationOverride::Unset);
}

#[tokio::test]
async fn anonymous_passages_get_a_generated_placeholder() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PushPassage);

    let top = stack(&t).top().expect("top");
    let expected = format!("passage-{}", top.id());
    assert_eq!(top.placeholder().map(|id| id.as_str()), Some(expected.as_str()));
    assert_eq!(stack(&t).displayed(), top.placeholder());
}

#[tokio::test]
async fn pop_returns_to_the_previous_passage() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PushPassage);
    t.shell.apply(ShellCommand::PopPassage);

    let stack = stack(&t);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top().map(Passage::title), Some("Home"));
    assert_eq!(stack.displayed().map(|id| id.as_str()), Some("home"));
    assert_eq!(
        stack.transition().map(|transition| transition.direction()),
        Some(TransitionDirection::Pop)
    );
}

#[tokio::test]
async fn pop_on_empty_stack_is_harmless() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PopPassage);
    t.shell.apply(ShellCommand::PopPassage);

    let stack = stack(&t);
    assert!(stack.is_empty());
    assert!(stack.displayed().is_none());
}

#[tokio::test]
async fn clear_empties_the_stack() {
    let mut t = running().await;
    t.shell.apply(ShellCommand::PushPassage);
    t.shell.apply(ShellCommand::PushPassage);
    t.shell.apply(ShellCommand::ClearPassages);

    let stack = stack(&t);
    assert!(stack.is_empty());
    assert!(stack.displayed().is_none());
    assert!(stack.transition().is_none());
}

#[tokio::test]
async fn commands_before_boot_are_ignored() {
    let mut t = TestShell::with_defaults();
    t.shell.apply(ShellCommand::PushPassage);
    assert!(t.shell.navigator().is_none());

    t.boot().await;
    assert_eq!(stack(&t).len(), 1);
}
