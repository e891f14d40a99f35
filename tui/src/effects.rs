//! Passage transition effects.

use ratatui::layout::Rect;

use stagehand_core::{Transition, TransitionDirection, TransitionKind};

/// Where and how the top passage is drawn on this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectFrame {
    pub area: Rect,
    /// Draw dimmed; set while a fade has not reached its midpoint.
    pub dimmed: bool,
}

/// Resolve the frame for the top passage while `transition` runs.
///
/// The incoming leg decides the motion. With only an outgoing leg, the new top
/// fades in over the same duration. Popping plays a slide-left in reverse.
#[must_use]
pub fn apply_transition_effect(transition: &Transition, base: Rect) -> EffectFrame {
    let progress = transition.progress();
    let kind = transition
        .incoming()
        .map_or(TransitionKind::Fade, |leg| leg.animation.kind());
    apply_kind(motion(transition.direction(), kind), progress, base)
}

fn motion(direction: TransitionDirection, kind: TransitionKind) -> TransitionKind {
    match (direction, kind) {
        (TransitionDirection::Pop, TransitionKind::SlideLeft) => TransitionKind::SlideRight,
        _ => kind,
    }
}

fn apply_kind(kind: TransitionKind, progress: f32, base: Rect) -> EffectFrame {
    let t = ease_out_cubic(progress);
    match kind {
        TransitionKind::Fade => EffectFrame {
            area: base,
            dimmed: t < 0.5,
        },
        TransitionKind::PopScale => EffectFrame {
            area: scale_rect(base, 0.6 + 0.4 * t),
            dimmed: false,
        },
        TransitionKind::SlideLeft => {
            let offset = slide_offset(base, t);
            EffectFrame {
                area: Rect {
                    x: base.x.saturating_add(offset),
                    width: base.width.saturating_sub(offset).max(1),
                    ..base
                },
                dimmed: false,
            }
        }
        TransitionKind::SlideRight => {
            let offset = slide_offset(base, t);
            EffectFrame {
                area: Rect {
                    width: base.width.saturating_sub(offset).max(1),
                    ..base
                },
                dimmed: false,
            }
        }
    }
}

/// Columns still to travel; shrinks to zero as the slide completes.
fn slide_offset(base: Rect, t: f32) -> u16 {
    let max_offset = base.width.saturating_div(2).min(16);
    ((1.0 - t) * f32::from(max_offset)).round() as u16
}

fn scale_rect(base: Rect, scale: f32) -> Rect {
    let width = (f32::from(base.width) * scale).round() as u16;
    let height = (f32::from(base.height) * scale).round() as u16;
    let width = width.max(1).min(base.width);
    let height = height.max(1).min(base.height);
    let x = base.x + (base.width.saturating_sub(width) / 2);
    let y = base.y + (base.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[cfg(test)]
mod tests {
    use super::{apply_kind, apply_transition_effect, ease_out_cubic, motion, scale_rect};
    use ratatui::layout::Rect;
    use stagehand_core::{
        Passage, PassageStack, TransitionAnimation, TransitionDirection, TransitionKind,
    };
    use std::time::Duration;

    const BASE: Rect = Rect {
        x: 10,
        y: 5,
        width: 40,
        height: 10,
    };

    #[test]
    fn easing_is_clamped() {
        assert!((ease_out_cubic(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((ease_out_cubic(2.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn pop_scale_starts_small_and_ends_full() {
        let start = apply_kind(TransitionKind::PopScale, 0.0, BASE);
        assert!(start.area.width < BASE.width);
        let end = apply_kind(TransitionKind::PopScale, 1.0, BASE);
        assert_eq!(end.area, BASE);
    }

    #[test]
    fn slides_settle_on_base() {
        let left = apply_kind(TransitionKind::SlideLeft, 0.0, BASE);
        assert!(left.area.x > BASE.x);
        assert_eq!(apply_kind(TransitionKind::SlideLeft, 1.0, BASE).area, BASE);
        assert_eq!(apply_kind(TransitionKind::SlideRight, 1.0, BASE).area, BASE);
    }

    #[test]
    fn pop_reverses_a_slide_left() {
        assert_eq!(
            motion(TransitionDirection::Pop, TransitionKind::SlideLeft),
            TransitionKind::SlideRight
        );
        assert_eq!(
            motion(TransitionDirection::Push, TransitionKind::SlideLeft),
            TransitionKind::SlideLeft
        );
        assert_eq!(
            motion(TransitionDirection::Pop, TransitionKind::PopScale),
            TransitionKind::PopScale
        );
    }

    #[test]
    fn popped_stack_slides_in_from_the_left_edge() {
        let mut stack = PassageStack::new()
            .with_build_in(TransitionAnimation::slide_left(Duration::from_millis(200)));
        stack.mount();
        stack.push(Passage::new("Home"));
        stack.push(Passage::new("Details"));
        stack.pop();

        let transition = stack.transition().expect("pop transition");
        let frame = apply_transition_effect(transition, BASE);
        assert_eq!(frame.area.x, BASE.x);
        assert!(frame.area.width < BASE.width);
    }

    #[test]
    fn fade_dims_first_half() {
        assert!(apply_kind(TransitionKind::Fade, 0.0, BASE).dimmed);
        assert!(!apply_kind(TransitionKind::Fade, 1.0, BASE).dimmed);
    }

    #[test]
    fn scale_never_exceeds_base() {
        let scaled = scale_rect(BASE, 2.0);
        assert_eq!(scaled, BASE);
    }
}
