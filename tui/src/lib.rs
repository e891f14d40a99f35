//! TUI rendering for Stagehand using ratatui.
//!
//! While the shell boots, the mount surface is drawn as-is: its stage class,
//! the bootstrap content and any attached loading indicators. Once the main
//! view is running, the passage stack takes over the body.

mod effects;
mod input;
mod theme;

pub use effects::{EffectFrame, apply_transition_effect};
pub use input::{InputPump, command_for_key, handle_events};
pub use theme::{Glyphs, Palette, glyphs, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use stagehand_core::{
    AnimationOverride, BootstrapError, MountSurface, NodeRole, Passage, PassageStack, Shell, Stage,
    UiOptions,
};

/// Main draw function.
pub fn draw(frame: &mut Frame, shell: &Shell, options: UiOptions) {
    let palette = Palette::standard();
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, shell, chunks[0], &palette);

    if let Some(err) = shell.failure() {
        draw_failure(frame, err, chunks[1], &palette, &glyphs);
    } else if shell.is_running() {
        match shell.navigator() {
            Some(stack) => draw_passages(frame, shell, stack, chunks[1], &palette, &glyphs, options),
            None => draw_plain_main_view(frame, shell, chunks[1], &palette),
        }
    } else if let Some(surface) = shell.surface() {
        draw_surface(frame, shell, surface, chunks[1], &palette, &glyphs, options);
    }

    draw_key_hints(frame, shell, chunks[2], &palette);
}

fn draw_header(frame: &mut Frame, shell: &Shell, area: Rect, palette: &Palette) {
    let stage = shell.stage();
    let mut spans = vec![
        Span::styled("Stagehand", styles::title(palette)),
        Span::raw("  "),
        Span::styled(format!(" {} ", stage.as_str()), styles::stage_badge(palette, stage)),
    ];

    let timing = shell.sequencer().timing();
    if let Some(duration) = timing.bootstrap_duration() {
        spans.push(Span::styled(
            format!("  bootstrap {}ms", duration.as_millis()),
            Style::default().fg(palette.text_muted),
        ));
    }
    if let Some(duration) = timing.loading_duration() {
        spans.push(Span::styled(
            format!("  loading {}ms", duration.as_millis()),
            Style::default().fg(palette.text_muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_surface(
    frame: &mut Frame,
    shell: &Shell,
    surface: &MountSurface,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let class = surface
        .stage_class()
        .map_or("", |class| class.as_str());
    let mut lines = vec![
        Line::from(vec![
            Span::styled("class ", Style::default().fg(palette.text_muted)),
            Span::styled(class, Style::default().fg(palette.text_secondary)),
        ]),
        Line::from(""),
    ];

    for node in surface.attached_nodes() {
        let (marker, style) = match node.role() {
            NodeRole::LoadingIndicator => (
                spinner_frame(shell.frame(), options),
                Style::default().fg(palette.accent),
            ),
            NodeRole::Content => (glyphs.bullet, Style::default().fg(palette.text_primary)),
            NodeRole::MainView => (glyphs.selected, Style::default().fg(palette.success)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), style),
            Span::styled(node.label().to_string(), style),
        ]));
    }

    if let Some(modules) = shell.sequencer().required_modules() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} modules required", modules.len()),
            Style::default().fg(palette.text_muted),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .padding(Padding::horizontal(1))
        .title(" Bootstrap ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_failure(
    frame: &mut Frame,
    err: &BootstrapError,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{} Bootstrap failed", glyphs.error),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(palette.text_secondary),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_plain_main_view(frame: &mut Frame, shell: &Shell, area: Rect, palette: &Palette) {
    let identifier = shell.main_view().map_or("", |view| view.identifier());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary_dim))
        .title(format!(" {identifier} "));
    frame.render_widget(block, area);
}

fn draw_passages(
    frame: &mut Frame,
    shell: &Shell,
    stack: &PassageStack,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Breadcrumbs
            Constraint::Length(1),
            Constraint::Min(3), // Top passage
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(breadcrumbs(stack, chunks[0].width, palette, glyphs)),
        chunks[0],
    );

    let Some(top) = stack.top() else {
        let empty = Paragraph::new(Line::from(vec![
            Span::styled("No passages. Press ", styles::key_hint(palette)),
            Span::styled("p", styles::key_highlight(palette)),
            Span::styled(" to push one.", styles::key_hint(palette)),
        ]));
        frame.render_widget(empty, chunks[2]);
        return;
    };

    let effect = match stack.transition() {
        Some(transition) if !options.reduced_motion => {
            apply_transition_effect(transition, chunks[2])
        }
        _ => EffectFrame {
            area: chunks[2],
            dimmed: false,
        },
    };

    let text_style = if effect.dimmed {
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(palette.text_primary)
    };

    let mut lines = passage_details(top, stack, palette, text_style);
    if let Some(range) = shell.retained_content() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} bootstrap nodes retained. Press ", range.len()),
                styles::key_hint(palette),
            ),
            Span::styled("r", styles::key_highlight(palette)),
            Span::styled(" to remove them.", styles::key_hint(palette)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
        .title(format!(" {} ", top.title()));

    frame.render_widget(Clear, effect.area);
    frame.render_widget(Paragraph::new(lines).block(block), effect.area);
}

fn passage_details<'a>(
    top: &'a Passage,
    stack: &PassageStack,
    palette: &Palette,
    text_style: Style,
) -> Vec<Line<'a>> {
    let label = Style::default().fg(palette.text_muted);
    let placeholder = top.placeholder().map_or("", |placeholder| placeholder.as_str());
    vec![
        Line::from(vec![
            Span::styled("placeholder ", label),
            Span::styled(placeholder, text_style),
        ]),
        Line::from(vec![
            Span::styled("depth       ", label),
            Span::styled(stack.len().to_string(), text_style),
        ]),
        Line::from(vec![
            Span::styled("build in    ", label),
            Span::styled(describe_override(top.build_in_override()), text_style),
        ]),
        Line::from(vec![
            Span::styled("build out   ", label),
            Span::styled(describe_override(top.build_out_override()), text_style),
        ]),
    ]
}

fn describe_override(value: AnimationOverride) -> String {
    match value {
        AnimationOverride::Unset => "default".to_string(),
        AnimationOverride::Disabled => "disabled".to_string(),
        AnimationOverride::Animation(animation) => format!(
            "{:?} {}ms",
            animation.kind(),
            animation.duration().as_millis()
        ),
    }
}

/// Passage titles from the bottom up, trimmed from the left to fit `width`.
fn breadcrumbs(
    stack: &PassageStack,
    width: u16,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let separator = format!(" {} ", glyphs.breadcrumb);
    let titles: Vec<&str> = stack.passages().iter().map(Passage::title).collect();

    let budget = usize::from(width);
    let mut start = 0;
    while start + 1 < titles.len() && crumb_width(&titles[start..], &separator) > budget {
        start += 1;
    }

    let mut spans = Vec::new();
    if start > 0 {
        spans.push(Span::styled("...", Style::default().fg(palette.text_muted)));
        spans.push(Span::styled(separator.clone(), Style::default().fg(palette.text_muted)));
    }
    let last = titles.len().saturating_sub(1);
    for (index, title) in titles.iter().enumerate().skip(start) {
        let style = if index == last {
            Style::default()
                .fg(palette.peach)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        spans.push(Span::styled((*title).to_string(), style));
        if index != last {
            spans.push(Span::styled(separator.clone(), Style::default().fg(palette.text_muted)));
        }
    }
    Line::from(spans)
}

fn crumb_width(titles: &[&str], separator: &str) -> usize {
    let titles_width: usize = titles.iter().map(|title| title.width()).sum();
    titles_width + separator.width() * titles.len().saturating_sub(1)
}

fn draw_key_hints(frame: &mut Frame, shell: &Shell, area: Rect, palette: &Palette) {
    let mut hints: Vec<(&str, &str)> = Vec::new();
    if shell.is_running() {
        hints.extend([("p", "push"), ("b", "pop"), ("c", "clear")]);
    }
    if shell.is_booting() || shell.retained_content().is_some() {
        hints.push(("r", "remove content"));
    }
    hints.push(("q", "quit"));

    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }

    if shell.stage() == Stage::Loaded && shell.is_running() {
        spans.push(Span::styled(
            format!("main view: {}", shell.main_view().map_or("", |view| view.identifier())),
            Style::default().fg(palette.text_muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
