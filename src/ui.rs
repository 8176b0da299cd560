use crate::app::{App, Playback};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Status
            Constraint::Length(11), // Parameters
            Constraint::Min(8),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Brownian Tree ");

    let (stuck, target) = app.progress();
    let progress = stuck as f32 / target.max(1) as f32;
    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = ((progress * progress_width as f32) as usize).min(progress_width);
    let empty = progress_width.saturating_sub(filled);

    let (status_text, status_color) = if app.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else {
        match app.playback() {
            Playback::Growing => ("GROWING", BORDER_COLOR),
            Playback::Replaying => ("REPLAYING", BORDER_COLOR),
            Playback::Complete => ("COMPLETE", Color::Green),
            Playback::Stopped => ("STOPPED", Color::Red),
        }
    };

    let content = vec![
        Line::from(Span::styled(
            format!("stuck {} of {}", stuck, target),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(
            format!(
                "frame {}/{} ({} queued)",
                app.frames_shown,
                app.frames_received,
                app.pending_frames()
            ),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String| {
        Line::from(Span::styled(
            format!("  {}: {}", label, value),
            Style::default().fg(TEXT_COLOR),
        ))
    };

    let settings = &app.settings;

    let mut content = vec![
        make_line("Grid", format!("{0}x{0}", settings.grid_size)),
        make_line("Particles", format!("{}", settings.num_particles)),
        make_line("Spawn r", format!("{:.1}", settings.spawn_radius)),
        make_line("Kill r", format!("{:.1}", settings.kill_radius)),
        make_line("Max steps", format!("{}", settings.max_steps_per_walker)),
        make_line("Cadence", format!("{}", settings.snapshot_cadence)),
        make_line("Seed", format!("{}", app.seed)),
        Line::from(Span::styled(
            format!("  Color: {}", app.color_scheme.name()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("  Frame: {}ms", app.frame_interval.as_millis()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];
    if let Some(err) = &app.export_error {
        content.push(Line::from(Span::styled(
            format!("  Export: {}", err),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("+/-", "playback speed"),
        make_control("L", "jump to latest"),
        make_control("C", "color scheme"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snapshot) = &app.current else {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "waiting for first snapshot...",
            Style::default().fg(DIM_TEXT_COLOR),
        )));
        frame.render_widget(waiting, inner);
        return;
    };

    let cells = braille::render_to_braille(
        snapshot,
        inner.width,
        inner.height,
        &app.color_lut,
        app.color_radius(),
    );

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("BROWNIAN TREE (DLA)", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Walkers start on the spawn circle and take random 8-direction steps until they touch the cluster and stick. Walkers that leave the kill circle or run out of steps start over."),
        Line::from(""),
        Line::from(Span::styled("PLAYBACK:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Growth runs in the background. Each frame is a snapshot taken every `cadence` sticks; the last frame is the finished cluster."),
        Line::from(""),
        Line::from(Span::styled("COLORS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Cells are colored by distance from the seed, reaching the end of the gradient at the spawn radius."),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, +/-=Speed, L=Latest, C=Colors, V=Fullscreen, J/K=Scroll help, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let is_scrollable = content_height > visible_height;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
