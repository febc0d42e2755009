//! Layout and drawing: playfield, spawn-timer gauge, sidebar, pause and quit popups.

use crate::app::QuitOption;
use crate::game::{GameState, PANEL_SIZE, PanelKind};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each grid cell is two terminal columns wide so panels come out roughly square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 22;
/// Height of the spawn-timer gauge box above the field.
const TIMER_HEIGHT: u16 = 3;

/// Duration of the destroy fade (TachyonFX); roughly the destroy delay at 60 ticks/sec.
const DESTROY_FADE_MS: u32 = 90;

/// Playfield size in terminal cells (border + grid) for given grid dimensions.
fn playfield_pixel_size(width: u16, height: u16) -> (u16, u16) {
    (width * CELL_WIDTH + 2, height * CELL_HEIGHT + 2)
}

/// Playfield inner rect (board only, no border or timer); matches draw_game layout.
fn playfield_board_rect(area: Rect, state: &GameState) -> Rect {
    let (pw, ph) =
        playfield_pixel_size(state.playfield.width as u16, state.playfield.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;
    let total_h = ph + TIMER_HEIGHT;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(total_h) / 2;
    Rect {
        x: x + 1,
        y: y + TIMER_HEIGHT + 1,
        width: (state.playfield.width as u16 * CELL_WIDTH).min(area.width.saturating_sub(2)),
        height: (state.playfield.height as u16 * CELL_HEIGHT).min(area.height.saturating_sub(2)),
    }
}

/// Build set of buffer (x, y) positions covered by matched panels.
fn matched_buffer_positions(board_rect: Rect, state: &GameState) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for (gx, gy, panel) in state.playfield.cells() {
        if !panel.is_matched() {
            continue;
        }
        let x0 = board_rect.x + (gx as u16) * CELL_WIDTH;
        let y0 = board_rect.y + (gy as u16) * CELL_HEIGHT;
        for bx in x0..(x0 + CELL_WIDTH).min(board_rect.x + board_rect.width) {
            for by in y0..(y0 + CELL_HEIGHT).min(board_rect.y + board_rect.height) {
                set.insert((bx, by));
            }
        }
    }
    set
}

/// Create or update the destroy fade and process it (TachyonFX: fade matched
/// cells to bg over the destroy delay).
fn apply_destroy_effect(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    destroy_effect: &mut Option<Effect>,
    destroy_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let board_rect = playfield_board_rect(area, state);
    let delta = destroy_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    *destroy_process_time = Some(now);

    if destroy_effect.is_none() {
        let matched_set = matched_buffer_positions(board_rect, state);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            matched_set.contains(&(pos.x, pos.y))
        }));
        let bg = theme.bg;
        let effect = fx::fade_to(bg, bg, (DESTROY_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        *destroy_effect = Some(effect);
    }

    if let Some(effect) = destroy_effect {
        frame.render_effect(effect, board_rect, tfx_delta);
    }
}

/// Darken a colour for the panel's lower-right shading.
fn shade(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_sub(70),
            g.saturating_sub(70),
            b.saturating_sub(70),
        ),
        other => other,
    }
}

/// Draw the game, with optional pause overlay and quit popup. When matched
/// panels exist and !no_animation, applies the TachyonFX fade and updates
/// `destroy_effect` / `destroy_process_time`.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    area: Rect,
    destroy_effect: &mut Option<Effect>,
    destroy_process_time: &mut Option<Instant>,
    now: Instant,
    no_animation: bool,
    quit_selected: Option<QuitOption>,
) {
    draw_game(frame, state, theme, area);
    let any_matched = state.playfield.cells().any(|(_, _, p)| p.is_matched());
    if any_matched && !no_animation && quit_selected.is_none() && !paused {
        apply_destroy_effect(
            frame,
            state,
            theme,
            area,
            destroy_effect,
            destroy_process_time,
            now,
        );
    }
    if paused && quit_selected.is_none() {
        draw_pause_overlay(frame, theme, area);
    }
    if let Some(opt) = quit_selected {
        draw_quit_menu(frame, theme, opt);
    }
}

/// Draw game: timer + playfield + sidebar; use full area and center the board.
fn draw_game(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let (pw, ph) =
        playfield_pixel_size(state.playfield.width as u16, state.playfield.height as u16);
    let total_w = pw + SIDEBAR_WIDTH;
    let total_h = ph + TIMER_HEIGHT;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let center_horiz = horiz_chunks[1];

    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(center_horiz);
    let active_area = vert_chunks[1];

    let (field_column, sidebar_area) = {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active_area);
        (inner[0], inner[1])
    };

    let (timer_area, playfield_area) = {
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TIMER_HEIGHT), Constraint::Length(ph)])
            .split(field_column);
        (inner[0], inner[1])
    };

    draw_spawn_timer(frame, state, theme, timer_area);
    draw_playfield(frame, state, theme, playfield_area);
    draw_sidebar(frame, theme, sidebar_area);
}

/// Spawn timer gauge: fills as the next panel pair approaches.
fn draw_spawn_timer(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Next pair ", Style::default().fg(theme.title))),
        )
        .gauge_style(Style::default().fg(theme.title).bg(theme.bg))
        .ratio(state.playfield.spawn_fraction());
    gauge.render(area, frame.buffer_mut());
}

fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(
            " Paneltui ",
            Style::default().fg(theme.title),
        ));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let board_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: (state.playfield.width as u16 * CELL_WIDTH).min(inner.width),
        height: (state.playfield.height as u16 * CELL_HEIGHT).min(inner.height),
    };

    let buf = frame.buffer_mut();

    // Field background
    for y in board_rect.y..board_rect.y + board_rect.height {
        for x in board_rect.x..board_rect.x + board_rect.width {
            buf[(x, y)]
                .set_symbol(" ")
                .set_style(Style::default().bg(theme.bg));
        }
    }

    // Panels are drawn at their animated position (pixel units, PANEL_SIZE
    // per cell), rounded to the nearest terminal column/row. Mid-swap and
    // mid-fall panels land between grid cells.
    for (_, _, panel) in state.playfield.cells() {
        let index = match panel.kind {
            PanelKind::Empty => continue,
            PanelKind::Colored(i) => i,
        };
        let col = (panel.pos.x * i32::from(CELL_WIDTH) + PANEL_SIZE / 2) / PANEL_SIZE;
        let row = (panel.pos.y * i32::from(CELL_HEIGHT) + PANEL_SIZE / 2) / PANEL_SIZE;
        if col < 0 || row < 0 {
            continue;
        }
        let rx = board_rect.x + col as u16;
        let ry = board_rect.y + row as u16;
        let base = if panel.is_matched() {
            Color::White
        } else {
            theme.panel_color(index)
        };
        let style = Style::default().fg(base).bg(shade(base));
        for dx in 0..CELL_WIDTH {
            let bx = rx + dx;
            if bx < board_rect.x + board_rect.width && ry < board_rect.y + board_rect.height {
                buf[(bx, ry)].set_symbol("▓").set_style(style);
            }
        }
    }

    // Cursor brackets over the two selected cells.
    let cx = board_rect.x + (state.cursor.x as u16) * CELL_WIDTH;
    let cy = board_rect.y + (state.cursor.y as u16) * CELL_HEIGHT;
    let cursor_style = Style::default().fg(Color::White);
    if cy < board_rect.y + board_rect.height {
        if cx < board_rect.x + board_rect.width {
            let bg = buf[(cx, cy)].style().bg.unwrap_or(theme.bg);
            buf[(cx, cy)]
                .set_symbol("[")
                .set_style(cursor_style.bg(bg));
        }
        let cx_r = cx + 2 * CELL_WIDTH - 1;
        if cx_r < board_rect.x + board_rect.width {
            let bg = buf[(cx_r, cy)].style().bg.unwrap_or(theme.bg);
            buf[(cx_r, cy)]
                .set_symbol("]")
                .set_style(cursor_style.bg(bg));
        }
    }
}

fn draw_sidebar(frame: &mut Frame, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Colours (border + title + strip)
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
        ])
        .split(area);

    // --- Colours (own border) ---
    let colours_outer = chunks[0];
    let colours_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let colours_inner = colours_block.inner(colours_outer);
    colours_block.render(colours_outer, frame.buffer_mut());
    let colours_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(colours_inner);
    Paragraph::new(Line::from(Span::styled("Colours", title_style)))
        .render(colours_layout[0], frame.buffer_mut());
    draw_colour_strip(frame, theme, colours_layout[1]);

    // --- Controls (own border) ---
    let controls_outer = chunks[2];
    let controls_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let controls_inner = controls_block.inner(controls_outer);
    controls_block.render(controls_outer, frame.buffer_mut());
    let controls_lines = vec![
        Line::from(Span::styled("Controls", title_style)),
        Line::from(vec![
            Span::styled("wasd/↕↔ ", fg_style),
            Span::styled("move", dim_style),
        ]),
        Line::from(vec![
            Span::styled("space   ", fg_style),
            Span::styled("swap", dim_style),
        ]),
        Line::from(vec![
            Span::styled("p       ", fg_style),
            Span::styled("pause", dim_style),
        ]),
        Line::from(vec![
            Span::styled("q       ", fg_style),
            Span::styled("quit", dim_style),
        ]),
    ];
    Paragraph::new(ratatui::text::Text::from(controls_lines))
        .render(controls_inner, frame.buffer_mut());
}

/// Draw a row of coloured blocks, one per panel colour.
fn draw_colour_strip(frame: &mut Frame, theme: &Theme, area: Rect) {
    let n = theme.panels.len() as u16;
    let block_w = (area.width / n.max(1)).max(1);
    for i in 0..n {
        let r = Rect {
            x: area.x + i * block_w,
            y: area.y,
            width: block_w,
            height: area.height.min(1),
        };
        let c = theme.panel_color(i as u8);
        let p = Paragraph::new("█").style(Style::default().fg(c).bg(c));
        p.render(r, frame.buffer_mut());
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let area = frame.area();
    let qw = 24;
    let qh = 6;
    let quit_rect = Rect {
        x: area.x + area.width.saturating_sub(qw) / 2,
        y: area.y + area.height.saturating_sub(qh) / 2,
        width: qw.min(area.width),
        height: qh.min(area.height),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");

    // Clear background
    for y in quit_rect.y..quit_rect.y + quit_rect.height {
        for x in quit_rect.x..quit_rect.x + quit_rect.width {
            frame.buffer_mut()[(x, y)].set_style(Style::default().bg(theme.bg));
        }
    }

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::Exit, " Exit "),
    ];
    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        frame.buffer_mut().set_string(rx, ry, label, style);
    }
}
