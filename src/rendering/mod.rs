use macroquad::prelude::*;

use crate::application::{FrameStats, PlaybackState};
use crate::backend::{Backend, InitStatus};
use crate::domain::{RangeResult, Sequence, Snapshot};
use crate::ui::{Action, Button, Layout, PANEL_WIDTH, below_buttons, panel_x};

const ALIVE: Color = Color::new(0.0, 1.0, 0.59, 1.0);
const BACKGROUND: Color = Color::new(0.06, 0.06, 0.06, 1.0);
const LABEL: Color = Color::new(0.7, 0.7, 0.7, 1.0);

/// Format large numbers with K/M/B suffixes
fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

/// Draw the live cells of a snapshot
pub fn draw_grid(snapshot: Snapshot<'_>, layout: &Layout) {
    let (w, h) = layout.extent();
    draw_rectangle(layout.origin.0, layout.origin.1, w, h, BACKGROUND);

    // Gaps between cells once they are big enough to see
    let inset = if layout.cell_size >= 4.0 { 1.0 } else { 0.0 };
    for (x, y) in snapshot.live_cells() {
        let (sx, sy) = layout.to_screen(x, y);
        draw_rectangle(sx, sy, layout.cell_size - inset, layout.cell_size - inset, ALIVE);
    }
}

/// State of the range search shown in the panel
pub enum SearchStatus<'a> {
    Running { limit: u64 },
    Done { limit: u64, best: RangeResult, sequence: &'a Sequence },
    Cancelled { limit: u64 },
}

/// Everything the side panel reports
pub struct PanelInfo<'a> {
    pub backend: Backend,
    pub status: &'a InitStatus,
    pub playback: PlaybackState,
    pub stats: FrameStats,
    pub generation: u64,
    pub population: usize,
    pub grid: (usize, usize),
    pub pattern: &'a str,
    pub search: SearchStatus<'a>,
}

fn label(text: &str, x: f32, y: f32, size: f32, color: Color) {
    draw_text(text, x, y, size, color);
}

/// Draw the control panel: buttons, simulation stats and the search result
pub fn draw_panel(info: &PanelInfo<'_>, buttons: &[(Action, Button)], mouse_pos: (f32, f32)) {
    let px = panel_x();
    draw_rectangle(px, 0.0, PANEL_WIDTH, screen_height(), Color::from_rgba(30, 30, 30, 255));
    buttons.iter().for_each(|(_, button)| button.draw(mouse_pos));

    let x = px + 10.0;
    let mut y = below_buttons();
    let mut line = |text: &str, size: f32, color: Color| {
        y += size + 4.0;
        label(text, x, y, size, color);
    };

    match info.status {
        InitStatus::Ready => line(&info.backend.to_string(), 14.0, LABEL),
        InitStatus::Degraded { reason } => {
            line("Degraded: using fallback", 14.0, ORANGE);
            line(reason, 12.0, LABEL);
        }
    }

    let (playing, color) = match info.playback {
        PlaybackState::Playing => ("Playing", GREEN),
        PlaybackState::Paused => ("Paused", ORANGE),
    };
    line(playing, 18.0, color);
    line(&format!("Generation: {}", info.generation), 16.0, WHITE);
    line(
        &format!("Population: {}", format_number(info.population as u64)),
        14.0,
        LABEL,
    );
    line(&format!("Grid: {}x{}", info.grid.0, info.grid.1), 14.0, LABEL);
    let rate = info
        .stats
        .rate()
        .map_or_else(|| "-".to_string(), |r| format_number(r as u64));
    line(&format!("Cycles/s: {}", rate), 14.0, LABEL);
    line(&format!("Pattern: {}", info.pattern), 14.0, LABEL);

    y += 10.0;
    label("Longest sequence", x, y + 16.0, 16.0, WHITE);
    y += 20.0;
    match &info.search {
        SearchStatus::Running { limit } => {
            label(&format!("Searching 1..={}", format_number(*limit)), x, y + 14.0, 14.0, LABEL);
        }
        SearchStatus::Cancelled { limit } => {
            label(&format!("Search to {} cancelled", format_number(*limit)), x, y + 14.0, 14.0, ORANGE);
        }
        SearchStatus::Done { limit, best, sequence } => {
            label(
                &format!("1..={}: {} ({} terms)", format_number(*limit), best.number, best.length),
                x,
                y + 14.0,
                14.0,
                LABEL,
            );
            let peak = sequence.peak().unwrap_or(0);
            label(&format!("Peak: {}", format_number(peak)), x, y + 30.0, 14.0, LABEL);
            draw_sequence_chart(sequence, x, y + 40.0, PANEL_WIDTH - 20.0, 120.0);
        }
    }
}

/// Line chart of a sequence's values, scaled to its peak
pub fn draw_sequence_chart(sequence: &Sequence, x: f32, y: f32, width: f32, height: f32) {
    draw_rectangle_lines(x, y, width, height, 1.0, DARKGRAY);
    let values = sequence.values();
    let peak = values.iter().copied().max().unwrap_or(0);
    if values.len() < 2 || peak == 0 {
        return;
    }

    let step = width / (values.len() - 1) as f32;
    let point = |i: usize, v: u64| (x + i as f32 * step, y + height - (v as f64 / peak as f64) as f32 * height);
    for (i, pair) in values.windows(2).enumerate() {
        let (x1, y1) = point(i, pair[0]);
        let (x2, y2) = point(i + 1, pair[1]);
        draw_line(x1, y1, x2, y2, 1.5, ALIVE);
    }
}
