mod button;

pub use button::Button;

use macroquad::prelude::{screen_height, screen_width};

pub const PANEL_WIDTH: f32 = 220.0;
pub const BUTTON_HEIGHT: f32 = 34.0;
const BUTTON_GAP: f32 = 6.0;
const BUTTONS_TOP: f32 = 12.0;

/// Get the X position where the panel starts (right side)
pub fn panel_x() -> f32 {
    (screen_width() - PANEL_WIDTH).max(0.0)
}

/// Size of the grid area left of the panel
pub fn grid_area() -> (f32, f32) {
    (panel_x(), screen_height())
}

/// Everything the host can be asked to do, from a key or a button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Step,
    Clear,
    Randomize,
    PlacePattern,
    NextPattern,
    SearchRange,
}

impl Action {
    /// Panel order
    pub const ALL: [Action; 7] = [
        Action::TogglePlay,
        Action::Step,
        Action::Clear,
        Action::Randomize,
        Action::PlacePattern,
        Action::NextPattern,
        Action::SearchRange,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::TogglePlay => "Play/Pause [Space]",
            Action::Step => "Step [S]",
            Action::Clear => "Clear [C]",
            Action::Randomize => "Random [R]",
            Action::PlacePattern => "Place [G]",
            Action::NextPattern => "Next pattern [P]",
            Action::SearchRange => "Search x2 [N]",
        }
    }
}

/// Panel buttons, one per action
pub fn create_buttons() -> Vec<(Action, Button)> {
    let px = panel_x();
    Action::ALL
        .iter()
        .enumerate()
        .map(|(i, &action)| {
            let y = BUTTONS_TOP + i as f32 * (BUTTON_HEIGHT + BUTTON_GAP);
            (action, Button::new(px + 10.0, y, PANEL_WIDTH - 20.0, BUTTON_HEIGHT, action.label()))
        })
        .collect()
}

/// Y coordinate below the last button
pub fn below_buttons() -> f32 {
    BUTTONS_TOP + Action::ALL.len() as f32 * (BUTTON_HEIGHT + BUTTON_GAP) + 10.0
}

/// Scale and offset fitting a whole grid into the grid area
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub cell_size: f32,
    pub origin: (f32, f32),
    pub grid: (usize, usize),
}

impl Layout {
    /// Largest square cells that fit, centered in `area`
    pub fn fit(grid: (usize, usize), area: (f32, f32)) -> Self {
        let (w, h) = (grid.0.max(1) as f32, grid.1.max(1) as f32);
        let cell_size = (area.0 / w).min(area.1 / h).max(1.0);
        let origin = (
            ((area.0 - cell_size * w) / 2.0).max(0.0),
            ((area.1 - cell_size * h) / 2.0).max(0.0),
        );
        Self { cell_size, origin, grid }
    }

    pub fn to_screen(&self, x: usize, y: usize) -> (f32, f32) {
        (
            self.origin.0 + x as f32 * self.cell_size,
            self.origin.1 + y as f32 * self.cell_size,
        )
    }

    /// Grid cell under a screen position, if any
    pub fn to_grid(&self, screen: (f32, f32)) -> Option<(i64, i64)> {
        let gx = ((screen.0 - self.origin.0) / self.cell_size).floor();
        let gy = ((screen.1 - self.origin.1) / self.cell_size).floor();
        let inside = gx >= 0.0 && gy >= 0.0 && gx < self.grid.0 as f32 && gy < self.grid.1 as f32;
        inside.then_some((gx as i64, gy as i64))
    }

    /// Screen size of the whole grid
    pub fn extent(&self) -> (f32, f32) {
        (self.grid.0 as f32 * self.cell_size, self.grid.1 as f32 * self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_tighter_axis() {
        let layout = Layout::fit((200, 100), (800.0, 600.0));
        assert_eq!(layout.cell_size, 4.0);
        assert_eq!(layout.origin, (0.0, 100.0));
        assert_eq!(layout.extent(), (800.0, 400.0));
    }

    #[test]
    fn test_screen_grid_round_trip() {
        let layout = Layout::fit((10, 10), (100.0, 100.0));
        let (sx, sy) = layout.to_screen(3, 7);
        assert_eq!(layout.to_grid((sx + 1.0, sy + 1.0)), Some((3, 7)));
    }

    #[test]
    fn test_outside_grid_is_none() {
        let layout = Layout::fit((10, 5), (100.0, 100.0));
        assert_eq!(layout.to_grid((-1.0, 30.0)), None);
        assert_eq!(layout.to_grid((50.0, 10.0)), None);
        assert_eq!(layout.to_grid((100.0, 50.0)), None);
    }

    #[test]
    fn test_every_action_has_a_label() {
        for action in Action::ALL {
            assert!(!action.label().is_empty());
        }
    }
}
