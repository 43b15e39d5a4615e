use macroquad::prelude::*;

use crate::domain::GridSimulation;
use crate::ui::{Action, Button, Layout};

const KEY_BINDINGS: [(KeyCode, Action); 7] = [
    (KeyCode::Space, Action::TogglePlay),
    (KeyCode::S, Action::Step),
    (KeyCode::C, Action::Clear),
    (KeyCode::R, Action::Randomize),
    (KeyCode::G, Action::PlacePattern),
    (KeyCode::P, Action::NextPattern),
    (KeyCode::N, Action::SearchRange),
];

/// Actions requested this frame, keys first then buttons
pub fn collect_actions(buttons: &[(Action, Button)], mouse_pos: (f32, f32)) -> Vec<Action> {
    let keys = KEY_BINDINGS
        .iter()
        .filter(|(key, _)| is_key_pressed(*key))
        .map(|&(_, action)| action);
    let clicks = buttons
        .iter()
        .filter(|(_, button)| button.is_clicked(mouse_pos))
        .map(|&(action, _)| action);
    keys.chain(clicks).collect()
}

/// Paint with the left button, erase with the right
pub fn paint(grid: &mut dyn GridSimulation, layout: &Layout, mouse_pos: (f32, f32)) {
    let Some((x, y)) = layout.to_grid(mouse_pos) else {
        return;
    };
    if is_mouse_button_down(MouseButton::Left) {
        grid.set_cell(x, y, true);
    } else if is_mouse_button_down(MouseButton::Right) {
        grid.set_cell(x, y, false);
    }
}
