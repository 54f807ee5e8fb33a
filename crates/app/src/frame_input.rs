//! Keyboard and mouse input collection for one rendered frame.

use cellcraft_app::app_loop::{FrameInput, PointerTracker};
use macroquad::prelude::{
    KeyCode, MouseButton, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed,
    is_mouse_button_released, mouse_position, mouse_wheel,
};

const ACTION_KEYS: [KeyCode; 7] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::G,
    KeyCode::R,
    KeyCode::C,
];

pub fn capture_frame_input(pointer: &mut PointerTracker) -> FrameInput {
    let keys_pressed = ACTION_KEYS.into_iter().filter(|key| is_key_pressed(*key)).collect();

    let position = mouse_position();
    let (click, drag) = pointer.update(
        is_mouse_button_pressed(MouseButton::Left),
        is_mouse_button_down(MouseButton::Left),
        is_mouse_button_released(MouseButton::Left),
        position,
    );

    // Wheel deltas differ per platform; only the direction is used.
    let (_, wheel_y) = mouse_wheel();
    let wheel = if wheel_y > 0.0 {
        1.0
    } else if wheel_y < 0.0 {
        -1.0
    } else {
        0.0
    };

    FrameInput { keys_pressed, click, drag, wheel, pointer: position }
}
