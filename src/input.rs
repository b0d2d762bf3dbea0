use crate::secret::KeyToken;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Frame-latched input state. Events are pushed as they arrive and
/// consumed by the loop at the start of the next step; `clear_frame`
/// drops the per-frame latches afterwards.
pub struct Input {
    pub mouse_delta: (f32, f32),
    wheel: f32,
    cursor_pos: Option<(f32, f32)>,
    left_clicked: bool,
    right_pressed: bool,
    middle_pressed: bool,
    escape_pressed: bool,
    key_tokens: Vec<KeyToken>,
}

impl Input {
    pub fn new() -> Self {
        Self {
            mouse_delta: (0.0, 0.0),
            wheel: 0.0,
            cursor_pos: None,
            left_clicked: false,
            right_pressed: false,
            middle_pressed: false,
            escape_pressed: false,
            key_tokens: Vec::new(),
        }
    }

    pub fn push(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, pressed } => {
                if pressed {
                    self.apply_key(&key);
                }
            }
            InputEvent::MouseMove { dx, dy } => {
                self.mouse_delta.0 += dx;
                self.mouse_delta.1 += dy;
            }
            InputEvent::Wheel { delta } => {
                self.wheel += delta;
            }
            InputEvent::MouseButton { button, pressed } => match button {
                MouseButton::Left => {
                    if pressed {
                        self.left_clicked = true;
                    }
                }
                MouseButton::Right => {
                    self.right_pressed = pressed;
                }
                MouseButton::Middle => {
                    self.middle_pressed = pressed;
                }
                _ => {}
            },
            InputEvent::CursorPos { x, y } => {
                self.cursor_pos = Some((x, y));
            }
            InputEvent::Other => {}
        }
    }

    fn apply_key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::ArrowUp) => self.key_tokens.push(KeyToken::Up),
            Key::Named(NamedKey::ArrowDown) => self.key_tokens.push(KeyToken::Down),
            Key::Named(NamedKey::ArrowLeft) => self.key_tokens.push(KeyToken::Left),
            Key::Named(NamedKey::ArrowRight) => self.key_tokens.push(KeyToken::Right),
            Key::Named(NamedKey::Escape) => self.escape_pressed = true,
            Key::Character(ch) => {
                let mut chars = ch.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    self.key_tokens.push(KeyToken::character(c));
                }
            }
            _ => {}
        }
    }

    pub fn clear_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.left_clicked = false;
        self.escape_pressed = false;
        self.key_tokens.clear();
    }

    pub fn take_left_click(&mut self) -> bool {
        let was = self.left_clicked;
        self.left_clicked = false;
        was
    }

    pub fn take_escape(&mut self) -> bool {
        let was = self.escape_pressed;
        self.escape_pressed = false;
        was
    }

    pub fn consume_wheel_delta(&mut self) -> Option<f32> {
        if self.wheel.abs() > 0.0 {
            let d = self.wheel;
            self.wheel = 0.0;
            Some(d)
        } else {
            None
        }
    }

    pub fn drain_key_tokens(&mut self) -> Vec<KeyToken> {
        std::mem::take(&mut self.key_tokens)
    }

    pub fn cursor_position(&self) -> Option<(f32, f32)> {
        self.cursor_pos
    }

    pub fn right_held(&self) -> bool {
        self.right_pressed
    }

    pub fn middle_held(&self) -> bool {
        self.middle_pressed
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseMove { dx: f32, dy: f32 },
    Wheel { delta: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    CursorPos { x: f32, y: f32 },
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                InputEvent::Wheel { delta: d }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                InputEvent::MouseButton { button: *button, pressed: *state == ElementState::Pressed }
            }
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            _ => InputEvent::Other,
        }
    }

    pub fn from_device_event(ev: &DeviceEvent) -> Self {
        match ev {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                InputEvent::MouseMove { dx: *dx as f32, dy: *dy as f32 }
            }
            _ => InputEvent::Other,
        }
    }
}
