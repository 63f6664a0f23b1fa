//! Keyboard and touch input mapping
//!
//! Collects raw browser events between frames and turns them into the
//! [`ControlInput`] the tick consumes.

use glam::Vec2;

use crate::consts::JOYSTICK_RADIUS;
use crate::renderer::Viewport;
use crate::sim::{BodyIndex, ControlInput};

/// What a physical key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    RotateLeft,
    RotateRight,
    Thrust,
    Scan,
}

impl KeyAction {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(KeyAction::RotateLeft),
            "ArrowRight" | "KeyD" => Some(KeyAction::RotateRight),
            "ArrowUp" | "KeyW" => Some(KeyAction::Thrust),
            "KeyE" => Some(KeyAction::Scan),
            _ => None,
        }
    }
}

/// Virtual joystick anchored where the touch began
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Joystick {
    active: bool,
    origin: Vec2,
    /// Deflection, magnitude <= 1
    value: Vec2,
}

/// Input state between frames
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    left: bool,
    right: bool,
    up: bool,
    joystick: Joystick,
    paused: bool,
    navigate_to: Option<BodyIndex>,
    abort_autopilot: bool,
    scan_requested: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key press; returns whether the key is bound
    ///
    /// Held keys are tracked even while paused so a key held through a
    /// transition still counts afterwards.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::RotateLeft => self.left = true,
            KeyAction::RotateRight => self.right = true,
            KeyAction::Thrust => self.up = true,
            KeyAction::Scan => {
                if !self.paused {
                    self.scan_requested = true;
                }
            }
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::RotateLeft => self.left = false,
            KeyAction::RotateRight => self.right = false,
            KeyAction::Thrust => self.up = false,
            KeyAction::Scan => {}
        }
        true
    }

    /// Touch start; only the lower-left quadrant spawns the joystick
    pub fn touch_start(&mut self, point: Vec2, viewport: Viewport) -> bool {
        if self.paused {
            return false;
        }
        if point.x < viewport.width / 2.0 && point.y > viewport.height / 2.0 {
            self.joystick = Joystick {
                active: true,
                origin: point,
                value: Vec2::ZERO,
            };
            return true;
        }
        false
    }

    pub fn touch_move(&mut self, point: Vec2) {
        if self.paused || !self.joystick.active {
            return;
        }
        let offset = (point - self.joystick.origin).clamp_length_max(JOYSTICK_RADIUS);
        self.joystick.value = offset / JOYSTICK_RADIUS;
    }

    pub fn touch_end(&mut self) {
        self.joystick = Joystick::default();
    }

    /// Knob offset in pixels for drawing, `None` when released
    pub fn joystick_knob(&self) -> Option<Vec2> {
        self.joystick
            .active
            .then(|| self.joystick.value * JOYSTICK_RADIUS)
    }

    /// Movement input is dropped while paused; the joystick resets
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.joystick = Joystick::default();
        }
    }

    /// Queue an autopilot command from the HUD
    pub fn request_navigate(&mut self, target: BodyIndex) {
        self.navigate_to = Some(target);
        self.abort_autopilot = false;
    }

    pub fn request_abort(&mut self) {
        self.abort_autopilot = true;
        self.navigate_to = None;
    }

    /// Take a pending scan request
    pub fn take_scan_request(&mut self) -> bool {
        std::mem::take(&mut self.scan_requested)
    }

    /// Control signals for this frame; one-shot commands are consumed
    pub fn control_input(&mut self) -> ControlInput {
        let moving = !self.paused;
        ControlInput {
            rotate_left: moving && self.left,
            rotate_right: moving && self.right,
            thrust: moving && self.up,
            joystick: (moving && self.joystick.active).then_some(self.joystick.value),
            navigate_to: self.navigate_to.take(),
            abort_autopilot: std::mem::take(&mut self.abort_autopilot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_key_bindings() {
        let mut input = InputMapper::new();
        assert!(input.key_down("KeyA"));
        assert!(input.key_down("ArrowUp"));
        assert!(!input.key_down("KeyQ"));
        let ctl = input.control_input();
        assert!(ctl.rotate_left && ctl.thrust && !ctl.rotate_right);
        assert!(ctl.is_manual());

        input.key_up("KeyA");
        input.key_up("ArrowUp");
        assert!(!input.control_input().is_manual());
    }

    #[test]
    fn test_joystick_quadrant_and_clamp() {
        let mut input = InputMapper::new();
        assert!(!input.touch_start(Vec2::new(600.0, 500.0), VP));
        assert!(input.touch_start(Vec2::new(100.0, 500.0), VP));

        input.touch_move(Vec2::new(100.0, 300.0));
        let joy = input.control_input().joystick.unwrap();
        assert!((joy - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert_eq!(input.joystick_knob(), Some(Vec2::new(0.0, -50.0)));

        input.touch_end();
        assert_eq!(input.control_input().joystick, None);
    }

    #[test]
    fn test_one_shots_consumed() {
        let mut input = InputMapper::new();
        input.request_navigate(BodyIndex(4));
        assert_eq!(input.control_input().navigate_to, Some(BodyIndex(4)));
        assert_eq!(input.control_input().navigate_to, None);

        input.request_abort();
        assert!(input.control_input().abort_autopilot);
        assert!(!input.control_input().abort_autopilot);

        input.key_down("KeyE");
        assert!(input.take_scan_request());
        assert!(!input.take_scan_request());
    }

    #[test]
    fn test_pause_drops_movement() {
        let mut input = InputMapper::new();
        input.touch_start(Vec2::new(10.0, 590.0), VP);
        input.key_down("KeyW");
        input.set_paused(true);
        assert!(!input.control_input().is_manual());
        assert!(!input.touch_start(Vec2::new(10.0, 590.0), VP));
        input.key_down("KeyE");
        assert!(!input.take_scan_request());

        // Still held after resuming
        input.set_paused(false);
        assert!(input.control_input().thrust);
    }
}
