use std::collections::VecDeque;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::config::Config;

/// Control changes consumed by the viewpoint before the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SetVelocity(f32),
    SetTurnRate(f32),
    AddAngle(f32),
}

/// Keys that act on the app rather than on the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    RegenerateGrid,
    ToggleMap,
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    move_speed: f32,
    turn_speed: f32,     // radians per tick
    mouse_sensitivity: f32,
}

impl KeyBindings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            move_speed: config.move_speed,
            turn_speed: config.turn_speed_degrees.to_radians(),
            mouse_sensitivity: config.mouse_sensitivity,
        }
    }

    pub fn control(&self, key: KeyCode, state: ElementState) -> Option<ControlEvent> {
        use ControlEvent::*;
        match (key, state) {
            (KeyCode::KeyW, ElementState::Pressed) => Some(SetVelocity(self.move_speed)),
            (KeyCode::KeyS, ElementState::Pressed) => Some(SetVelocity(-self.move_speed)),
            (KeyCode::KeyA, ElementState::Pressed) => Some(SetTurnRate(-self.turn_speed)),
            (KeyCode::KeyD, ElementState::Pressed) => Some(SetTurnRate(self.turn_speed)),
            (KeyCode::KeyW | KeyCode::KeyS, ElementState::Released) => Some(SetVelocity(0.0)),
            (KeyCode::KeyA | KeyCode::KeyD, ElementState::Released) => Some(SetTurnRate(0.0)),
            _ => None,
        }
    }

    pub fn command(&self, key: KeyCode, state: ElementState) -> Option<AppCommand> {
        if state != ElementState::Pressed {
            return None;
        }
        match key {
            KeyCode::KeyR => Some(AppCommand::RegenerateGrid),
            KeyCode::KeyM => Some(AppCommand::ToggleMap),
            KeyCode::Escape => Some(AppCommand::Exit),
            _ => None,
        }
    }

    pub fn pointer(&self, dx: f64) -> ControlEvent {
        ControlEvent::AddAngle(dx as f32 * self.mouse_sensitivity)
    }
}

/// Events collected between ticks, applied in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<ControlEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: ControlEvent) {
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ControlEvent> + '_ {
        self.pending.drain(..)
    }
}
