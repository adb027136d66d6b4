use std::f32::consts::TAU;

use crate::input::ControlEvent;

/// Position and heading of the observer. Screen convention: y grows
/// downward, so a positive angle turns clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub pos: [f32; 2], // (x, y) in world units
    pub angle: f32,    // radians, 0 = +x
    pub velocity: f32, // world units per tick along `angle`
    pub turn_rate: f32, // radians per tick
}

impl Viewpoint {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            pos: [x, y],
            angle: wrap_angle(angle),
            velocity: 0.0,
            turn_rate: 0.0,
        }
    }

    #[inline]
    pub fn origin(&self) -> [f32; 2] {
        self.pos
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub fn set_turn_rate(&mut self, turn_rate: f32) {
        self.turn_rate = turn_rate;
    }

    pub fn add_angle(&mut self, delta: f32) {
        self.angle = wrap_angle(self.angle + delta);
    }

    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SetVelocity(v) => self.set_velocity(v),
            ControlEvent::SetTurnRate(r) => self.set_turn_rate(r),
            ControlEvent::AddAngle(d) => self.add_angle(d),
        }
    }

    /// One simulation step. Walls do not block movement.
    pub fn tick(&mut self) {
        self.angle = wrap_angle(self.angle + self.turn_rate);
        self.pos[0] += self.velocity * self.angle.cos();
        self.pos[1] += self.velocity * self.angle.sin();
    }

    /// Apply every queued control event, then run one tick.
    pub fn advance(&mut self, events: impl IntoIterator<Item = ControlEvent>) {
        for event in events {
            self.apply(event);
        }
        self.tick();
        tracing::debug!(
            x = self.pos[0],
            y = self.pos[1],
            angle = self.angle,
            velocity = self.velocity,
            turn_rate = self.turn_rate,
            "tick"
        );
    }

    /// Absolute angle of the ray for screen `column` out of `width`, sweeping
    /// left to right across `fov` radians.
    #[inline]
    pub fn column_angle(&self, column: u32, width: u32, fov: f32) -> f32 {
        self.angle - 0.5 * fov + (fov / width as f32) * column as f32
    }
}

// Heading is kept in [0, 2pi].
#[inline]
fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}
