use std::time::Duration;

use cgmath::*;

// Effectively "uncapped" until a motion state sets a real limit
const DEFAULT_MAX_VELOCITY: f32 = 10_000.0;

/// The kinematic state a motion controller steers. Units are pixels and seconds, with +y
/// pointing down (screen space), so upward motion has negative y velocity.
///
/// The controller writes acceleration, caps, gravity and drag (and velocity directly at
/// push-off and takeoff); `integrate` turns those into motion. Setting a field never clamps
/// anything - caps are applied only during integration, which is what lets a jump takeoff
/// briefly exceed the vertical cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicBody {
    // feet of the character
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
    pub acceleration: Vector2<f32>,
    pub max_velocity: Vector2<f32>,
    pub gravity: Vector2<f32>,
    // linear deceleration, applied only on an axis with zero acceleration
    pub drag: Vector2<f32>,
    // written by whoever resolves collisions
    pub grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::new(point2(0.0, 0.0))
    }
}

impl KinematicBody {
    pub fn new(position: Point2<f32>) -> Self {
        Self {
            position,
            velocity: Zero::zero(),
            acceleration: Zero::zero(),
            max_velocity: vec2(DEFAULT_MAX_VELOCITY, DEFAULT_MAX_VELOCITY),
            gravity: Zero::zero(),
            drag: Zero::zero(),
            grounded: false,
        }
    }

    /// Advances velocity and position by `dt`. Acceleration and gravity are applied first,
    /// then drag (only where there's no acceleration), then the per-axis velocity caps.
    pub fn integrate(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();

        self.velocity.x = integrate_axis(
            self.velocity.x,
            self.acceleration.x,
            self.gravity.x,
            self.drag.x,
            self.max_velocity.x,
            dt,
        );
        self.velocity.y = integrate_axis(
            self.velocity.y,
            self.acceleration.y,
            self.gravity.y,
            self.drag.y,
            self.max_velocity.y,
            dt,
        );

        self.position = self.position + self.velocity * dt;
    }

    /// Minimal collision stand-in: a flat, infinitely wide floor at `floor_y`. A body at or
    /// below the floor is put on it and marked grounded; anything above is airborne.
    pub fn resolve_floor(&mut self, floor_y: f32) {
        if self.position.y >= floor_y {
            self.position.y = floor_y;
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }
}

fn integrate_axis(
    velocity: f32,
    acceleration: f32,
    gravity: f32,
    drag: f32,
    max_velocity: f32,
    dt: f32,
) -> f32 {
    let mut velocity = velocity + gravity * dt;

    if acceleration != 0.0 {
        velocity += acceleration * dt;
    } else if drag != 0.0 {
        let drag = drag.abs() * dt;
        if velocity - drag > 0.0 {
            velocity -= drag;
        } else if velocity + drag < 0.0 {
            velocity += drag;
        } else {
            velocity = 0.0;
        }
    }

    let max_velocity = max_velocity.abs();
    velocity.max(-max_velocity).min(max_velocity)
}

// ---------------------------------------------------------------------------------------------------------------------
