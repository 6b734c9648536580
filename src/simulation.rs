use std::sync::Arc;
use std::time::Duration;

use cgmath::Point2;

use crate::{
    animation::Presentation,
    body::KinematicBody,
    controller::{MotionController, MotionState, Spawn},
    input::InputSnapshot,
    physics::PhysicsTable,
};

/// One character on a flat floor, stepped in a fixed order each tick:
/// jump event, integration, floor resolution, then the controller update.
pub struct Simulation {
    pub body: KinematicBody,
    pub controller: MotionController,
    pub presentation: Presentation,
    pub floor_y: f32,
    tick: u64,
    elapsed: Duration,
}

impl Simulation {
    pub fn new(
        physics: Arc<PhysicsTable>,
        position: Point2<f32>,
        floor_y: f32,
        spawn: Spawn,
    ) -> Self {
        let mut body = KinematicBody::new(position);
        body.resolve_floor(floor_y);
        let controller = MotionController::new(physics, &mut body, spawn);

        Self {
            body,
            controller,
            presentation: Presentation::default(),
            floor_y,
            tick: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn physics(&self) -> &PhysicsTable {
        self.controller.physics()
    }

    pub fn state(&self) -> Option<MotionState> {
        self.controller.state()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn step(&mut self, dt: Duration, input: &InputSnapshot) {
        if input.jump_just_pressed() {
            self.controller.on_jump_pressed(input, &mut self.body);
        }

        self.body.integrate(dt);
        self.body.resolve_floor(self.floor_y);
        self.controller.update(dt, input, &mut self.body);

        if let Some(state) = self.controller.state() {
            self.presentation
                .update(state, self.body.velocity.x, self.controller.physics());
        }

        self.tick += 1;
        self.elapsed += dt;
    }
}

// ---------------------------------------------------------------------------------------------------------------------
