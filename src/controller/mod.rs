//! The player's ground/air motion logic, built on the generic state machine.
//!
//! The controller owns no body. Each tick the driver hands it the body and the tick's input:
//!
//! 1. deliver a jump press, if there was one, via [`MotionController::on_jump_pressed`]
//! 2. integrate the body and resolve collisions (which sets `grounded`)
//! 3. call [`MotionController::update`]
//!
//! [`crate::simulation::Simulation`] does exactly this for a flat floor.

mod motion;
mod states;

use std::sync::Arc;
use std::time::Duration;

use crate::{
    body::KinematicBody,
    input::{HorizontalDir, InputSnapshot},
    physics::{JumpStage, PhysicsTable},
    state_machine::StateMachine,
};

use motion::{Motion, MotionMemory};
pub use states::{AirState, GroundState, MotionGroup, MotionState};

/// Where a character starts out when the controller is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    /// Standing still on the ground, in `ground.idle`
    Grounded,
    /// Dropped into the level, in `air.fall` until the first landing
    Airborne,
}

pub struct MotionController {
    physics: Arc<PhysicsTable>,
    machine: StateMachine<MotionState>,
    memory: MotionMemory,
}

impl MotionController {
    pub fn new(physics: Arc<PhysicsTable>, body: &mut KinematicBody, spawn: Spawn) -> Self {
        body.max_velocity.y = physics.downward_velocity_cap;

        let mut controller = Self {
            physics,
            machine: StateMachine::new("player"),
            memory: MotionMemory::default(),
        };

        let initial_state = match spawn {
            Spawn::Grounded => MotionState::IDLE,
            Spawn::Airborne => MotionState::FALL,
        };
        controller.transition(initial_state, &InputSnapshot::default(), body);
        controller
    }

    pub fn physics(&self) -> &PhysicsTable {
        &self.physics
    }

    /// Runs one tick of motion logic against `body`.
    pub fn update(&mut self, dt: Duration, input: &InputSnapshot, body: &mut KinematicBody) {
        let mut motion = Motion {
            physics: &self.physics,
            body,
            input,
            memory: &mut self.memory,
        };
        self.machine.update(dt, &mut motion);
    }

    /// Jumping is edge-triggered, so a press is delivered as an event rather than read from the
    /// per-tick snapshot. A jump only starts from the ground; returns true if it did.
    pub fn on_jump_pressed(&mut self, input: &InputSnapshot, body: &mut KinematicBody) -> bool {
        if self.machine.current_group() != Some(MotionGroup::Ground) {
            return false;
        }
        self.transition(MotionState::JUMP, input, body)
    }

    /// Requests a transition by qualified name (e.g. "air.fall"). Unknown names are ignored,
    /// as is a request for the current state; returns true only if a transition happened.
    pub fn force_state(
        &mut self,
        name: &str,
        input: &InputSnapshot,
        body: &mut KinematicBody,
    ) -> bool {
        match name.parse::<MotionState>() {
            Ok(state) => self.transition(state, input, body),
            Err(e) => {
                log::debug!("[StateMachine {}] ignoring request: {}", self.machine.name(), e);
                false
            }
        }
    }

    fn transition(
        &mut self,
        state: MotionState,
        input: &InputSnapshot,
        body: &mut KinematicBody,
    ) -> bool {
        let mut motion = Motion {
            physics: &self.physics,
            body,
            input,
            memory: &mut self.memory,
        };
        self.machine.set_state(state, &mut motion)
    }

    pub fn state(&self) -> Option<MotionState> {
        self.machine.current_state()
    }

    pub fn is_current_state(&self, state: MotionState) -> bool {
        self.machine.is_current_state(state)
    }

    pub fn has_pending_transition(&self) -> bool {
        self.machine.pending_transition().is_some()
    }

    pub fn jump_stage(&self) -> JumpStage {
        self.memory.jump_stage
    }

    pub fn takeoff_speed(&self) -> f32 {
        self.memory.takeoff_speed
    }

    pub fn skid_direction(&self) -> Option<HorizontalDir> {
        self.memory.skid_direction
    }
}

// ---------------------------------------------------------------------------------------------------------------------
