use std::time::Duration;

use crate::{
    body::KinematicBody,
    input::{HorizontalDir, InputSnapshot},
    physics::{JumpStage, PhysicsTable},
    state_machine::{Scope, StateHandler, StateMachine},
};

use super::states::{AirState, GroundState, MotionGroup, MotionState};

/// What the controller remembers between ticks, beyond the current state itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionMemory {
    // intent that started the current skid
    pub skid_direction: Option<HorizontalDir>,
    // |velocity.x| at the most recent jump takeoff
    pub takeoff_speed: f32,
    pub jump_stage: JumpStage,
}

/// Per-tick view the state callbacks work against: the shared physics constants, the body being
/// steered, this tick's input, and the controller's memory.
pub(super) struct Motion<'a> {
    pub physics: &'a PhysicsTable,
    pub body: &'a mut KinematicBody,
    pub input: &'a InputSnapshot,
    pub memory: &'a mut MotionMemory,
}

impl Motion<'_> {
    fn intent_sign(&self) -> f32 {
        self.input.horizontal.map_or(0.0, |dir| dir.sign())
    }

    fn ground_enter(&mut self) {
        self.body.gravity.y = self.physics.vertical_stages[0].falling_gravity;
    }

    fn ground_update(&mut self, machine: &mut StateMachine<MotionState>) {
        if !self.body.grounded {
            machine.set_state(MotionState::AIR, self);
            return;
        }

        let vx = self.body.velocity.x;
        let skidding = machine.is_current_state(MotionState::SKID);

        match self.input.horizontal {
            Some(intent) if intent.agrees_with(vx) => {
                let velocities = self.physics.velocities;

                // An unfinished skid pushes off at turnaround speed rather than walk speed,
                // whichever way the stick points now
                let min_speed = if skidding {
                    velocities.skid_turnaround
                } else {
                    velocities.min_walk
                };

                if vx.abs() < min_speed {
                    self.body.velocity.x = intent.sign() * min_speed;
                }

                if self.input.run {
                    machine.set_state(MotionState::RUN, self);
                } else if machine.is_current_state(MotionState::RUN) {
                    // run never drops straight to walk
                    let hold = self.physics.run_hysteresis_duration;
                    machine.set_state_then(
                        MotionState::RUN_HYSTERESIS,
                        hold,
                        MotionState::WALK,
                        self,
                    );
                } else if machine.is_current_state(MotionState::RUN_HYSTERESIS) {
                    // let the hysteresis timer decide when walking starts
                } else {
                    machine.set_state(MotionState::WALK, self);
                }
            }
            Some(intent) => {
                self.memory.skid_direction = Some(intent);
                machine.set_state(MotionState::SKID, self);
            }
            None => {
                self.body.acceleration.x = 0.0;
                if vx == 0.0 {
                    machine.set_state(MotionState::IDLE, self);
                } else if !skidding {
                    machine.set_state(MotionState::RELEASE, self);
                }
            }
        }
    }

    fn walk_enter(&mut self) {
        self.body.max_velocity.x = self.physics.velocities.max_walk;
        self.body.acceleration.x = self.intent_sign() * self.physics.accelerations.walk;
    }

    fn run_enter(&mut self) {
        self.body.max_velocity.x = self.physics.velocities.max_run;
        self.body.acceleration.x = self.intent_sign() * self.physics.accelerations.run;
    }

    fn run_hysteresis_enter(&mut self) {
        self.body.max_velocity.x = self
            .body
            .velocity
            .x
            .abs()
            .max(self.physics.velocities.max_walk);
    }

    fn skid_enter(&mut self) {
        self.body.acceleration.x = self.intent_sign() * self.physics.decelerations.skid;
    }

    fn skid_update(&mut self) {
        // the skid runs to a stop even with the stick released
        if self.input.horizontal.is_none() {
            self.body.drag.x = self.physics.decelerations.skid;
        }
    }

    fn release_enter(&mut self) {
        self.body.drag.x = self.physics.decelerations.release;
    }

    fn air_update(&mut self, machine: &mut StateMachine<MotionState>) {
        if self.body.grounded {
            machine.set_state(MotionState::GROUND, self);
            return;
        }

        self.body.drag.x = 0.0;

        let vx = self.body.velocity.x;
        let speed = vx.abs();

        if self.body.velocity.y >= 0.0 {
            machine.set_state(MotionState::FALL, self);
        }

        self.body.acceleration.x = match self.input.horizontal {
            Some(intent) => {
                let physics = self.physics;
                let accel = if speed >= physics.velocities.max_walk {
                    physics.accelerations.run
                } else if intent.agrees_with(vx) {
                    physics.accelerations.walk
                } else if self.memory.takeoff_speed < physics.air_control.speed_threshold {
                    physics.accelerations.walk
                } else {
                    // after a fast takeoff, turning back mid-air pulls harder
                    physics.air_control.accel
                };
                intent.sign() * accel
            }
            None => 0.0,
        };
    }

    fn jump_enter(&mut self) {
        let takeoff_speed = self.body.velocity.x.abs();
        let stage = self.physics.stage_for_speed(takeoff_speed);
        let vertical = *self.physics.vertical_stage(stage);

        self.memory.takeoff_speed = takeoff_speed;
        self.memory.jump_stage = stage;

        // the fast stage's takeoff exceeds the fall cap; the cap must not eat it
        if stage == JumpStage::Fast {
            self.body.max_velocity.y = self.body.max_velocity.y.max(vertical.initial_velocity);
        }

        self.body.velocity.y = -vertical.initial_velocity;
        self.body.gravity.y = vertical.holding_gravity;
    }

    fn jump_update(&mut self, machine: &mut StateMachine<MotionState>) {
        if !self.input.jump_held() {
            machine.set_state(MotionState::FALL, self);
        }
    }

    fn fall_enter(&mut self) {
        self.body.max_velocity.y = self.physics.downward_velocity_cap;
        self.body.gravity.y = self
            .physics
            .vertical_stage(self.memory.jump_stage)
            .falling_gravity;
    }
}

impl StateHandler<MotionState> for Motion<'_> {
    fn on_enter(&mut self, scope: Scope<MotionState>) {
        match scope {
            Scope::Group(MotionGroup::Ground) => self.ground_enter(),
            Scope::Group(MotionGroup::Air) => {}
            Scope::Leaf(state) => match state {
                MotionState::Ground(GroundState::Walk) => self.walk_enter(),
                MotionState::Ground(GroundState::Run) => self.run_enter(),
                MotionState::Ground(GroundState::RunHysteresis) => self.run_hysteresis_enter(),
                MotionState::Ground(GroundState::Skid) => self.skid_enter(),
                MotionState::Ground(GroundState::Release) => self.release_enter(),
                MotionState::Air(AirState::Jump) => self.jump_enter(),
                MotionState::Air(AirState::Fall) => self.fall_enter(),
                _ => {}
            },
        }
    }

    fn on_update(
        &mut self,
        scope: Scope<MotionState>,
        machine: &mut StateMachine<MotionState>,
        _dt: Duration,
    ) {
        match scope {
            Scope::Group(MotionGroup::Ground) => self.ground_update(machine),
            Scope::Group(MotionGroup::Air) => self.air_update(machine),
            Scope::Leaf(MotionState::Ground(GroundState::Skid)) => self.skid_update(),
            Scope::Leaf(MotionState::Air(AirState::Jump)) => self.jump_update(machine),
            Scope::Leaf(_) => {}
        }
    }
}
