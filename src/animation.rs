use crate::{
    controller::{AirState, GroundState, MotionState},
    input::HorizontalDir,
    physics::PhysicsTable,
};

pub const CYCLE_IDLE: &str = "idle";
pub const CYCLE_WALK: &str = "walk";
pub const CYCLE_RUN: &str = "run";
pub const CYCLE_SKID: &str = "skid";
pub const CYCLE_JUMP: &str = "jump";

/// What a sprite should do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Play(&'static str),
    // keep showing whatever frame is up
    Hold,
}

/// Picks the display cycle for a motion state at a given horizontal velocity.
pub fn select_cycle(state: MotionState, velocity_x: f32, physics: &PhysicsTable) -> Playback {
    match state {
        MotionState::Ground(GroundState::Idle) => Playback::Play(CYCLE_IDLE),
        MotionState::Ground(GroundState::Walk)
        | MotionState::Ground(GroundState::Run)
        | MotionState::Ground(GroundState::RunHysteresis)
        | MotionState::Ground(GroundState::Release) => {
            if velocity_x.abs() < physics.velocities.max_run - 1.0 {
                Playback::Play(CYCLE_WALK)
            } else {
                Playback::Play(CYCLE_RUN)
            }
        }
        MotionState::Ground(GroundState::Skid) => Playback::Play(CYCLE_SKID),
        MotionState::Air(AirState::Jump) => Playback::Play(CYCLE_JUMP),
        MotionState::Ground(GroundState::Root)
        | MotionState::Air(AirState::Root)
        | MotionState::Air(AirState::Fall) => Playback::Hold,
    }
}

/// Tracks the cycle and facing a sprite should display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    // The current display cycle, one of the CYCLE_* constants.
    pub cycle: &'static str,
    pub facing: HorizontalDir,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            cycle: CYCLE_IDLE,
            facing: HorizontalDir::East,
        }
    }
}

impl Presentation {
    /// Updates cycle and facing for this tick. Facing only changes on the ground, so a
    /// character keeps facing its takeoff direction while steering in the air.
    pub fn update(&mut self, state: MotionState, velocity_x: f32, physics: &PhysicsTable) {
        if let Playback::Play(cycle) = select_cycle(state, velocity_x, physics) {
            self.cycle = cycle;
        }

        if state.is_grounded() {
            if let Some(dir) = HorizontalDir::of_velocity(velocity_x) {
                self.facing = dir;
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_cycles_split_at_run_speed() {
        let physics = PhysicsTable::default();
        let max_run = physics.velocities.max_run;

        assert_eq!(
            select_cycle(MotionState::IDLE, 0.0, &physics),
            Playback::Play(CYCLE_IDLE)
        );
        assert_eq!(
            select_cycle(MotionState::RUN, max_run - 2.0, &physics),
            Playback::Play(CYCLE_WALK)
        );
        assert_eq!(
            select_cycle(MotionState::RUN_HYSTERESIS, -max_run, &physics),
            Playback::Play(CYCLE_RUN)
        );
        assert_eq!(
            select_cycle(MotionState::SKID, 100.0, &physics),
            Playback::Play(CYCLE_SKID)
        );
        assert_eq!(
            select_cycle(MotionState::JUMP, 0.0, &physics),
            Playback::Play(CYCLE_JUMP)
        );
        assert_eq!(select_cycle(MotionState::FALL, 0.0, &physics), Playback::Hold);
    }

    #[test]
    fn facing_only_turns_on_the_ground() {
        let physics = PhysicsTable::default();
        let mut presentation = Presentation::default();

        presentation.update(MotionState::WALK, -50.0, &physics);
        assert_eq!(presentation.facing, HorizontalDir::West);
        assert_eq!(presentation.cycle, CYCLE_WALK);

        presentation.update(MotionState::JUMP, 80.0, &physics);
        assert_eq!(presentation.facing, HorizontalDir::West);
        assert_eq!(presentation.cycle, CYCLE_JUMP);

        // falling holds the jump frame
        presentation.update(MotionState::FALL, 80.0, &physics);
        assert_eq!(presentation.cycle, CYCLE_JUMP);

        presentation.update(MotionState::IDLE, 0.0, &physics);
        assert_eq!(presentation.facing, HorizontalDir::West);
        assert_eq!(presentation.cycle, CYCLE_IDLE);
    }
}
