use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::Error;
use crate::state_machine::State;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionGroup {
    Ground,
    Air,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroundState {
    Root,
    Idle,
    Walk,
    Run,
    RunHysteresis,
    Skid,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AirState {
    Root,
    Jump,
    Fall,
}

/// The character's motion state: a leaf within either the ground or the air group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionState {
    Ground(GroundState),
    Air(AirState),
}

impl MotionState {
    pub const GROUND: MotionState = MotionState::Ground(GroundState::Root);
    pub const IDLE: MotionState = MotionState::Ground(GroundState::Idle);
    pub const WALK: MotionState = MotionState::Ground(GroundState::Walk);
    pub const RUN: MotionState = MotionState::Ground(GroundState::Run);
    pub const RUN_HYSTERESIS: MotionState = MotionState::Ground(GroundState::RunHysteresis);
    pub const SKID: MotionState = MotionState::Ground(GroundState::Skid);
    pub const RELEASE: MotionState = MotionState::Ground(GroundState::Release);
    pub const AIR: MotionState = MotionState::Air(AirState::Root);
    pub const JUMP: MotionState = MotionState::Air(AirState::Jump);
    pub const FALL: MotionState = MotionState::Air(AirState::Fall);

    pub const ALL: [MotionState; 10] = [
        MotionState::GROUND,
        MotionState::IDLE,
        MotionState::WALK,
        MotionState::RUN,
        MotionState::RUN_HYSTERESIS,
        MotionState::SKID,
        MotionState::RELEASE,
        MotionState::AIR,
        MotionState::JUMP,
        MotionState::FALL,
    ];

    pub fn motion_group(&self) -> MotionGroup {
        match self {
            MotionState::Ground(_) => MotionGroup::Ground,
            MotionState::Air(_) => MotionGroup::Air,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.motion_group() == MotionGroup::Ground
    }

    /// Qualified name, e.g. "ground.walk"; a group root is just the group name.
    pub fn name(&self) -> &'static str {
        match self {
            MotionState::Ground(GroundState::Root) => "ground",
            MotionState::Ground(GroundState::Idle) => "ground.idle",
            MotionState::Ground(GroundState::Walk) => "ground.walk",
            MotionState::Ground(GroundState::Run) => "ground.run",
            MotionState::Ground(GroundState::RunHysteresis) => "ground.run_hysteresis",
            MotionState::Ground(GroundState::Skid) => "ground.skid",
            MotionState::Ground(GroundState::Release) => "ground.release",
            MotionState::Air(AirState::Root) => "air",
            MotionState::Air(AirState::Jump) => "air.jump",
            MotionState::Air(AirState::Fall) => "air.fall",
        }
    }
}

impl State for MotionState {
    type Group = MotionGroup;

    fn group(&self) -> Option<MotionGroup> {
        Some(self.motion_group())
    }

    fn is_group_root(&self) -> bool {
        matches!(
            self,
            MotionState::Ground(GroundState::Root) | MotionState::Air(AirState::Root)
        )
    }
}

impl Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MotionState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MotionState::ALL
            .iter()
            .copied()
            .find(|state| state.name() == s)
            .ok_or_else(|| Error::UnknownState(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_group_qualified() {
        assert_eq!(MotionState::RUN_HYSTERESIS.to_string(), "ground.run_hysteresis");
        assert_eq!(MotionState::AIR.to_string(), "air");
        assert_eq!("air.fall".parse::<MotionState>(), Ok(MotionState::FALL));
        assert_eq!(
            "air.walk".parse::<MotionState>(),
            Err(Error::UnknownState("air.walk".to_string()))
        );
    }

    #[test]
    fn roots_belong_to_their_group() {
        assert!(MotionState::GROUND.is_group_root());
        assert_eq!(MotionState::GROUND.group(), Some(MotionGroup::Ground));
        assert_eq!(MotionState::AIR.group(), Some(MotionGroup::Air));
        assert!(!MotionState::SKID.is_group_root());
        assert!(MotionState::SKID.is_grounded());
        assert!(!MotionState::JUMP.is_grounded());
    }
}
