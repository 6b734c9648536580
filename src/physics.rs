use std::time::Duration;

use crate::constants::{
    self, accelerations, air, decelerations, velocities, vertical, FRAME_RATE,
    ORIGINAL_PIXELS_PER_TILE,
};
use crate::error::Error;

// 16^3: a fixed-point value's top nibble group is whole tiles, three nibbles above pixels' 1/16ths.
const FIXED_POINT_DIVISOR: f64 = 4096.0;

// ---------------------------------------------------------------------------------------------------------------------

/// A distance/velocity in nested sixteenths of a tile, as authored in the original game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(u32);

impl FixedPoint {
    pub const fn new(raw: u32) -> Self {
        FixedPoint(raw)
    }

    /// Converts a per-frame fixed-point velocity to pixels per second, where `scale` is the
    /// ratio of target pixels-per-tile to the original 16.
    pub fn to_velocity(self, scale: f64) -> f32 {
        (f64::from(self.0) * f64::from(FRAME_RATE) * scale / FIXED_POINT_DIVISOR) as f32
    }

    /// Converts a per-frame-squared fixed-point acceleration to pixels per second². Only the
    /// frame rate is squared; `scale` stays linear.
    pub fn to_acceleration(self, scale: f64) -> f32 {
        let frame_rate = f64::from(FRAME_RATE);
        (f64::from(self.0) * frame_rate * frame_rate * scale / FIXED_POINT_DIVISOR) as f32
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Velocities {
    pub min_walk: f32,
    pub max_walk: f32,
    pub max_walk_underwater: f32,
    pub max_walk_level_entry: f32,
    pub max_run: f32,
    pub skid_turnaround: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accelerations {
    pub walk: f32,
    pub run: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decelerations {
    pub release: f32,
    pub skid: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalStage {
    /// Takeoff speeds strictly below this select the stage. The last stage has no bound.
    pub max_entry_speed: Option<f32>,
    /// Upward speed at takeoff (applied as a negative y velocity)
    pub initial_velocity: f32,
    pub holding_gravity: f32,
    pub falling_gravity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AirControl {
    pub speed_threshold: f32,
    pub accel: f32,
}

/// The three takeoff-speed buckets a jump can fall into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JumpStage {
    Slow,
    Medium,
    Fast,
}

impl Default for JumpStage {
    fn default() -> Self {
        JumpStage::Slow
    }
}

impl JumpStage {
    pub const ALL: [JumpStage; 3] = [JumpStage::Slow, JumpStage::Medium, JumpStage::Fast];

    pub fn index(&self) -> usize {
        match self {
            JumpStage::Slow => 0,
            JumpStage::Medium => 1,
            JumpStage::Fast => 2,
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Every motion constant the controller uses, converted from the fixed-point source table into
/// pixels/second and pixels/second² for a given tile size. Built once, then shared read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsTable {
    pub pixels_per_tile: f32,
    pub velocities: Velocities,
    pub accelerations: Accelerations,
    pub decelerations: Decelerations,
    pub vertical_stages: [VerticalStage; 3],
    pub downward_velocity_cap: f32,
    pub air_control: AirControl,
    pub run_hysteresis_duration: Duration,
}

impl Default for PhysicsTable {
    fn default() -> Self {
        Self::from_pixels_per_tile(constants::DEFAULT_PIXELS_PER_TILE)
    }
}

impl PhysicsTable {
    pub fn new(pixels_per_tile: f32) -> Result<Self, Error> {
        if !pixels_per_tile.is_finite() || pixels_per_tile <= 0.0 {
            return Err(Error::InvalidPixelsPerTile(pixels_per_tile));
        }
        Ok(Self::from_pixels_per_tile(pixels_per_tile))
    }

    fn from_pixels_per_tile(pixels_per_tile: f32) -> Self {
        let scale = f64::from(pixels_per_tile) / f64::from(ORIGINAL_PIXELS_PER_TILE);
        let velocity = |v: FixedPoint| v.to_velocity(scale);
        let acceleration = |a: FixedPoint| a.to_acceleration(scale);

        let table = Self {
            pixels_per_tile,
            velocities: Velocities {
                min_walk: velocity(velocities::MIN_WALK),
                max_walk: velocity(velocities::MAX_WALK),
                max_walk_underwater: velocity(velocities::MAX_WALK_UNDERWATER),
                max_walk_level_entry: velocity(velocities::MAX_WALK_LEVEL_ENTRY),
                max_run: velocity(velocities::MAX_RUN),
                skid_turnaround: velocity(velocities::SKID_TURNAROUND),
            },
            accelerations: Accelerations {
                walk: acceleration(accelerations::WALK),
                run: acceleration(accelerations::RUN),
            },
            decelerations: Decelerations {
                release: acceleration(decelerations::RELEASE),
                skid: acceleration(decelerations::SKID),
            },
            vertical_stages: [
                VerticalStage {
                    max_entry_speed: Some(velocity(vertical::STAGE_0_MAX_ENTRY_SPEED)),
                    initial_velocity: velocity(vertical::STAGE_0_INITIAL_VELOCITY),
                    holding_gravity: acceleration(vertical::STAGE_0_HOLDING_GRAVITY),
                    falling_gravity: acceleration(vertical::STAGE_0_FALLING_GRAVITY),
                },
                VerticalStage {
                    max_entry_speed: Some(velocity(vertical::STAGE_1_MAX_ENTRY_SPEED)),
                    initial_velocity: velocity(vertical::STAGE_1_INITIAL_VELOCITY),
                    holding_gravity: acceleration(vertical::STAGE_1_HOLDING_GRAVITY),
                    falling_gravity: acceleration(vertical::STAGE_1_FALLING_GRAVITY),
                },
                VerticalStage {
                    max_entry_speed: None,
                    initial_velocity: velocity(vertical::STAGE_2_INITIAL_VELOCITY),
                    holding_gravity: acceleration(vertical::STAGE_2_HOLDING_GRAVITY),
                    falling_gravity: acceleration(vertical::STAGE_2_FALLING_GRAVITY),
                },
            ],
            downward_velocity_cap: velocity(vertical::DOWNWARD_MAX),
            air_control: AirControl {
                speed_threshold: velocity(air::SPEED_THRESHOLD),
                accel: acceleration(air::SNAP_BACK),
            },
            run_hysteresis_duration: Duration::from_secs_f64(
                f64::from(constants::RUN_HYSTERESIS_FRAMES) / f64::from(FRAME_RATE),
            ),
        };

        log::trace!("PhysicsTable[{} px/tile]: {:?}", pixels_per_tile, table);
        table
    }

    pub fn vertical_stage(&self, stage: JumpStage) -> &VerticalStage {
        match stage {
            JumpStage::Slow => &self.vertical_stages[0],
            JumpStage::Medium => &self.vertical_stages[1],
            JumpStage::Fast => &self.vertical_stages[2],
        }
    }

    /// Picks the jump stage for a takeoff at `speed` (absolute horizontal velocity).
    pub fn stage_for_speed(&self, speed: f32) -> JumpStage {
        JumpStage::ALL
            .iter()
            .copied()
            .find(|stage| match self.vertical_stage(*stage).max_entry_speed {
                Some(bound) => speed < bound,
                None => true,
            })
            .unwrap_or(JumpStage::Fast)
    }
}

// ---------------------------------------------------------------------------------------------------------------------
