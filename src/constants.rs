// These constants were read off the original game's player physics chart.
// Values are fixed-point: each hex digit is 1/16 of the one above it, i.e.
// tiles, pixels, sub-pixels, sub-sub-pixels, sub-sub-sub-pixels. Velocities are
// per-frame and accelerations per-frame-squared at FRAME_RATE.

use crate::physics::FixedPoint;

pub const FRAME_RATE: u32 = 0x3c;
pub const ORIGINAL_PIXELS_PER_TILE: f32 = 16.0;
pub const DEFAULT_PIXELS_PER_TILE: f32 = 32.0;

// After letting go of run, the character keeps run-tier speed for this many frames.
pub const RUN_HYSTERESIS_FRAMES: u32 = 10;

pub mod velocities {
    use super::FixedPoint;

    pub const MIN_WALK: FixedPoint = FixedPoint::new(0x0130);
    pub const MAX_WALK: FixedPoint = FixedPoint::new(0x1900);
    pub const MAX_WALK_UNDERWATER: FixedPoint = FixedPoint::new(0x1100);
    pub const MAX_WALK_LEVEL_ENTRY: FixedPoint = FixedPoint::new(0x0d00);
    pub const MAX_RUN: FixedPoint = FixedPoint::new(0x2900);
    pub const SKID_TURNAROUND: FixedPoint = FixedPoint::new(0x0900);
}

pub mod accelerations {
    use super::FixedPoint;

    pub const WALK: FixedPoint = FixedPoint::new(0x0098);
    pub const RUN: FixedPoint = FixedPoint::new(0x00e4);
}

pub mod decelerations {
    use super::FixedPoint;

    pub const RELEASE: FixedPoint = FixedPoint::new(0x00d0);
    pub const SKID: FixedPoint = FixedPoint::new(0x01a0);
}

pub mod vertical {
    use super::FixedPoint;

    // Takeoff below this horizontal speed uses stage 0
    pub const STAGE_0_MAX_ENTRY_SPEED: FixedPoint = FixedPoint::new(0x1000);
    pub const STAGE_0_INITIAL_VELOCITY: FixedPoint = FixedPoint::new(0x4000);
    pub const STAGE_0_HOLDING_GRAVITY: FixedPoint = FixedPoint::new(0x0200);
    pub const STAGE_0_FALLING_GRAVITY: FixedPoint = FixedPoint::new(0x0700);

    pub const STAGE_1_MAX_ENTRY_SPEED: FixedPoint = FixedPoint::new(0x24ff);
    pub const STAGE_1_INITIAL_VELOCITY: FixedPoint = FixedPoint::new(0x4000);
    pub const STAGE_1_HOLDING_GRAVITY: FixedPoint = FixedPoint::new(0x01e0);
    pub const STAGE_1_FALLING_GRAVITY: FixedPoint = FixedPoint::new(0x0600);

    // Stage 2 catches everything faster; its initial velocity exceeds DOWNWARD_MAX.
    pub const STAGE_2_INITIAL_VELOCITY: FixedPoint = FixedPoint::new(0x5000);
    pub const STAGE_2_HOLDING_GRAVITY: FixedPoint = FixedPoint::new(0x0280);
    pub const STAGE_2_FALLING_GRAVITY: FixedPoint = FixedPoint::new(0x0900);

    pub const DOWNWARD_MAX: FixedPoint = FixedPoint::new(0x4800);
}

pub mod air {
    use super::FixedPoint;

    // Reversing mid-air below max walk speed after a takeoff at or above this speed
    // uses SNAP_BACK instead of the walk acceleration.
    pub const SPEED_THRESHOLD: FixedPoint = FixedPoint::new(0x1d00);
    pub const SNAP_BACK: FixedPoint = FixedPoint::new(0x00d0);
}
