//! Super Mario Bros. style ground and air motion for a platformer character.
//!
//! [`physics::PhysicsTable`] converts the classic fixed-point motion constants to pixels and
//! seconds at a chosen tile size, [`state_machine::StateMachine`] is a small generic two-level
//! state engine, and [`controller::MotionController`] uses both to steer a
//! [`body::KinematicBody`] from per-tick input.

pub mod animation;
pub mod body;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod physics;
pub mod simulation;
pub mod state_machine;

pub use error::Error;
