//! Meteor-defense runtime core
//!
//! Procedurally spawns meteors on a perimeter above a defended point, aims
//! them (with controlled randomness) at the origin, and tracks them until
//! impact or expiry, while a session state machine keeps score, lives, wave,
//! and difficulty bookkeeping consistent across mode switches.

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod impact;
pub mod profile;
pub mod registry;
pub mod session;
pub mod spawner;
