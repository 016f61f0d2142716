//! Space Glide - a side-scrolling terminal space shooter.
//!
//! Core modules:
//! - `entities`: the four entity kinds and their shared contract
//! - `registry`: the live entity collection
//! - `collision`: projectile vs craft resolution
//! - `compute`: input-driven transitions and spawn policy
//! - `scheduler`: periodic timer multiplexing
//! - `session`: session state, tick loop and outcomes
//! - `surface`: drawing surface abstraction and in-memory canvas
//! - `playfield`: the scrolling starfield background
//! - `profile`: character, level and control configuration

pub mod collision;
pub mod compute;
pub mod entities;
pub mod error;
pub mod playfield;
pub mod profile;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod surface;

pub use error::{ConfigError, GlideError, Result};
pub use session::{Outcome, Session, Summary};
