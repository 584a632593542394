//! Decorative particle effects for a 2D surface: blossoms falling from the
//! top, and hearts rising from the bottom that burst into confetti when they
//! touch, reach their burst altitude, or get clicked.
//!
//! The crate only simulates. Painting goes through [`Canvas`], frame
//! scheduling through [`FrameScheduler`], and the host supplies timestamps.

pub mod animation;
pub mod blossom;
pub mod cluster;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod explode;
pub mod hearts;
pub mod particle;
pub mod spawn;
pub mod step;
pub mod store;

pub use animation::{Animation, FrameHandle, FrameScheduler, State, Surface};
pub use blossom::BlossomEffect;
pub use cluster::{find_clusters, find_clusters_brute_force, touching};
pub use color::Color;
pub use config::{AnimationConfig, BlossomConfig, ConfettiConfig, CountSpan, HeartConfig, Span};
pub use effect::{Canvas, Effect};
pub use error::{Error, Result};
pub use explode::explode;
pub use hearts::HeartEffect;
pub use particle::{Blossom, Bounds, Confetti, Heart, Kind, Particle, Petal, Stamen};
pub use spawn::{SpawnTimer, spawn_blossom, spawn_heart};
pub use step::{StepContext, StepMode, step, step_all};
pub use store::{ParticleStore, is_alive};
