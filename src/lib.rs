//! # Scene Runtime
//!
//! Scene-level runtime components built on `bevy_ecs`: particle systems with
//! plane and world collisions, rapier-backed box colliders, script bindings,
//! GUI widgets and audio sources.
//!
//! ## Features
//!
//! - **Particles**: SoA particle storage, pluggable evolvers (texture animation, collisions)
//! - **Physics**: Box colliders and collision queries on top of Rapier 3D
//! - **Scripting**: Function registry with collider bindings
//! - **UI**: GUI widget component with dirty tracking and hit testing
//! - **Audio**: Audio source playback state
//!
//! ### Example
//!
//! ```rust
//! use bevy_ecs::prelude::*;
//! use scene_runtime::ecs::{Time, Transform};
//! use scene_runtime::particles::{particle_system_update_system, ParticleSystem, ParticleSystemSettings};
//! use glam::Vec3;
//!
//! let mut world = World::new();
//! world.insert_resource(Time::default());
//!
//! let mut system = ParticleSystem::new(ParticleSystemSettings::default());
//! system.emit_burst(16, Vec3::ZERO, 2.0, 1.0);
//! world.spawn((Transform::default(), system));
//!
//! let mut schedule = Schedule::default();
//! schedule.add_systems(particle_system_update_system);
//! world.resource_mut::<Time>().advance(1.0 / 60.0);
//! schedule.run(&mut world);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and shared macros
//! - [`config`]: Runtime configuration
//! - [`particles`]: Particle simulation
//! - [`physics`]: Physics world and colliders
//! - [`scripting`]: Script API and bindings
//! - [`ui`]: GUI widgets
//! - [`audio`]: Audio sources

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Entity Component System shared components and resources
pub mod ecs;
/// Geometry helpers
pub mod math;
/// Resource handles and asset data
pub mod resources;
/// Particle systems and evolvers
pub mod particles;
/// Physics simulation using Rapier
pub mod physics;
/// Scripting API for game logic
pub mod scripting;
/// UI widgets
pub mod ui;
/// Audio sources
pub mod audio;
