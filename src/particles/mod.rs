//! 粒子模块
//!
//! CPU 粒子模拟：粒子以 SoA 布局存放在 [`ParticleSet`] 中，
//! 每帧由 [`ParticleSystem`] 积分后交给一组 [`ParticleEvolver`] 原地修改。
//!
//! 内置演化器：
//! - [`ParticleTextureAnimation`]：按生命进度选择精灵图集帧
//! - [`ParticleCollisions`]：与平面或场景碰撞体碰撞
//!
//! ## 使用示例
//!
//! ```rust
//! use glam::Vec3;
//! use scene_runtime::ecs::Transform;
//! use scene_runtime::math::Plane;
//! use scene_runtime::particles::{
//!     ParticleCollisions, ParticleCollisionsDesc, ParticleSpawn, ParticleSystem,
//! };
//!
//! let mut system = ParticleSystem::default().with_evolver(Box::new(
//!     ParticleCollisions::new(ParticleCollisionsDesc::default())
//!         .with_planes(vec![Plane::new(Vec3::Y, 0.0)]),
//! ));
//! system.spawn(ParticleSpawn::new(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.0, -1.0, 0.0), 2.0, 0));
//! system.step(0.1, &Transform::default(), None);
//!
//! assert!(system.particles().particles().velocity[0].y > 0.0);
//! ```

pub mod collisions;
pub mod evolver;
pub mod random;
pub mod set;
pub mod state;
pub mod system;
pub mod texture_animation;


pub use collisions::{
    collision_response, group_raycast, ParticleCollisionMode, ParticleCollisions,
    ParticleCollisionsDesc, ParticleHitInfo,
};
pub use evolver::{EvolverDesc, ParticleEvolver};
pub use random::Random;
pub use set::{ParticleSet, ParticleSetData, ParticleSpawn};
pub use state::ParticleSystemState;
pub use system::{particle_system_update_system, ParticleSystem, ParticleSystemSettings};
pub use texture_animation::{ParticleTextureAnimation, ParticleTextureAnimationDesc};
