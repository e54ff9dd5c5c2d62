//! 物理模块
//!
//! 基于 rapier3d：
//! - `world` - 物理世界资源与步进系统
//! - `box_collider` - 盒形碰撞体组件
//! - `query` - 供粒子碰撞使用的查询接口

pub mod box_collider;
pub mod query;
pub mod world;

pub use box_collider::{attach_box_colliders_system, BoxCollider, MIN_BOX_EXTENT};
pub use query::{CollisionQuery, PhysicsQueryHit};
pub use world::{physics_step_system, sync_physics_to_transform_system, PhysicsBody, PhysicsWorld};
