//! 物理查询接口
//!
//! 粒子碰撞只依赖这里的查询接口，不直接访问物理世界。

use glam::Vec3;
use rapier3d::prelude::ColliderHandle;

use crate::math::{Aabb, Ray};

/// 射线命中信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsQueryHit {
    /// 命中点
    pub point: Vec3,
    /// 命中点表面法线
    pub normal: Vec3,
    /// 沿射线的距离
    pub distance: f32,
    /// 被命中的碰撞体
    pub collider: ColliderHandle,
}

/// 碰撞查询
pub trait CollisionQuery {
    /// 查找包围盒与 `bounds` 重叠、且属于 `layer` 任一层的碰撞体
    fn box_overlap(&self, bounds: &Aabb, layer: u32) -> Vec<ColliderHandle>;

    /// 对单个碰撞体做射线检测，超过 `max_distance` 的命中被忽略
    fn raycast_collider(
        &self,
        collider: ColliderHandle,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<PhysicsQueryHit>;
}
