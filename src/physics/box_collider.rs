//! 盒形碰撞体组件
//!
//! 组件保存碰撞体的半尺寸、局部中心和材质属性。附着到 [`PhysicsWorld`] 后，
//! 每次属性真正改变时都会同步到 rapier 碰撞体，并让父刚体重新计算质量分布。
//! 值未改变的设置调用直接返回 `false`，不触碰物理世界。

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::{
    nalgebra, vector, ColliderBuilder, ColliderHandle, Group, InteractionGroups, Isometry,
    RigidBodyHandle, SharedShape,
};

use super::world::{PhysicsBody, PhysicsWorld};
use crate::core::{PhysicsError, PhysicsResult};

/// 每个轴上的最小半尺寸
pub const MIN_BOX_EXTENT: f32 = 0.01;

fn clamp_extents(extents: Vec3) -> Vec3 {
    extents.max(Vec3::splat(MIN_BOX_EXTENT))
}

fn layer_groups(layer: u32) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layer), Group::ALL)
}

/// 盒形碰撞体
#[derive(Component, Debug, Clone)]
pub struct BoxCollider {
    extents: Vec3,
    center: Vec3,
    is_trigger: bool,
    layer: u32,
    friction: f32,
    restitution: f32,
    handle: Option<ColliderHandle>,
    body: Option<RigidBodyHandle>,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

impl BoxCollider {
    /// 以半尺寸创建，每个轴至少为 [`MIN_BOX_EXTENT`]
    pub fn new(extents: Vec3) -> Self {
        Self {
            extents: clamp_extents(extents),
            center: Vec3::ZERO,
            is_trigger: false,
            layer: u32::MAX,
            friction: 0.5,
            restitution: 0.0,
            handle: None,
            body: None,
        }
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_material(mut self, friction: f32, restitution: f32) -> Self {
        self.friction = friction.max(0.0);
        self.restitution = restitution.max(0.0);
        self
    }

    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn handle(&self) -> Option<ColliderHandle> {
        self.handle
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// 在物理世界中创建碰撞体
    ///
    /// `body` 为 `None` 时创建静态碰撞体，此时 `center` 即世界位置。
    /// 已附着的组件会先从旧位置分离。
    pub fn attach(
        &mut self,
        world: &mut PhysicsWorld,
        body: Option<RigidBodyHandle>,
    ) -> PhysicsResult<ColliderHandle> {
        if self.is_attached() {
            self.detach(world);
        }

        let collider = ColliderBuilder::cuboid(self.extents.x, self.extents.y, self.extents.z)
            .translation(vector![self.center.x, self.center.y, self.center.z])
            .sensor(self.is_trigger)
            .collision_groups(layer_groups(self.layer))
            .friction(self.friction)
            .restitution(self.restitution)
            .build();

        let handle = world.add_collider(collider, body)?;
        self.handle = Some(handle);
        self.body = body;

        if let Some(body) = body {
            world.update_mass_distribution(body)?;
        }
        Ok(handle)
    }

    /// 从物理世界移除碰撞体，未附着时返回 `false`
    pub fn detach(&mut self, world: &mut PhysicsWorld) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        let removed = world.remove_collider(handle);
        if let Some(body) = self.body.take() {
            // 刚体可能已被移除
            if let Err(err) = world.update_mass_distribution(body) {
                tracing::debug!(target: "physics", "Skipping mass update after detach: {}", err);
            }
        }
        removed
    }

    /// 设置半尺寸
    pub fn set_extents(&mut self, world: &mut PhysicsWorld, extents: Vec3) -> PhysicsResult<bool> {
        let extents = clamp_extents(extents);
        if extents == self.extents {
            return Ok(false);
        }
        self.extents = extents;

        self.with_native(world, |collider| {
            collider.set_shape(SharedShape::cuboid(extents.x, extents.y, extents.z));
        })?;
        self.sync_mass(world)?;
        Ok(true)
    }

    /// 设置相对父刚体的中心偏移
    pub fn set_center(&mut self, world: &mut PhysicsWorld, center: Vec3) -> PhysicsResult<bool> {
        if center == self.center {
            return Ok(false);
        }
        self.center = center;

        self.with_native(world, |collider| {
            let offset = Isometry::translation(center.x, center.y, center.z);
            if collider.parent().is_some() {
                collider.set_position_wrt_parent(offset);
            } else {
                collider.set_position(offset);
            }
        })?;
        self.sync_mass(world)?;
        Ok(true)
    }

    pub fn set_trigger(&mut self, world: &mut PhysicsWorld, is_trigger: bool) -> PhysicsResult<bool> {
        if is_trigger == self.is_trigger {
            return Ok(false);
        }
        self.is_trigger = is_trigger;
        self.with_native(world, |collider| collider.set_sensor(is_trigger))?;
        Ok(true)
    }

    pub fn set_layer(&mut self, world: &mut PhysicsWorld, layer: u32) -> PhysicsResult<bool> {
        if layer == self.layer {
            return Ok(false);
        }
        self.layer = layer;
        self.with_native(world, |collider| collider.set_collision_groups(layer_groups(layer)))?;
        Ok(true)
    }

    /// 设置摩擦系数和恢复系数，负值被钳制为 0
    pub fn set_material(
        &mut self,
        world: &mut PhysicsWorld,
        friction: f32,
        restitution: f32,
    ) -> PhysicsResult<bool> {
        let friction = friction.max(0.0);
        let restitution = restitution.max(0.0);
        if friction == self.friction && restitution == self.restitution {
            return Ok(false);
        }
        self.friction = friction;
        self.restitution = restitution;

        self.with_native(world, |collider| {
            collider.set_friction(friction);
            collider.set_restitution(restitution);
        })?;
        Ok(true)
    }

    /// 对底层碰撞体执行修改；未附着时只保留组件上的值
    fn with_native(
        &self,
        world: &mut PhysicsWorld,
        apply: impl FnOnce(&mut rapier3d::prelude::Collider),
    ) -> PhysicsResult<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        let collider = world
            .collider_mut(handle)
            .ok_or(PhysicsError::InvalidCollider)?;
        apply(collider);
        world.collider_changed(handle);
        Ok(())
    }

    fn sync_mass(&self, world: &mut PhysicsWorld) -> PhysicsResult<()> {
        match (self.handle, self.body) {
            (Some(_), Some(body)) => world.update_mass_distribution(body),
            _ => Ok(()),
        }
    }
}

/// 为尚未附着的盒形碰撞体创建 rapier 碰撞体，实体带有 [`PhysicsBody`] 时附着到该刚体
pub fn attach_box_colliders_system(
    mut physics: ResMut<PhysicsWorld>,
    mut query: Query<(Entity, &mut BoxCollider, Option<&PhysicsBody>)>,
) {
    for (entity, mut collider, body) in query.iter_mut() {
        if collider.is_attached() {
            continue;
        }

        if let Err(err) = collider.attach(&mut physics, body.map(|b| b.handle)) {
            tracing::warn!(target: "physics", "Failed to attach box collider for {:?}: {}", entity, err);
        }
    }
}
