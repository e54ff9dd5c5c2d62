use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::parry::bounding_volume::Aabb as RapierAabb;
use rapier3d::prelude::{
    nalgebra, point, vector, CCDSolver, Collider, ColliderHandle, ColliderSet, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryPipeline, Real, RigidBody, RigidBodyHandle, RigidBodySet, Vector,
};

use super::box_collider::BoxCollider;
use super::query::{CollisionQuery, PhysicsQueryHit};
use crate::core::{PhysicsError, PhysicsResult};
use crate::ecs::{Time, Transform};
use crate::impl_default;
use crate::math::{Aabb, Ray};

// --- Components ---

/// 实体对应的刚体
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub handle: RigidBodyHandle,
}

// --- Resources ---

/// rapier3d 物理世界
///
/// 通过本类型的方法增删碰撞体时，查询结构会随之刷新；
/// 直接修改 `collider_set` 后需要调用 [`PhysicsWorld::update_queries`]。
#[derive(Resource)]
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
}

impl_default!(PhysicsWorld {
    gravity: vector![0.0, -9.81, 0.0],
    integration_parameters: IntegrationParameters::default(),
    physics_pipeline: PhysicsPipeline::new(),
    island_manager: IslandManager::new(),
    broad_phase: DefaultBroadPhase::new(),
    narrow_phase: NarrowPhase::new(),
    impulse_joint_set: ImpulseJointSet::new(),
    multibody_joint_set: MultibodyJointSet::new(),
    ccd_solver: CCDSolver::new(),
    rigid_body_set: RigidBodySet::new(),
    collider_set: ColliderSet::new(),
    query_pipeline: QueryPipeline::new(),
});

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = vector![gravity.x, gravity.y, gravity.z];
        self
    }

    /// 推进一步模拟
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt.max(0.001);
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// 重建场景查询结构
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    pub fn add_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// 添加碰撞体，`parent` 为 `None` 时碰撞体固定在世界中
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent: Option<RigidBodyHandle>,
    ) -> PhysicsResult<ColliderHandle> {
        let handle = match parent {
            Some(body) => {
                if !self.rigid_body_set.contains(body) {
                    return Err(PhysicsError::InvalidRigidBody);
                }
                self.collider_set
                    .insert_with_parent(collider, body, &mut self.rigid_body_set)
            }
            None => self.collider_set.insert(collider),
        };

        self.update_queries();
        tracing::debug!(target: "physics", "Added collider {:?} (parent: {:?})", handle, parent);
        Ok(handle)
    }

    /// 把盒形碰撞体组件附着到本世界，见 [`BoxCollider::attach`]
    pub fn attach_box_collider(
        &mut self,
        collider: &mut BoxCollider,
        body: Option<RigidBodyHandle>,
    ) -> PhysicsResult<ColliderHandle> {
        collider.attach(self, body)
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let removed = self
            .collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .is_some();

        if removed {
            self.update_queries();
        }
        removed
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// 碰撞体形状或局部位置改变后调用
    ///
    /// 立即根据父刚体更新碰撞体的世界位置并刷新查询结构，不必等到下一次 `step`。
    pub fn collider_changed(&mut self, handle: ColliderHandle) {
        let pose = self.collider_set.get(handle).and_then(|collider| {
            let parent = self.rigid_body_set.get(collider.parent()?)?;
            Some(*parent.position() * *collider.position_wrt_parent()?)
        });

        if let (Some(pose), Some(collider)) = (pose, self.collider_set.get_mut(handle)) {
            collider.set_position(pose);
        }
        self.update_queries();
    }

    /// 根据附着的碰撞体重新计算刚体质量属性
    pub fn update_mass_distribution(&mut self, body: RigidBodyHandle) -> PhysicsResult<()> {
        let rigid_body = self
            .rigid_body_set
            .get_mut(body)
            .ok_or(PhysicsError::InvalidRigidBody)?;
        rigid_body.recompute_mass_properties_from_colliders(&self.collider_set);
        Ok(())
    }
}

impl CollisionQuery for PhysicsWorld {
    fn box_overlap(&self, bounds: &Aabb, layer: u32) -> Vec<ColliderHandle> {
        let aabb = RapierAabb::new(
            point![bounds.min.x, bounds.min.y, bounds.min.z],
            point![bounds.max.x, bounds.max.y, bounds.max.z],
        );

        let mut handles = Vec::new();
        self.query_pipeline
            .colliders_with_aabb_intersecting_aabb(&aabb, |handle| {
                if let Some(collider) = self.collider_set.get(*handle) {
                    // 触发器不参与粒子碰撞
                    let memberships = collider.collision_groups().memberships.bits();
                    if !collider.is_sensor() && memberships & layer != 0 {
                        handles.push(*handle);
                    }
                }
                true
            });

        handles
    }

    fn raycast_collider(
        &self,
        collider: ColliderHandle,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<PhysicsQueryHit> {
        let target = self.collider_set.get(collider)?;
        let rapier_ray = rapier3d::prelude::Ray::new(
            point![ray.origin.x, ray.origin.y, ray.origin.z],
            vector![ray.direction.x, ray.direction.y, ray.direction.z],
        );

        let hit = target.shape().cast_ray_and_get_normal(
            target.position(),
            &rapier_ray,
            max_distance,
            true,
        )?;

        let point = rapier_ray.point_at(hit.time_of_impact);
        Some(PhysicsQueryHit {
            point: Vec3::new(point.x, point.y, point.z),
            normal: Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z),
            distance: hit.time_of_impact,
            collider,
        })
    }
}

// --- Systems ---

pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>, time: Res<Time>) {
    physics.step(time.delta_seconds);
}

pub fn sync_physics_to_transform_system(
    physics: Res<PhysicsWorld>,
    mut query: Query<(&PhysicsBody, &mut Transform)>,
) {
    for (body, mut transform) in query.iter_mut() {
        if let Some(rb) = physics.rigid_body_set.get(body.handle) {
            let pos = rb.translation();
            let rot = rb.rotation();

            transform.pos = Vec3::new(pos.x, pos.y, pos.z);
            transform.rot = glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w);
        }
    }
}
