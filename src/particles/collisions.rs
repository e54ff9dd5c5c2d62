//! 粒子碰撞
//!
//! 两种模式：
//! - **Plane**：与一组固定平面碰撞。粒子距平面小于半径时，沿速度方向回溯求出接触点。
//! - **World**：与场景碰撞体碰撞。用上一帧位置到当前位置的线段做批量射线检测，
//!   每个粒子只响应最近的命中。
//!
//! 每次碰撞都会按 `lifetime_loss` 扣除粒子的一部分初始生命。

use std::borrow::Cow;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::evolver::ParticleEvolver;
use super::random::Random;
use super::set::ParticleSet;
use super::state::ParticleSystemState;
use crate::impl_default;
use crate::math::{self, Aabb, LineSegment3, Plane, Ray};
use crate::physics::{CollisionQuery, PhysicsQueryHit};

/// 碰撞模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleCollisionMode {
    /// 与用户提供的平面碰撞
    #[default]
    Plane,
    /// 与场景中的碰撞体碰撞
    World,
}

/// 碰撞参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCollisionsDesc {
    /// 碰撞模式
    pub mode: ParticleCollisionMode,
    /// 恢复系数：1 为完全弹性反弹，0 为贴着表面滑行。不小于 0
    pub restitution: f32,
    /// 阻尼：碰撞后损失的速度比例，范围 `[0, 1]`
    pub dampening: f32,
    /// 每次碰撞损失的生命占初始生命的比例，范围 `[0, 1]`
    pub lifetime_loss: f32,
    /// 粒子碰撞半径，仅平面模式使用。不小于 0
    pub radius: f32,
    /// 世界模式下参与碰撞的层掩码
    pub layer: u32,
}

impl_default!(ParticleCollisionsDesc {
    mode: ParticleCollisionMode::Plane,
    restitution: 1.0,
    dampening: 0.5,
    lifetime_loss: 0.0,
    radius: 0.01,
    layer: u32::MAX,
});

impl ParticleCollisionsDesc {
    /// 把参数钳制到有效范围
    pub fn clamped(mut self) -> Self {
        self.restitution = self.restitution.max(0.0);
        self.dampening = self.dampening.clamp(0.0, 1.0);
        self.lifetime_loss = self.lifetime_loss.clamp(0.0, 1.0);
        self.radius = self.radius.max(0.0);
        self
    }
}

/// 单个粒子的碰撞信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleHitInfo {
    /// 接触点
    pub position: Vec3,
    /// 接触面法线
    pub normal: Vec3,
    /// 粒子索引
    pub index: usize,
}

/// 计算碰撞后的位置和速度
///
/// 先沿法线反射穿透量与速度并按阻尼缩放，再按恢复系数削减法线方向分量。
pub fn collision_response(
    position: &mut Vec3,
    velocity: &mut Vec3,
    hit: &ParticleHitInfo,
    desc: &ParticleCollisionsDesc,
) {
    let diff = *position - hit.position;

    // 反射并衰减
    let dampen_factor = 1.0 - desc.dampening;
    let mut reflected_pos = math::reflect(diff, hit.normal) * dampen_factor;
    let mut reflected_vel = math::reflect(*velocity, hit.normal) * dampen_factor;

    // 反弹
    let restitution_factor = 1.0 - desc.restitution;
    reflected_pos -= hit.normal * reflected_pos.dot(hit.normal) * restitution_factor;
    reflected_vel -= hit.normal * reflected_vel.dot(hit.normal) * restitution_factor;

    *position = hit.position + reflected_pos;
    *velocity = reflected_vel;
}

/// 批量射线检测
///
/// 先用所有线段的合并包围盒查询可能相交的碰撞体，再对每条线段逐一检测这些碰撞体，
/// 保留最近的命中。长度为 0 的线段被跳过。返回的命中中 `index` 为线段索引。
pub fn group_raycast(
    segments: &[LineSegment3],
    query: &dyn CollisionQuery,
    layer: u32,
) -> Vec<ParticleHitInfo> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut group_bounds = Aabb::EMPTY;
    for segment in segments {
        group_bounds.merge_point(segment.start);
        group_bounds.merge_point(segment.end);
    }

    let colliders = query.box_overlap(&group_bounds, layer);
    if colliders.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        let diff = segment.end - segment.start;
        let length = diff.length();
        if math::approx_equals(length, 0.0) {
            continue;
        }

        let ray = Ray {
            origin: segment.start,
            direction: diff / length,
        };

        let mut nearest: Option<PhysicsQueryHit> = None;
        for &collider in &colliders {
            if let Some(hit) = query.raycast_collider(collider, &ray, length) {
                if nearest.map_or(true, |n| hit.distance < n.distance) {
                    nearest = Some(hit);
                }
            }
        }

        if let Some(hit) = nearest {
            hits.push(ParticleHitInfo {
                position: hit.point,
                normal: hit.normal,
                index,
            });
        }
    }

    hits
}

/// 粒子碰撞演化器
#[derive(Debug, Clone, Default)]
pub struct ParticleCollisions {
    desc: ParticleCollisionsDesc,
    planes: Vec<Plane>,
}

impl ParticleCollisions {
    /// 创建碰撞演化器，参数会被钳制到有效范围
    pub fn new(desc: ParticleCollisionsDesc) -> Self {
        Self {
            desc: desc.clamped(),
            planes: Vec::new(),
        }
    }

    pub fn desc(&self) -> &ParticleCollisionsDesc {
        &self.desc
    }

    /// 设置碰撞平面（世界空间），仅平面模式使用
    pub fn set_planes(&mut self, planes: Vec<Plane>) {
        self.planes = planes;
    }

    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    pub fn with_planes(mut self, planes: Vec<Plane>) -> Self {
        self.planes = planes;
        self
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    fn evolve_planes(&self, state: &ParticleSystemState<'_>, set: &mut ParticleSet) -> usize {
        let planes: Cow<'_, [Plane]> = if state.world_space {
            Cow::Borrowed(&self.planes)
        } else {
            Cow::Owned(
                self.planes
                    .iter()
                    .map(|plane| plane.transformed(&state.world_to_local))
                    .collect(),
            )
        };

        let count = set.count();
        let particles = set.particles_mut();
        let mut resolved = 0;

        for i in 0..count {
            let position = &mut particles.position[i];
            let velocity = &mut particles.velocity[i];

            for plane in planes.iter() {
                let dist = plane.distance_to_point(*position);
                if dist > self.desc.radius {
                    continue;
                }

                // 平行于平面的运动不处理
                let dist_along_normal = plane.normal.dot(*velocity);
                if math::approx_equals(dist_along_normal, 0.0) {
                    continue;
                }

                let dist_from_boundary = self.desc.radius - dist;
                let ray_t = dist_from_boundary / dist_along_normal;

                let hit = ParticleHitInfo {
                    normal: plane.normal,
                    position: *position + *velocity * ray_t,
                    index: i,
                };

                collision_response(position, velocity, &hit, &self.desc);
                particles.lifetime[i] -= self.desc.lifetime_loss * particles.initial_lifetime[i];
                resolved += 1;

                break;
            }
        }

        resolved
    }

    fn evolve_world(&self, state: &ParticleSystemState<'_>, set: &mut ParticleSet) -> usize {
        let Some(query) = state.collision_query else {
            tracing::trace!(target: "particles", "World collisions skipped: no collision query bound");
            return 0;
        };

        let count = set.count();
        let particles = set.particles_mut();

        let mut segments: Vec<LineSegment3> = (0..count)
            .map(|i| {
                let position = particles.position[i];
                let from = position - particles.velocity[i] * state.time_step;
                LineSegment3::new(from, position)
            })
            .collect();

        if !state.world_space {
            for segment in &mut segments {
                segment.start = state.local_to_world.transform_point3(segment.start);
                segment.end = state.local_to_world.transform_point3(segment.end);
            }
        }

        let mut hits = group_raycast(&segments, query, self.desc.layer);

        if !state.world_space {
            for hit in &mut hits {
                hit.position = state.world_to_local.transform_point3(hit.position);
                hit.normal = state
                    .world_to_local
                    .transform_vector3(hit.normal)
                    .normalize_or_zero();
            }
        }

        for hit in &hits {
            let i = hit.index;
            collision_response(
                &mut particles.position[i],
                &mut particles.velocity[i],
                hit,
                &self.desc,
            );
            particles.lifetime[i] -= self.desc.lifetime_loss * particles.initial_lifetime[i];
        }

        hits.len()
    }
}

impl ParticleEvolver for ParticleCollisions {
    fn name(&self) -> &'static str {
        "collisions"
    }

    fn evolve(&self, _random: &mut Random, state: &ParticleSystemState<'_>, set: &mut ParticleSet) {
        let resolved = match self.desc.mode {
            ParticleCollisionMode::Plane => self.evolve_planes(state, set),
            ParticleCollisionMode::World => self.evolve_world(state, set),
        };

        if resolved > 0 {
            tracing::trace!(target: "particles", "Resolved {} particle collisions ({:?})", resolved, self.desc.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleSpawn;
    use glam::Mat4;
    use rapier3d::prelude::ColliderHandle;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    fn hit_at_origin() -> ParticleHitInfo {
        ParticleHitInfo {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            index: 0,
        }
    }

    fn desc(restitution: f32, dampening: f32) -> ParticleCollisionsDesc {
        ParticleCollisionsDesc {
            restitution,
            dampening,
            radius: 0.0,
            ..Default::default()
        }
    }

    /// 把 y = 0 平面当作一个碰撞体
    struct GroundQuery {
        layer: u32,
    }

    impl CollisionQuery for GroundQuery {
        fn box_overlap(&self, bounds: &Aabb, layer: u32) -> Vec<ColliderHandle> {
            if layer & self.layer != 0 && bounds.min.y <= 0.0 {
                vec![ColliderHandle::from_raw_parts(0, 0)]
            } else {
                Vec::new()
            }
        }

        fn raycast_collider(
            &self,
            collider: ColliderHandle,
            ray: &Ray,
            max_distance: f32,
        ) -> Option<PhysicsQueryHit> {
            if ray.direction.y.abs() < 1e-6 {
                return None;
            }
            let t = -ray.origin.y / ray.direction.y;
            if !(0.0..=max_distance).contains(&t) {
                return None;
            }
            Some(PhysicsQueryHit {
                point: ray.point_at(t),
                normal: Vec3::Y,
                distance: t,
                collider,
            })
        }
    }

    /// 两个平行平面 y = 0 与 y = -0.05，检验最近命中的选择
    struct LayeredQuery;

    impl CollisionQuery for LayeredQuery {
        fn box_overlap(&self, _bounds: &Aabb, _layer: u32) -> Vec<ColliderHandle> {
            vec![
                ColliderHandle::from_raw_parts(1, 0),
                ColliderHandle::from_raw_parts(0, 0),
            ]
        }

        fn raycast_collider(
            &self,
            collider: ColliderHandle,
            ray: &Ray,
            max_distance: f32,
        ) -> Option<PhysicsQueryHit> {
            let (index, _) = collider.into_raw_parts();
            let height = -0.05 * index as f32;
            let t = (height - ray.origin.y) / ray.direction.y;
            (t >= 0.0 && t <= max_distance).then(|| PhysicsQueryHit {
                point: ray.point_at(t),
                normal: Vec3::Y,
                distance: t,
                collider,
            })
        }
    }

    #[test]
    fn test_elastic_response_reflects() {
        let mut position = Vec3::new(0.0, -0.1, 0.0);
        let mut velocity = Vec3::new(0.0, -1.0, 0.0);
        collision_response(&mut position, &mut velocity, &hit_at_origin(), &desc(1.0, 0.0));

        assert_vec_eq(position, Vec3::new(0.0, 0.1, 0.0));
        assert_vec_eq(velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_restitution_removes_normal_component() {
        let mut position = Vec3::new(0.5, -0.1, 0.0);
        let mut velocity = Vec3::new(1.0, -1.0, 0.0);
        collision_response(&mut position, &mut velocity, &hit_at_origin(), &desc(0.0, 0.0));

        assert_vec_eq(position, Vec3::new(0.5, 0.0, 0.0));
        assert_vec_eq(velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_full_dampening_stops_particle() {
        let mut position = Vec3::new(0.3, -0.2, 0.1);
        let mut velocity = Vec3::new(2.0, -3.0, 1.0);
        collision_response(&mut position, &mut velocity, &hit_at_origin(), &desc(1.0, 1.0));

        assert_vec_eq(position, Vec3::ZERO);
        assert_vec_eq(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_half_dampening_scales_velocity() {
        let mut position = Vec3::new(0.0, -0.2, 0.0);
        let mut velocity = Vec3::new(0.0, -2.0, 0.0);
        collision_response(&mut position, &mut velocity, &hit_at_origin(), &desc(1.0, 0.5));

        assert_vec_eq(position, Vec3::new(0.0, 0.1, 0.0));
        assert_vec_eq(velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_construction_clamps_desc() {
        let collisions = ParticleCollisions::new(ParticleCollisionsDesc {
            mode: ParticleCollisionMode::Plane,
            restitution: -1.0,
            dampening: 2.0,
            lifetime_loss: -0.5,
            radius: -3.0,
            layer: 1,
        });

        let desc = collisions.desc();
        assert_eq!(desc.restitution, 0.0);
        assert_eq!(desc.dampening, 1.0);
        assert_eq!(desc.lifetime_loss, 0.0);
        assert_eq!(desc.radius, 0.0);
    }

    fn single_particle(position: Vec3, velocity: Vec3, lifetime: f32) -> ParticleSet {
        let mut set = ParticleSet::new(4);
        set.spawn(ParticleSpawn::new(position, velocity, lifetime, 0));
        set
    }

    fn plane_collisions(lifetime_loss: f32) -> ParticleCollisions {
        ParticleCollisions::new(ParticleCollisionsDesc {
            mode: ParticleCollisionMode::Plane,
            restitution: 1.0,
            dampening: 0.0,
            lifetime_loss,
            radius: 0.0,
            layer: u32::MAX,
        })
        .with_planes(vec![Plane::new(Vec3::Y, 0.0)])
    }

    #[test]
    fn test_plane_collision_bounces_and_loses_lifetime() {
        let mut set = single_particle(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -1.0, 0.0), 2.0);
        let state = ParticleSystemState::new(0.1);

        plane_collisions(0.25).evolve(&mut Random::new(0), &state, &mut set);

        let particles = set.particles();
        assert_vec_eq(particles.position[0], Vec3::new(0.0, 0.1, 0.0));
        assert_vec_eq(particles.velocity[0], Vec3::new(0.0, 1.0, 0.0));
        assert!((particles.lifetime[0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_only_first_matching_plane_is_resolved() {
        // 粒子同时穿过地面与 x = 0 的墙面
        let mut set = single_particle(Vec3::new(-0.1, -0.1, 0.0), Vec3::new(-1.0, -1.0, 0.0), 2.0);
        let state = ParticleSystemState::new(0.1);

        let mut collisions = plane_collisions(0.25);
        collisions.add_plane(Plane::new(Vec3::X, 0.0));
        collisions.evolve(&mut Random::new(0), &state, &mut set);

        // 只按地面反射，墙面不再处理
        let particles = set.particles();
        assert_vec_eq(particles.position[0], Vec3::new(-0.1, 0.1, 0.0));
        assert_vec_eq(particles.velocity[0], Vec3::new(-1.0, 1.0, 0.0));
        assert!((particles.lifetime[0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_plane_ignores_distant_and_parallel_particles() {
        let mut set = ParticleSet::new(4);
        set.spawn(ParticleSpawn::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0, 0));
        set.spawn(ParticleSpawn::new(Vec3::new(0.0, -0.1, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0, 1));
        let state = ParticleSystemState::new(0.1);

        plane_collisions(0.5).evolve(&mut Random::new(0), &state, &mut set);

        let particles = set.particles();
        assert_vec_eq(particles.position[0], Vec3::new(0.0, 1.0, 0.0));
        assert_vec_eq(particles.velocity[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(particles.lifetime[0], 1.0);
        assert_eq!(particles.lifetime[1], 1.0);
    }

    #[test]
    fn test_plane_collision_in_local_space() {
        // 系统位于 y = 5，世界平面 y = 0 在局部空间中为 y = -5
        let mut set = single_particle(Vec3::new(0.0, -5.1, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0);
        let state = ParticleSystemState::new(0.1)
            .with_local_space(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));

        plane_collisions(0.0).evolve(&mut Random::new(0), &state, &mut set);

        assert_vec_eq(set.particles().position[0], Vec3::new(0.0, -4.9, 0.0));
        assert_vec_eq(set.particles().velocity[0], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_group_raycast_keeps_nearest_hit() {
        let segments = [LineSegment3::new(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -0.1, 0.0))];
        let hits = group_raycast(&segments, &LayeredQuery, u32::MAX);

        assert_eq!(hits.len(), 1);
        assert_vec_eq(hits[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_group_raycast_skips_zero_length_segments() {
        let segments = [
            LineSegment3::new(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -0.1, 0.0)),
            LineSegment3::new(Vec3::new(1.0, 0.1, 0.0), Vec3::new(1.0, -0.1, 0.0)),
        ];
        let hits = group_raycast(&segments, &GroundQuery { layer: 1 }, 1);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
    }

    #[test]
    fn test_group_raycast_respects_layer() {
        let segments = [LineSegment3::new(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -0.1, 0.0))];
        assert!(group_raycast(&segments, &GroundQuery { layer: 0b10 }, 0b01).is_empty());
        assert!(group_raycast(&[], &GroundQuery { layer: 1 }, 1).is_empty());
    }

    fn world_collisions() -> ParticleCollisions {
        ParticleCollisions::new(ParticleCollisionsDesc {
            mode: ParticleCollisionMode::World,
            restitution: 1.0,
            dampening: 0.0,
            lifetime_loss: 0.5,
            radius: 0.0,
            layer: 1,
        })
    }

    #[test]
    fn test_world_collision_uses_swept_segment() {
        let mut set = ParticleSet::new(4);
        set.spawn(ParticleSpawn::new(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0, 0));
        set.spawn(ParticleSpawn::new(Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0, 1));

        let query = GroundQuery { layer: 1 };
        let state = ParticleSystemState::new(0.2).with_collision_query(&query);
        world_collisions().evolve(&mut Random::new(0), &state, &mut set);

        let particles = set.particles();
        assert_vec_eq(particles.position[0], Vec3::new(0.0, 0.1, 0.0));
        assert_vec_eq(particles.velocity[0], Vec3::new(0.0, 1.0, 0.0));
        assert!((particles.lifetime[0] - 0.5).abs() < 1e-6);

        assert_vec_eq(particles.position[1], Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(particles.lifetime[1], 1.0);
    }

    #[test]
    fn test_world_collision_in_local_space() {
        let mut set = single_particle(Vec3::new(0.0, -5.1, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0);
        let query = GroundQuery { layer: 1 };
        let state = ParticleSystemState::new(0.2)
            .with_local_space(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)))
            .with_collision_query(&query);

        world_collisions().evolve(&mut Random::new(0), &state, &mut set);

        assert_vec_eq(set.particles().position[0], Vec3::new(0.0, -4.9, 0.0));
        assert_vec_eq(set.particles().velocity[0], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_world_collision_without_query_is_noop() {
        let mut set = single_particle(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -1.0, 0.0), 1.0);
        let state = ParticleSystemState::new(0.2);

        world_collisions().evolve(&mut Random::new(0), &state, &mut set);

        assert_vec_eq(set.particles().position[0], Vec3::new(0.0, -0.1, 0.0));
        assert_eq!(set.particles().lifetime[0], 1.0);
    }
}
