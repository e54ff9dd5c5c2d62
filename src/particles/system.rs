//! 粒子系统
//!
//! 每次步进的顺序：
//! 1. 扣除生命、施加重力并积分位置
//! 2. 依次运行演化器
//! 3. 移除生命耗尽的粒子

use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::evolver::ParticleEvolver;
use super::random::Random;
use super::set::{ParticleSet, ParticleSpawn};
use super::state::ParticleSystemState;
use crate::ecs::{Time, Transform};
use crate::impl_default;
use crate::physics::{CollisionQuery, PhysicsWorld};
use crate::resources::{Handle, Material};

/// 粒子系统设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemSettings {
    /// 为 `true` 时粒子在世界空间中模拟，否则在所属实体的局部空间中模拟
    pub world_space: bool,
    /// 最大粒子数
    pub max_particles: u32,
    /// 重力加速度
    pub gravity: Vec3,
    /// 随机种子
    pub seed: u32,
}

impl_default!(ParticleSystemSettings {
    world_space: true,
    max_particles: 1000,
    gravity: Vec3::ZERO,
    seed: 0,
});

/// 粒子系统组件
#[derive(Component)]
pub struct ParticleSystem {
    settings: ParticleSystemSettings,
    set: ParticleSet,
    evolvers: Vec<Box<dyn ParticleEvolver>>,
    material: Option<Handle<Material>>,
    random: Random,
    time: f32,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(ParticleSystemSettings::default())
    }
}

impl ParticleSystem {
    pub fn new(settings: ParticleSystemSettings) -> Self {
        Self {
            settings,
            set: ParticleSet::new(settings.max_particles as usize),
            evolvers: Vec::new(),
            material: None,
            random: Random::new(settings.seed),
            time: 0.0,
        }
    }

    pub fn settings(&self) -> &ParticleSystemSettings {
        &self.settings
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.set
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.set
    }

    /// 系统已运行的时间（秒）
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn material(&self) -> Option<&Handle<Material>> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: Option<Handle<Material>>) {
        self.material = material;
    }

    /// 追加演化器，演化器按添加顺序执行
    pub fn add_evolver(&mut self, evolver: Box<dyn ParticleEvolver>) {
        tracing::debug!(target: "particles", "Adding evolver '{}'", evolver.name());
        self.evolvers.push(evolver);
    }

    pub fn with_evolver(mut self, evolver: Box<dyn ParticleEvolver>) -> Self {
        self.add_evolver(evolver);
        self
    }

    pub fn evolvers(&self) -> impl Iterator<Item = &dyn ParticleEvolver> {
        self.evolvers.iter().map(|e| e.as_ref())
    }

    /// 添加单个粒子，已达到最大粒子数时返回 `None`
    pub fn spawn(&mut self, spawn: ParticleSpawn) -> Option<usize> {
        self.set.spawn(spawn)
    }

    /// 从 `origin` 向随机方向发射 `count` 个粒子，返回实际发射数量
    pub fn emit_burst(&mut self, count: usize, origin: Vec3, speed: f32, lifetime: f32) -> usize {
        let mut emitted = 0;
        for _ in 0..count {
            let direction = Vec3::new(
                self.random.range_f32(-1.0, 1.0),
                self.random.range_f32(-1.0, 1.0),
                self.random.range_f32(-1.0, 1.0),
            )
            .normalize_or_zero();
            let seed = self.random.next_u32();

            if self
                .set
                .spawn(ParticleSpawn::new(origin, direction * speed, lifetime, seed))
                .is_none()
            {
                break;
            }
            emitted += 1;
        }
        emitted
    }

    /// 推进模拟 `dt` 秒
    ///
    /// `transform` 为所属实体的变换，局部空间模拟时用于构建空间变换矩阵。
    pub fn step(&mut self, dt: f32, transform: &Transform, collision_query: Option<&dyn CollisionQuery>) {
        if dt <= 0.0 {
            return;
        }
        self.time += dt;

        let count = self.set.count();
        let gravity = self.settings.gravity;
        let particles = self.set.particles_mut();
        for i in 0..count {
            particles.lifetime[i] -= dt;
            particles.velocity[i] += gravity * dt;
            particles.position[i] += particles.velocity[i] * dt;
        }

        let mut state = ParticleSystemState::new(dt);
        state.time = self.time;
        state.max_particles = self.settings.max_particles;
        if !self.settings.world_space {
            state = state.with_local_space(transform.local_to_world());
        }
        if let Some(material) = &self.material {
            state = state.with_material(material);
        }
        if let Some(query) = collision_query {
            state = state.with_collision_query(query);
        }

        for evolver in &self.evolvers {
            evolver.evolve(&mut self.random, &state, &mut self.set);
        }

        let removed = self.set.remove_dead();
        if removed > 0 {
            tracing::trace!(target: "particles", "Removed {} dead particles, {} alive", removed, self.set.count());
        }
    }
}

/// 推进所有粒子系统；物理世界存在时用于世界碰撞
pub fn particle_system_update_system(
    time: Res<Time>,
    physics: Option<Res<PhysicsWorld>>,
    mut query: Query<(&Transform, &mut ParticleSystem)>,
) {
    let collision_query = physics.as_deref().map(|world| world as &dyn CollisionQuery);
    for (transform, mut system) in query.iter_mut() {
        system.step(time.delta_seconds, transform, collision_query);
    }
}
