//! 粒子系统每帧状态

use glam::Mat4;

use crate::physics::CollisionQuery;
use crate::resources::{Handle, Material};

/// 演化器每帧读取的系统状态
///
/// 由 [`ParticleSystem`](super::ParticleSystem) 在每次步进时构建，演化器只读。
pub struct ParticleSystemState<'a> {
    /// 系统累计运行时间（秒）
    pub time: f32,
    /// 本帧时间步长（秒）
    pub time_step: f32,
    /// 最大粒子数
    pub max_particles: u32,
    /// 粒子是否在世界空间中模拟
    pub world_space: bool,
    /// 系统局部空间到世界空间
    pub local_to_world: Mat4,
    /// 世界空间到系统局部空间
    pub world_to_local: Mat4,
    /// 系统使用的材质
    pub material: Option<&'a Handle<Material>>,
    /// 场景碰撞查询，世界碰撞模式需要
    pub collision_query: Option<&'a dyn CollisionQuery>,
}

impl<'a> ParticleSystemState<'a> {
    /// 世界空间、无材质、无碰撞查询的状态
    pub fn new(time_step: f32) -> Self {
        Self {
            time: 0.0,
            time_step,
            max_particles: 0,
            world_space: true,
            local_to_world: Mat4::IDENTITY,
            world_to_local: Mat4::IDENTITY,
            material: None,
            collision_query: None,
        }
    }

    /// 设置局部空间变换，粒子改为在局部空间模拟
    pub fn with_local_space(mut self, local_to_world: Mat4) -> Self {
        self.world_space = false;
        self.local_to_world = local_to_world;
        self.world_to_local = local_to_world.inverse();
        self
    }

    pub fn with_material(mut self, material: &'a Handle<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_collision_query(mut self, query: &'a dyn CollisionQuery) -> Self {
        self.collision_query = Some(query);
        self
    }
}
