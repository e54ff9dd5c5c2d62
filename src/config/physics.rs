//! 物理配置

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::physics::PhysicsWorld;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// 重力加速度
    pub gravity: Vec3,
    /// 新碰撞体与场景查询的默认层掩码
    pub default_layer: u32,
    /// 固定步长（秒）
    pub fixed_time_step: f32,
}

impl_default!(PhysicsConfig {
    gravity: Vec3::new(0.0, -9.81, 0.0),
    default_layer: u32::MAX,
    fixed_time_step: 1.0 / 60.0,
});

impl PhysicsConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::ValidationError("Gravity must be finite".to_string()));
        }
        if !self.fixed_time_step.is_finite() || self.fixed_time_step <= 0.0 {
            return Err(ConfigError::ValidationError(
                "fixed_time_step must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 按配置创建物理世界
    pub fn build_world(&self) -> PhysicsWorld {
        let mut world = PhysicsWorld::new().with_gravity(self.gravity);
        world.integration_parameters.dt = self.fixed_time_step;
        world
    }
}
