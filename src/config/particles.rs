//! 粒子配置

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::particles::{ParticleCollisionsDesc, ParticleSystemSettings};

/// 粒子系统默认参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// 每个系统的最大粒子数
    pub max_particles: u32,
    /// 默认是否在世界空间中模拟
    pub world_space: bool,
    /// 碰撞演化器的默认参数
    pub collisions: ParticleCollisionsDesc,
}

impl_default!(ParticleConfig {
    max_particles: 1000,
    world_space: true,
    collisions: ParticleCollisionsDesc::default(),
});

impl ParticleConfig {
    /// 验证配置
    ///
    /// 碰撞参数在构造演化器时会被钳制，这里仍然拒绝超出范围的值，便于发现配置错误。
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_particles == 0 {
            return Err(ConfigError::ValidationError(
                "max_particles must be greater than 0".to_string(),
            ));
        }

        let desc = &self.collisions;
        if desc.restitution < 0.0 {
            return Err(ConfigError::ValidationError("Invalid restitution".to_string()));
        }
        if !(0.0..=1.0).contains(&desc.dampening) {
            return Err(ConfigError::ValidationError("Invalid dampening".to_string()));
        }
        if !(0.0..=1.0).contains(&desc.lifetime_loss) {
            return Err(ConfigError::ValidationError("Invalid lifetime loss".to_string()));
        }
        if desc.radius < 0.0 {
            return Err(ConfigError::ValidationError("Invalid collision radius".to_string()));
        }
        Ok(())
    }

    /// 按配置生成粒子系统设置
    pub fn system_settings(&self, seed: u32) -> ParticleSystemSettings {
        ParticleSystemSettings {
            world_space: self.world_space,
            max_particles: self.max_particles,
            seed,
            ..Default::default()
        }
    }
}
