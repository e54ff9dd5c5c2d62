//! 粒子演化器接口

use serde::{Deserialize, Serialize};

use super::collisions::{ParticleCollisions, ParticleCollisionsDesc};
use super::random::Random;
use super::set::ParticleSet;
use super::state::ParticleSystemState;
use super::texture_animation::{ParticleTextureAnimation, ParticleTextureAnimationDesc};
use crate::math::Plane;

/// 每帧修改粒子状态的演化器
///
/// 演化器按注册顺序依次执行，每次都独占粒子集合。
pub trait ParticleEvolver: Send + Sync {
    /// 演化器名称，用于日志
    fn name(&self) -> &'static str;

    /// 演化一帧
    fn evolve(&self, random: &mut Random, state: &ParticleSystemState<'_>, set: &mut ParticleSet);
}

/// 可序列化的演化器描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvolverDesc {
    TextureAnimation(ParticleTextureAnimationDesc),
    Collisions {
        #[serde(flatten)]
        desc: ParticleCollisionsDesc,
        #[serde(default)]
        planes: Vec<Plane>,
    },
}

impl EvolverDesc {
    /// 根据描述创建演化器
    pub fn build(&self) -> Box<dyn ParticleEvolver> {
        match self {
            EvolverDesc::TextureAnimation(desc) => Box::new(ParticleTextureAnimation::new(*desc)),
            EvolverDesc::Collisions { desc, planes } => {
                let mut collisions = ParticleCollisions::new(*desc);
                collisions.set_planes(planes.clone());
                Box::new(collisions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleCollisionMode;
    use glam::Vec3;

    #[test]
    fn test_build_from_json() {
        let json = r#"[
            { "type": "texture_animation", "num_cycles": 2.0, "randomize_row": true },
            {
                "type": "collisions",
                "mode": "plane",
                "restitution": 0.5,
                "dampening": 0.1,
                "lifetime_loss": 0.0,
                "radius": 0.0,
                "layer": 1,
                "planes": [ { "normal": [0.0, 1.0, 0.0], "distance": 0.0 } ]
            }
        ]"#;

        let descs: Vec<EvolverDesc> = serde_json::from_str(json).unwrap();
        assert_eq!(descs.len(), 2);

        match &descs[1] {
            EvolverDesc::Collisions { desc, planes } => {
                assert_eq!(desc.mode, ParticleCollisionMode::Plane);
                assert_eq!(planes[0].normal, Vec3::Y);
            }
            other => panic!("unexpected desc: {:?}", other),
        }

        let evolvers: Vec<_> = descs.iter().map(EvolverDesc::build).collect();
        assert_eq!(evolvers[0].name(), "texture_animation");
        assert_eq!(evolvers[1].name(), "collisions");
    }
}
