//! 粒子纹理动画
//!
//! 根据粒子已度过的生命比例，从材质 `gTexture` 参数绑定的精灵图集中选择帧。
//! 帧以连续值写入 [`ParticleSetData::frame`](super::ParticleSetData::frame)，
//! 渲染器可以在相邻帧之间插值。

use serde::{Deserialize, Serialize};

use super::evolver::ParticleEvolver;
use super::random::Random;
use super::set::ParticleSet;
use super::state::ParticleSystemState;
use crate::math;
use crate::resources::{SpriteSheetGridAnimation, DEFAULT_TEXTURE_PARAM};

/// 与粒子种子相加，派生出选择行的子种子，使行选择与其他随机属性不相关
const PARTICLE_ROW_VARIATION: u32 = 0x1e8b_2f4a;

/// 纹理动画参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleTextureAnimationDesc {
    /// 粒子生命周期内动画循环的次数
    #[serde(default = "default_num_cycles")]
    pub num_cycles: f32,
    /// 为每个粒子随机选择图集中的一行，只在该行内播放
    #[serde(default)]
    pub randomize_row: bool,
}

fn default_num_cycles() -> f32 {
    1.0
}

impl Default for ParticleTextureAnimationDesc {
    fn default() -> Self {
        Self {
            num_cycles: default_num_cycles(),
            randomize_row: false,
        }
    }
}

/// 粒子纹理动画演化器
#[derive(Debug, Clone, Default)]
pub struct ParticleTextureAnimation {
    desc: ParticleTextureAnimationDesc,
}

impl ParticleTextureAnimation {
    pub fn new(desc: ParticleTextureAnimationDesc) -> Self {
        Self { desc }
    }

    pub fn desc(&self) -> &ParticleTextureAnimationDesc {
        &self.desc
    }

    pub fn set_desc(&mut self, desc: ParticleTextureAnimationDesc) {
        self.desc = desc;
    }

    /// 从系统材质中解析网格动画
    ///
    /// 材质与纹理都已加载，且动画的行、列、帧数都大于 0 时才返回。
    fn resolve_animation(state: &ParticleSystemState<'_>) -> Option<SpriteSheetGridAnimation> {
        let material = state.material?.get()?;
        let texture = material.sprite_texture(DEFAULT_TEXTURE_PARAM)?.get()?;
        let animation = texture.animation;
        animation.is_valid().then_some(animation)
    }

    /// 计算单个粒子的帧，动画无效时返回第 0 帧
    pub fn frame_for(
        &self,
        animation: &SpriteSheetGridAnimation,
        seed: u32,
        lifetime: f32,
        initial_lifetime: f32,
    ) -> f32 {
        if !animation.is_valid() {
            return 0.0;
        }

        // 在 f32 中计算偏移，超大网格的行列乘积不会溢出 u32
        let (frame_offset, num_frames) = if self.desc.randomize_row {
            let row_seed = seed.wrapping_add(PARTICLE_ROW_VARIATION);
            let row = Random::new(row_seed).range(0, animation.num_rows);
            (row as f32 * animation.num_columns as f32, animation.num_columns)
        } else {
            (0.0, animation.count)
        };

        let elapsed = (initial_lifetime - lifetime) / initial_lifetime;
        let t = math::repeat(self.desc.num_cycles * elapsed, 1.0);

        let frame = t * num_frames as f32;
        frame_offset + frame.clamp(0.0, (num_frames - 1) as f32)
    }
}

impl ParticleEvolver for ParticleTextureAnimation {
    fn name(&self) -> &'static str {
        "texture_animation"
    }

    fn evolve(&self, _random: &mut Random, state: &ParticleSystemState<'_>, set: &mut ParticleSet) {
        let count = set.count();
        let particles = set.particles_mut();

        let Some(animation) = Self::resolve_animation(state) else {
            particles.frame[..count].fill(0.0);
            return;
        };

        for i in 0..count {
            particles.frame[i] = self.frame_for(
                &animation,
                particles.seed[i],
                particles.lifetime[i],
                particles.initial_lifetime[i],
            );
        }
    }
}
