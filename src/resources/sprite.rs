//! 精灵纹理与网格帧动画元数据

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 精灵图集的网格帧动画描述
///
/// 帧按行优先排列：第 `row` 行第 `col` 列的帧编号为 `row * num_columns + col`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteSheetGridAnimation {
    /// 行数
    pub num_rows: u32,
    /// 列数
    pub num_columns: u32,
    /// 总帧数（可能小于 `num_rows * num_columns`）
    pub count: u32,
    /// 播放帧率，粒子动画不使用
    pub fps: u32,
}

impl SpriteSheetGridAnimation {
    pub fn new(num_rows: u32, num_columns: u32, count: u32, fps: u32) -> Self {
        Self {
            num_rows,
            num_columns,
            count,
            fps,
        }
    }

    /// 行、列、帧数均大于 0 时动画有效
    pub fn is_valid(&self) -> bool {
        self.num_rows > 0 && self.num_columns > 0 && self.count > 0
    }

    /// 计算帧在图集中的 UV 偏移与尺寸
    pub fn frame_uv(&self, frame: u32) -> Option<(Vec2, Vec2)> {
        if !self.is_valid() || frame >= self.count {
            return None;
        }

        let size = Vec2::new(1.0 / self.num_columns as f32, 1.0 / self.num_rows as f32);
        let row = frame / self.num_columns;
        let column = frame % self.num_columns;
        Some((Vec2::new(column as f32 * size.x, row as f32 * size.y), size))
    }
}

/// 精灵纹理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteTexture {
    /// 纹理名称
    pub name: String,
    /// 在底层纹理中的 UV 偏移
    pub uv_offset: Vec2,
    /// 在底层纹理中的 UV 尺寸
    pub uv_scale: Vec2,
    /// 网格帧动画
    pub animation: SpriteSheetGridAnimation,
}

impl SpriteTexture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uv_offset: Vec2::ZERO,
            uv_scale: Vec2::ONE,
            animation: SpriteSheetGridAnimation::default(),
        }
    }

    pub fn with_animation(mut self, animation: SpriteSheetGridAnimation) -> Self {
        self.animation = animation;
        self
    }
}
