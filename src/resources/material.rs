//! 材质
//!
//! 只保留粒子系统需要的部分：按参数名绑定的精灵纹理。

use std::collections::HashMap;

use super::handle::Handle;
use super::sprite::SpriteTexture;

/// 粒子渲染默认使用的纹理参数名
pub const DEFAULT_TEXTURE_PARAM: &str = "gTexture";

#[derive(Debug, Default)]
pub struct Material {
    /// 材质名称
    pub name: String,
    sprite_textures: HashMap<String, Handle<SpriteTexture>>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprite_textures: HashMap::new(),
        }
    }

    /// 绑定精灵纹理参数
    pub fn set_sprite_texture(&mut self, param: impl Into<String>, texture: Handle<SpriteTexture>) {
        self.sprite_textures.insert(param.into(), texture);
    }

    pub fn with_sprite_texture(
        mut self,
        param: impl Into<String>,
        texture: Handle<SpriteTexture>,
    ) -> Self {
        self.set_sprite_texture(param, texture);
        self
    }

    /// 获取精灵纹理参数的句柄
    pub fn sprite_texture(&self, param: &str) -> Option<&Handle<SpriteTexture>> {
        self.sprite_textures.get(param)
    }
}
