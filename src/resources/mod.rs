//! 资源模块
//!
//! - `handle` - 带加载状态的资源句柄
//! - `material` - 材质与纹理参数绑定
//! - `sprite` - 精灵纹理与网格帧动画

pub mod handle;
pub mod material;
pub mod sprite;

pub use handle::{Handle, LoadState};
pub use material::{Material, DEFAULT_TEXTURE_PARAM};
pub use sprite::{SpriteSheetGridAnimation, SpriteTexture};
