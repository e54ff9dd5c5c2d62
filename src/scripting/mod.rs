//! 脚本模块
//!
//! 引擎不内嵌脚本解释器，只提供脚本桥接层：脚本宿主通过 [`ScriptApi`] 按名称调用
//! 注册的引擎函数，参数和返回值使用 [`ScriptValue`]。
//!
//! - `system` - 脚本值与调用结果
//! - `api` - 函数注册表
//! - `collider_bindings` - 盒形碰撞体绑定

pub mod api;
pub mod collider_bindings;
pub mod system;

pub use api::ScriptApi;
pub use collider_bindings::ColliderBindings;
pub use system::{ScriptArgs, ScriptResult, ScriptValue};
