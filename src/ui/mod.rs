//! UI 模块
//!
//! GUI 部件及其场景组件。部件本身不负责渲染，只维护元素、边界、深度、皮肤和脏标记，
//! 渲染器根据 `is_dirty` 决定是否重建绘制数据。
//!
//! ## 使用示例
//!
//! ```rust
//! use glam::IVec2;
//! use scene_runtime::ecs::Transform;
//! use scene_runtime::math::Rect2I;
//! use scene_runtime::ui::{GuiCamera, GuiElement, GuiWidgetComponent};
//!
//! let mut component = GuiWidgetComponent::new(GuiCamera::new("main", 800, 600));
//! if let Some(widget) = component.widget_mut() {
//!     widget.add_element(GuiElement::new("button", Rect2I::new(0, 0, 120, 32)));
//! }
//! component.update(&Transform::default());
//!
//! assert!(component.in_bounds(IVec2::new(10, 10)));
//! ```

pub mod component;
pub mod event;
pub mod widget;

pub use component::{
    gui_widget_update_system, DefaultGuiWidgetHooks, GuiWidgetComponent, GuiWidgetHooks,
};
pub use event::{ConnectionId, Event};
pub use widget::{
    GuiCamera, GuiElement, GuiElementStyle, GuiPanel, GuiSkin, GuiWidget, Viewport,
};
