//! GUI 部件场景组件
//!
//! 把原生 [`GuiWidget`] 挂到场景实体上：
//! - 实体变换的哈希改变时才把变换推送给部件
//! - 订阅部件的目标尺寸和窗口焦点事件，在每次更新时分发给 [`GuiWidgetHooks`]
//! - 销毁时断开订阅并释放部件

use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use glam::{IVec2, UVec2};

use super::event::ConnectionId;
use super::widget::{GuiCamera, GuiElement, GuiPanel, GuiSkin, GuiWidget, Viewport};
use crate::ecs::Transform;
use crate::math::Rect2I;
use crate::resources::Handle;

/// 部件事件回调，默认实现只记录日志
pub trait GuiWidgetHooks: Send + Sync {
    /// 渲染目标尺寸改变
    fn owner_target_resized(&mut self, size: UVec2) {
        tracing::debug!(target: "ui", "GUI widget target resized to {}x{}", size.x, size.y);
    }

    /// 目标窗口焦点改变
    fn owner_window_focus_changed(&mut self, focused: bool) {
        tracing::debug!(target: "ui", "GUI widget window focus changed: {}", focused);
    }
}

/// 不做额外处理的回调
#[derive(Debug, Default)]
pub struct DefaultGuiWidgetHooks;

impl GuiWidgetHooks for DefaultGuiWidgetHooks {}

struct Subscription<A> {
    id: ConnectionId,
    receiver: Receiver<A>,
}

/// 初始哈希，保证第一次更新一定推送变换
const UNSET_HASH: u32 = u32::MAX;

/// GUI 部件组件
#[derive(Component)]
pub struct GuiWidgetComponent {
    internal: Option<GuiWidget>,
    parent_hash: u32,
    resized: Option<Subscription<UVec2>>,
    focus_changed: Option<Subscription<bool>>,
    hooks: Box<dyn GuiWidgetHooks>,
}

impl GuiWidgetComponent {
    pub fn new(camera: GuiCamera) -> Self {
        Self::with_hooks(camera, Box::new(DefaultGuiWidgetHooks))
    }

    pub fn with_hooks(camera: GuiCamera, hooks: Box<dyn GuiWidgetHooks>) -> Self {
        let internal = GuiWidget::new(camera);

        let (id, receiver) = internal.on_owner_target_resized.connect();
        let resized = Subscription { id, receiver };
        let (id, receiver) = internal.on_owner_window_focus_changed.connect();
        let focus_changed = Subscription { id, receiver };

        Self {
            internal: Some(internal),
            parent_hash: UNSET_HASH,
            resized: Some(resized),
            focus_changed: Some(focus_changed),
            hooks,
        }
    }

    /// 原生部件，组件销毁后为 `None`
    pub fn widget(&self) -> Option<&GuiWidget> {
        self.internal.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut GuiWidget> {
        self.internal.as_mut()
    }

    pub fn is_destroyed(&self) -> bool {
        self.internal.is_none()
    }

    pub fn set_skin(&mut self, skin: Handle<GuiSkin>) {
        if let Some(widget) = &mut self.internal {
            widget.set_skin(skin);
        }
    }

    pub fn skin(&self) -> Option<std::sync::Arc<GuiSkin>> {
        self.internal.as_ref().map(GuiWidget::skin)
    }

    pub fn skin_resource(&self) -> Option<&Handle<GuiSkin>> {
        self.internal.as_ref()?.skin_resource()
    }

    pub fn panel(&self) -> Option<&GuiPanel> {
        self.internal.as_ref().map(GuiWidget::panel)
    }

    pub fn depth(&self) -> u8 {
        self.internal.as_ref().map_or(0, GuiWidget::depth)
    }

    pub fn set_depth(&mut self, depth: u8) {
        if let Some(widget) = &mut self.internal {
            widget.set_depth(depth);
        }
    }

    pub fn in_bounds(&self, position: IVec2) -> bool {
        self.internal
            .as_ref()
            .is_some_and(|widget| widget.in_bounds(position))
    }

    pub fn bounds(&self) -> Rect2I {
        self.internal
            .as_ref()
            .map_or_else(Rect2I::default, GuiWidget::bounds)
    }

    pub fn is_dirty(&mut self, clean_if_dirty: bool) -> bool {
        self.internal
            .as_mut()
            .is_some_and(|widget| widget.is_dirty(clean_if_dirty))
    }

    pub fn target(&self) -> Option<&Viewport> {
        self.internal.as_ref().map(GuiWidget::target)
    }

    pub fn camera(&self) -> Option<&GuiCamera> {
        self.internal.as_ref().map(GuiWidget::camera)
    }

    pub fn elements(&self) -> &[GuiElement] {
        self.internal.as_ref().map_or(&[][..], GuiWidget::elements)
    }

    /// 每帧调用，返回本次是否推送了变换
    pub fn update(&mut self, transform: &Transform) -> bool {
        let Some(widget) = &mut self.internal else {
            return false;
        };

        let current_hash = transform.transform_hash();
        let pushed = current_hash != self.parent_hash;
        if pushed {
            widget.update_transform(transform);
            self.parent_hash = current_hash;
        }

        self.dispatch_events();
        pushed
    }

    /// 把已收到的部件事件分发给回调
    pub fn dispatch_events(&mut self) {
        if let Some(resized) = &self.resized {
            for size in resized.receiver.try_iter() {
                self.hooks.owner_target_resized(size);
            }
        }
        if let Some(focus) = &self.focus_changed {
            for focused in focus.receiver.try_iter() {
                self.hooks.owner_window_focus_changed(focused);
            }
        }
    }

    /// 断开事件订阅并释放原生部件
    pub fn on_destroyed(&mut self) {
        if let Some(widget) = &self.internal {
            if let Some(resized) = self.resized.take() {
                widget.on_owner_target_resized.disconnect(resized.id);
            }
            if let Some(focus) = self.focus_changed.take() {
                widget.on_owner_window_focus_changed.disconnect(focus.id);
            }
        }
        self.internal = None;
        tracing::debug!(target: "ui", "GUI widget destroyed");
    }
}

/// 更新所有 GUI 部件组件
pub fn gui_widget_update_system(mut query: Query<(&Transform, &mut GuiWidgetComponent)>) {
    for (transform, mut component) in query.iter_mut() {
        component.update(transform);
    }
}
