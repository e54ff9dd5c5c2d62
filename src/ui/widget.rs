//! 原生 GUI 部件
//!
//! 部件是一组 GUI 元素的容器，渲染到某个相机的视口上。元素边界在部件局部空间中计算，
//! 命中测试时把屏幕坐标变换回局部空间。

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use glam::{IVec2, Mat4, UVec2, Vec3};
use serde::{Deserialize, Serialize};

use super::event::Event;
use crate::ecs::Transform;
use crate::math::Rect2I;
use crate::resources::Handle;

/// 元素样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiElementStyle {
    pub font_size: u32,
    pub fixed_width: Option<u32>,
    pub fixed_height: Option<u32>,
}

impl Default for GuiElementStyle {
    fn default() -> Self {
        Self {
            font_size: 10,
            fixed_width: None,
            fixed_height: None,
        }
    }
}

/// GUI 皮肤：按样式名索引的元素样式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuiSkin {
    pub name: String,
    pub styles: HashMap<String, GuiElementStyle>,
}

impl GuiSkin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: HashMap::new(),
        }
    }

    pub fn with_style(mut self, name: impl Into<String>, style: GuiElementStyle) -> Self {
        self.styles.insert(name.into(), style);
        self
    }

    pub fn style(&self, name: &str) -> Option<&GuiElementStyle> {
        self.styles.get(name)
    }
}

fn builtin_skin() -> Arc<GuiSkin> {
    static BUILTIN: OnceLock<Arc<GuiSkin>> = OnceLock::new();
    Arc::clone(BUILTIN.get_or_init(|| Arc::new(GuiSkin::new("builtin"))))
}

/// GUI 元素
#[derive(Debug, Clone, PartialEq)]
pub struct GuiElement {
    pub name: String,
    /// 部件局部空间中的边界
    pub bounds: Rect2I,
    pub style: String,
}

impl GuiElement {
    pub fn new(name: impl Into<String>, bounds: Rect2I) -> Self {
        Self {
            name: name.into(),
            bounds,
            style: String::new(),
        }
    }
}

/// 部件根面板
#[derive(Debug, Clone, Default)]
pub struct GuiPanel {
    elements: Vec<GuiElement>,
}

impl GuiPanel {
    pub fn elements(&self) -> &[GuiElement] {
        &self.elements
    }

    pub fn find(&self, name: &str) -> Option<&GuiElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// 相机的渲染目标区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn area(&self) -> Rect2I {
        Rect2I::new(0, 0, self.width, self.height)
    }
}

/// 部件渲染所用的相机
#[derive(Debug, Clone, PartialEq)]
pub struct GuiCamera {
    pub name: String,
    pub viewport: Viewport,
}

impl GuiCamera {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            viewport: Viewport { width, height },
        }
    }
}

/// 原生 GUI 部件
#[derive(Debug)]
pub struct GuiWidget {
    camera: GuiCamera,
    skin: Option<Handle<GuiSkin>>,
    depth: u8,
    panel: GuiPanel,
    bounds: Rect2I,
    transform: Mat4,
    window_focused: bool,
    dirty: bool,
    /// 渲染目标尺寸改变，参数为新尺寸
    pub on_owner_target_resized: Event<UVec2>,
    /// 目标窗口焦点改变，参数为是否获得焦点
    pub on_owner_window_focus_changed: Event<bool>,
}

impl GuiWidget {
    pub fn new(camera: GuiCamera) -> Self {
        Self {
            camera,
            skin: None,
            depth: 0,
            panel: GuiPanel::default(),
            bounds: Rect2I::default(),
            transform: Mat4::IDENTITY,
            window_focused: true,
            dirty: true,
            on_owner_target_resized: Event::new(),
            on_owner_window_focus_changed: Event::new(),
        }
    }

    /// 当前皮肤；皮肤未设置或未加载时返回内置皮肤
    pub fn skin(&self) -> Arc<GuiSkin> {
        self.skin
            .as_ref()
            .and_then(|handle| handle.get())
            .unwrap_or_else(builtin_skin)
    }

    pub fn skin_resource(&self) -> Option<&Handle<GuiSkin>> {
        self.skin.as_ref()
    }

    pub fn set_skin(&mut self, skin: Handle<GuiSkin>) {
        self.skin = Some(skin);
        self.dirty = true;
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u8) {
        if self.depth != depth {
            self.depth = depth;
            self.dirty = true;
        }
    }

    pub fn panel(&self) -> &GuiPanel {
        &self.panel
    }

    pub fn elements(&self) -> &[GuiElement] {
        self.panel.elements()
    }

    pub fn add_element(&mut self, element: GuiElement) {
        self.panel.elements.push(element);
        self.update_bounds();
    }

    pub fn remove_element(&mut self, name: &str) -> Option<GuiElement> {
        let index = self.panel.elements.iter().position(|e| e.name == name)?;
        let element = self.panel.elements.remove(index);
        self.update_bounds();
        Some(element)
    }

    /// 所有元素边界的并集（局部空间）
    pub fn bounds(&self) -> Rect2I {
        self.bounds
    }

    fn update_bounds(&mut self) {
        self.bounds = self
            .panel
            .elements
            .iter()
            .fold(Rect2I::default(), |acc, e| acc.encapsulate(&e.bounds));
        self.dirty = true;
    }

    /// 屏幕坐标是否落在部件内
    ///
    /// 部件边界可能超出视口，先按视口裁剪，再变换到局部空间与边界比较。
    pub fn in_bounds(&self, position: IVec2) -> bool {
        if !self.target().area().contains(position) {
            return false;
        }

        let local = self
            .transform
            .inverse()
            .transform_point3(Vec3::new(position.x as f32, position.y as f32, 0.0));
        let local = IVec2::new(local.x.round() as i32, local.y.round() as i32);
        self.bounds.contains(local)
    }

    /// 自上次清理后部件是否需要重建；`clean_if_dirty` 为 `true` 时同时清除标记
    pub fn is_dirty(&mut self, clean_if_dirty: bool) -> bool {
        let dirty = self.dirty;
        if dirty && clean_if_dirty {
            self.dirty = false;
        }
        dirty
    }

    pub fn target(&self) -> &Viewport {
        &self.camera.viewport
    }

    pub fn camera(&self) -> &GuiCamera {
        &self.camera
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// 同步所属对象的变换
    pub fn update_transform(&mut self, transform: &Transform) {
        self.transform = transform.local_to_world();
        self.dirty = true;
    }

    /// 渲染目标尺寸改变时由渲染器调用
    pub fn notify_target_resized(&mut self, width: u32, height: u32) {
        let viewport = &mut self.camera.viewport;
        if viewport.width == width && viewport.height == height {
            return;
        }
        viewport.width = width;
        viewport.height = height;
        self.dirty = true;

        self.on_owner_target_resized.emit(UVec2::new(width, height));
    }

    /// 目标窗口焦点改变时由平台层调用
    pub fn notify_window_focus_changed(&mut self, focused: bool) {
        if self.window_focused == focused {
            return;
        }
        self.window_focused = focused;
        self.on_owner_window_focus_changed.emit(focused);
    }

    pub fn has_window_focus(&self) -> bool {
        self.window_focused
    }
}
