//! 几何基础类型
//!
//! 粒子碰撞、物理查询与 GUI 共享的几何类型。向量与矩阵直接使用 `glam`。

pub mod bounds;
pub mod plane;

pub use bounds::{Aabb, LineSegment3, Ray, Rect2I};
pub use plane::Plane;

use glam::Vec3;

/// 浮点近似相等判断的默认容差
pub const EPSILON: f32 = 1e-6;

/// 近似相等
pub fn approx_equals(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// 将 `t` 限制在 `[0, length)` 内循环
///
/// 非有限输入返回 0。
pub fn repeat(t: f32, length: f32) -> f32 {
    let value = t - (t / length).floor() * length;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 沿法线反射向量（`normal` 需为单位向量）
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * (2.0 * v.dot(normal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(0.25, 1.0), 0.25);
        assert_eq!(repeat(2.5, 1.0), 0.5);
        assert_eq!(repeat(1.0, 1.0), 0.0);
        assert_eq!(repeat(f32::NAN, 1.0), 0.0);
        assert_eq!(repeat(f32::INFINITY, 1.0), 0.0);
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_approx_equals() {
        assert!(approx_equals(0.0, 1e-7));
        assert!(!approx_equals(0.0, 1e-3));
    }
}
